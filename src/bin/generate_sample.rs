//! Generate a synthetic ultrasonic distance log for development and demos.
//!
//! The log mimics what the sensor logger records: a `#` comment preamble,
//! unit-suffixed headers, integer-centimeter readings with Gaussian noise,
//! slightly jittered sample times, and the occasional duplicated timestamp
//! that the pipeline's time-delta guard is expected to drop.

use std::io::Write;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// True position of the target over time: approach, hold, retreat.
fn target_distance(t: f64) -> f64 {
    match t {
        t if t < 4.0 => 80.0 - 12.0 * t,
        t if t < 6.0 => 32.0,
        t => 32.0 + 15.0 * (t - 6.0),
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_log.csv";
    let mut file = std::fs::File::create(output_path).expect("Failed to create output file");
    writeln!(file, "# generated by generate_sample, seed 42").expect("Failed to write preamble");

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(["t (s)", "distance (cm)"])
        .expect("Failed to write header");

    let nominal_interval = 0.05; // 20 Hz logger
    let mut t = 0.0;
    let mut rows = 0usize;
    let mut duplicates = 0usize;

    while t < 10.0 {
        // Ultrasonic readings come back as whole centimeters.
        let reading = (target_distance(t) + rng.gauss(0.0, 0.8))
            .round()
            .clamp(4.0, 255.0);

        writer
            .write_record([format!("{t:.3}"), format!("{reading}")])
            .expect("Failed to write row");
        rows += 1;

        // Roughly every 40th row the logger stamps the same time twice.
        if rng.next_f64() < 0.025 {
            let reading = (target_distance(t) + rng.gauss(0.0, 0.8))
                .round()
                .clamp(4.0, 255.0);
            writer
                .write_record([format!("{t:.3}"), format!("{reading}")])
                .expect("Failed to write row");
            rows += 1;
            duplicates += 1;
        }

        t += nominal_interval + rng.gauss(0.0, 0.003);
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {rows} samples ({duplicates} duplicated timestamps) to {output_path}");
}
