//! Kinolog – desktop analyzer for ultrasonic distance logs.
//!
//! Loads a recorded distance log (delimited text, mixed encodings tolerated),
//! derives raw and smoothed velocity/acceleration columns, and shows a
//! raw-vs-filtered comparison grid with summary statistics and a processed
//! CSV export.

pub mod app;
pub mod data;
pub mod state;
pub mod ui;
