//! # Groundlink Detection Engine
//!
//! Crate for threshold-based anomaly detection on decoded telemetry.

pub mod thresholds;

pub use thresholds::{detect, ThresholdEngine};
