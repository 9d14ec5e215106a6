// src/core/mod.rs

pub mod period;
pub mod time;

pub use period::{AnalysisRange, Granularity, Period};
