//! Scan metadata

use serde::{Deserialize, Serialize};

/// Metadata describing one scan of a sample buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Engine that produced the result
    pub engine: String,

    /// Buffer duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of full windows processed
    pub windows_processed: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,
}

impl Default for ScanMetadata {
    fn default() -> Self {
        Self {
            engine: String::new(),
            duration_seconds: 0.0,
            sample_rate: 0,
            windows_processed: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
