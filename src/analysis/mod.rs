//! Scan results and batch analysis
//!
//! - Beat events, timelines and engine reports
//! - Scan metadata
//! - Parallel analysis of independent buffers

pub mod batch;
pub mod metadata;
pub mod result;
