//! Parallel analysis of independent buffers
//!
//! Each buffer gets its own engine instance, so no state is shared between workers.
//! Parallelism is across buffers; every single scan stays sequential.

use super::result::{BeatReport, BpmReport};
use crate::config::{BpmConfig, SpectralConfig};
use crate::error::AnalysisError;
use crate::features::beat_tracking::BpmEstimator;
use crate::features::onset::SpectralBeatDetector;
use crate::io::sample_buffer::PcmBuffer;
use rayon::prelude::*;

/// Run the spectral beat detector over every buffer in parallel
///
/// # Returns
///
/// One result per buffer, in input order
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` up front if the configuration is invalid;
/// per-buffer failures are reported in the corresponding slot
pub fn detect_batch(
    buffers: &[PcmBuffer<'_>],
    config: &SpectralConfig,
) -> Result<Vec<Result<BeatReport, AnalysisError>>, AnalysisError> {
    config.validate()?;
    log::debug!("Detecting beats in {} buffers", buffers.len());

    Ok(buffers
        .par_iter()
        .map(|&pcm| SpectralBeatDetector::new(config.clone())?.analyze(pcm))
        .collect())
}

/// Run the BPM estimator over every buffer in parallel
///
/// # Returns
///
/// One result per buffer, in input order
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` up front if the configuration is invalid;
/// per-buffer failures are reported in the corresponding slot
pub fn analyze_batch(
    buffers: &[PcmBuffer<'_>],
    config: &BpmConfig,
) -> Result<Vec<Result<BpmReport, AnalysisError>>, AnalysisError> {
    config.validate()?;
    log::debug!("Estimating BPM of {} buffers", buffers.len());

    Ok(buffers
        .par_iter()
        .map(|&pcm| BpmEstimator::new(config.clone())?.analyze(pcm))
        .collect())
}
