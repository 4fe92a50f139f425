//! # Stratum Beat
//!
//! Beat detection and tempo estimation for interleaved 16-bit stereo PCM.
//!
//! ## Features
//!
//! - **Spectral beat detection**: per-band energy against a rolling history, firing on
//!   transient energy spikes
//! - **BPM estimation**: 128 frequency ranges track trigger timing independently and
//!   vote on a tempo through decaying contest tables
//! - **In-place transform**: radix-2 FFT over complex or interleaved buffers
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_beat::{detect_beats, estimate_bpm, BpmConfig, SpectralConfig};
//!
//! // Interleaved [L, R, L, R, ...] samples
//! let samples: Vec<i16> = vec![0; 2 * 44100 * 10];
//! let sample_rate = 44100;
//!
//! let beats = detect_beats(&samples, sample_rate, SpectralConfig::default())?;
//! println!("Spectral beats: {}", beats.timeline.len());
//!
//! let tempo = estimate_bpm(&samples, sample_rate, BpmConfig::driver_default())?;
//! println!("BPM: {:.1} ({} ticks)", tempo.bpm(), tempo.timeline.len());
//! # Ok::<(), stratum_beat::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PCM buffer → Windows → Channel packing → FFT → Detector → Event timeline
//! ```
//!
//! Both engines keep their state between calls and can be reset to analyze a new
//! stream without being rebuilt.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::batch::{analyze_batch, detect_batch};
pub use analysis::metadata::ScanMetadata;
pub use analysis::result::{BeatEvent, BeatReport, BpmReport, EventTimeline};
pub use config::{BpmConfig, SpectralConfig};
pub use error::AnalysisError;
pub use features::beat_tracking::{BpmEstimator, MultiBandTracker};
pub use features::onset::SpectralBeatDetector;
pub use io::sample_buffer::PcmBuffer;

/// Detect beats with the spectral energy-variance detector
///
/// # Arguments
///
/// * `samples` - Interleaved 16-bit stereo samples (even length)
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Detector configuration
///
/// # Returns
///
/// `BeatReport` with one event per window in which a band fired
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an invalid configuration, a zero sample
/// rate or an odd-length buffer
///
/// # Example
///
/// ```no_run
/// use stratum_beat::{detect_beats, SpectralConfig};
///
/// let samples = vec![0i16; 2 * 44100 * 30]; // 30 seconds of silence
/// let report = detect_beats(&samples, 44100, SpectralConfig::default())?;
/// assert!(report.timeline.is_empty());
/// # Ok::<(), stratum_beat::AnalysisError>(())
/// ```
pub fn detect_beats(
    samples: &[i16],
    sample_rate: u32,
    config: SpectralConfig,
) -> Result<BeatReport, AnalysisError> {
    let pcm = PcmBuffer::new(samples, sample_rate)?;
    SpectralBeatDetector::new(config)?.analyze(pcm)
}

/// Estimate the tempo with the adaptive multi-band estimator
///
/// # Arguments
///
/// * `samples` - Interleaved 16-bit stereo samples (even length)
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Estimator configuration, including the BPM search range
///
/// # Returns
///
/// `BpmReport` with the beat ticks, the winning BPM in tenths (0 if no tempo was
/// found) and the low-resolution winner
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an invalid configuration, a zero sample
/// rate or an odd-length buffer
pub fn estimate_bpm(
    samples: &[i16],
    sample_rate: u32,
    config: BpmConfig,
) -> Result<BpmReport, AnalysisError> {
    let pcm = PcmBuffer::new(samples, sample_rate)?;
    BpmEstimator::new(config)?.analyze(pcm)
}
