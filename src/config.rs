//! Configuration parameters for the beat detection engines

use crate::error::AnalysisError;
use crate::features::beat_tracking::DETECTION_RANGES;
use serde::{Deserialize, Serialize};

/// Spectral energy-variance beat detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Window length in stereo frames (default: 1024, power of two)
    pub window_size: usize,

    /// Hop between consecutive windows in stereo frames (default: 256)
    pub hop_size: usize,

    /// Number of frequency bands the spectrum is partitioned into (default: 64)
    pub band_count: usize,

    /// Number of past window energies kept per band (default: 24)
    pub history_size: usize,

    /// A band fires when its energy exceeds this multiple of its history average
    /// (default: 250.0)
    pub energy_ratio: f32,

    /// A band only fires when its history variance exceeds this floor (default: 150.0)
    pub variance_floor: f32,

    /// Apply a bit-reversal reindexing pass to each window before transforming
    /// (default: false)
    pub bit_reverse_input: bool,

    /// Compute the dominant-frequency indicator with real division
    ///
    /// The default (false) keeps the truncating integer division of bin index by
    /// spectrum length, which yields 0.0 for every event.
    pub exact_dominant_frequency: bool,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            hop_size: 256,
            band_count: 64,
            history_size: 24,
            energy_ratio: 250.0,
            variance_floor: 150.0,
            bit_reverse_input: false,
            exact_dominant_frequency: false,
        }
    }
}

impl SpectralConfig {
    /// Check structural constraints
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the window is not a power of two, the
    /// hop is zero or longer than the window, the history is empty, or the bands are
    /// too many to give every band at least one bin
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.window_size.is_power_of_two() {
            return Err(AnalysisError::InvalidInput(format!(
                "Window size must be a power of two, got {}",
                self.window_size
            )));
        }
        if self.hop_size == 0 || self.hop_size > self.window_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Hop size must be in [1, {}], got {}",
                self.window_size, self.hop_size
            )));
        }
        if self.band_count == 0 || self.band_count * 4 > self.window_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Band count must be in [1, {}], got {}",
                self.window_size / 4,
                self.band_count
            )));
        }
        if self.history_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "History size must be > 0".to_string(),
            ));
        }
        if !(self.energy_ratio > 0.0) || !(self.variance_floor >= 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid thresholds: energy ratio {}, variance floor {}",
                self.energy_ratio, self.variance_floor
            )));
        }
        Ok(())
    }
}

/// Adaptive multi-band BPM estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmConfig {
    /// Minimum BPM to search (default: 100.0)
    pub min_bpm: f32,

    /// Maximum BPM to search (default: 200.0)
    ///
    /// Should stay below `2 * min_bpm - 1`: tighter ranges converge faster and are
    /// less prone to locking onto alternate beats. Wider ranges are accepted with a
    /// warning.
    pub max_bpm: f32,

    /// Window length in interleaved samples (default: 1024, i.e. 512 stereo frames)
    ///
    /// Must be a power of two of at least `4 * 128` so the spectrum covers every
    /// detection range.
    pub window_size: usize,

    /// Apply a bit-reversal reindexing pass to each window before transforming
    /// (default: false)
    pub bit_reverse_input: bool,

    /// Compute the dominant-frequency indicator with real division (default: false,
    /// see [`SpectralConfig::exact_dominant_frequency`])
    pub exact_dominant_frequency: bool,
}

impl Default for BpmConfig {
    fn default() -> Self {
        Self {
            min_bpm: 100.0,
            max_bpm: 200.0,
            window_size: 1024,
            bit_reverse_input: false,
            exact_dominant_frequency: false,
        }
    }
}

impl BpmConfig {
    /// Configuration used by the file-scanning driver (90-180 BPM)
    pub fn driver_default() -> Self {
        Self {
            min_bpm: 90.0,
            max_bpm: 180.0,
            ..Self::default()
        }
    }

    /// Configuration with a custom BPM search range
    pub fn with_range(min_bpm: f32, max_bpm: f32) -> Self {
        Self {
            min_bpm,
            max_bpm,
            ..Self::default()
        }
    }

    /// Number of magnitude bins produced per window
    pub fn spectrum_len(&self) -> usize {
        self.window_size / 4
    }

    /// Check structural constraints
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the BPM range is empty or non-positive,
    /// or if the window is not a power of two large enough for every detection range
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.min_bpm > 0.0) || !(self.max_bpm > self.min_bpm) || !self.max_bpm.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }
        if !self.window_size.is_power_of_two() || self.spectrum_len() < DETECTION_RANGES {
            return Err(AnalysisError::InvalidInput(format!(
                "Window size must be a power of two >= {}, got {}",
                DETECTION_RANGES * 4,
                self.window_size
            )));
        }
        if self.max_bpm >= 2.0 * self.min_bpm - 1.0 {
            log::warn!(
                "BPM range [{:.1}, {:.1}] is not below 2*min-1; alternate-beat confusion is likely",
                self.min_bpm,
                self.max_bpm
            );
        }
        Ok(())
    }
}
