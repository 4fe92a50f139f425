//! BPM estimation over a sample buffer
//!
//! Drives a [`MultiBandTracker`] with one magnitude spectrum per non-overlapping
//! window and records a beat event on every whole-beat tick.
//!
//! # Algorithm
//!
//! For each window of `window_size` interleaved samples (default 1024, i.e. 512
//! frames):
//! 1. Mix to mono, normalized to [-1.0, 1.0]
//! 2. Pack consecutive values as interleaved real/imaginary pairs (256 points)
//! 3. Optionally apply a bit-reversal reindexing pass
//! 4. Transform in place and take the magnitude of each point
//! 5. Feed the tracker with the window end time as timestamp
//! 6. On a whole-beat tick, emit an event at the window end time with the
//!    dominant-frequency indicator of the per-range amplitudes
//!
//! # Example
//!
//! ```no_run
//! use stratum_beat::features::beat_tracking::BpmEstimator;
//! use stratum_beat::BpmConfig;
//!
//! let samples = vec![0i16; 2 * 44100 * 10];
//! let mut estimator = BpmEstimator::new(BpmConfig::driver_default())?;
//! let timeline = estimator.detect(&samples, 44100)?;
//! println!("{} beats, {:.1} BPM", timeline.len(), estimator.winning_bpm_tenths() as f32 / 10.0);
//! # Ok::<(), stratum_beat::AnalysisError>(())
//! ```

use super::tracker::MultiBandTracker;
use crate::analysis::metadata::ScanMetadata;
use crate::analysis::result::{BeatEvent, BpmReport, EventTimeline};
use crate::config::BpmConfig;
use crate::error::AnalysisError;
use crate::features::dominant_frequency;
use crate::features::fft::{self, magnitude_spectrum, Interleaved};
use crate::io::sample_buffer::PcmBuffer;
use crate::preprocessing::channel_mixer::mix_to_mono;
use std::time::Instant;

/// Adaptive multi-band BPM estimator
#[derive(Debug, Clone)]
pub struct BpmEstimator {
    config: BpmConfig,
    tracker: MultiBandTracker,
    mono: Vec<f32>,
    spectrum: Vec<f32>,
    amplitudes: Vec<f32>,
}

impl BpmEstimator {
    /// Create an estimator
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    pub fn new(config: BpmConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let tracker = MultiBandTracker::new(config.min_bpm, config.max_bpm)?;

        log::debug!(
            "BPM estimator: window={} samples, spectrum={} bins, BPM [{:.1}, {:.1}]",
            config.window_size,
            config.spectrum_len(),
            config.min_bpm,
            config.max_bpm
        );

        Ok(Self {
            mono: vec![0.0; config.window_size / 2],
            spectrum: Vec::with_capacity(config.spectrum_len()),
            amplitudes: Vec::new(),
            config,
            tracker,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &BpmConfig {
        &self.config
    }

    /// Underlying tracker
    pub fn tracker(&self) -> &MultiBandTracker {
        &self.tracker
    }

    /// Winning BPM in tenths (0 until a tempo wins)
    pub fn winning_bpm_tenths(&self) -> u32 {
        self.tracker.winning_bpm_tenths()
    }

    /// Magnitude spectrum of the most recently processed window
    pub fn spectrum(&self) -> &[f32] {
        &self.spectrum
    }

    /// Clear tracker state; the BPM range and window size are kept
    pub fn reset(&mut self) {
        self.tracker.reset(false);
        self.spectrum.clear();
    }

    /// Scan an interleaved stereo buffer and return the beat ticks
    ///
    /// # Arguments
    ///
    /// * `samples` - Interleaved 16-bit stereo samples (even length)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero sample rate or odd-length buffer
    pub fn detect(&mut self, samples: &[i16], sample_rate: u32) -> Result<EventTimeline, AnalysisError> {
        let pcm = PcmBuffer::new(samples, sample_rate)?;
        Ok(self.analyze(pcm)?.timeline)
    }

    /// Scan a buffer and return the beat ticks, tempo estimates and scan metadata
    ///
    /// Tracker state carries over from previous scans; call [`reset`](Self::reset)
    /// first to analyze an unrelated stream.
    pub fn analyze(&mut self, pcm: PcmBuffer<'_>) -> Result<BpmReport, AnalysisError> {
        let start_time = Instant::now();
        let sample_rate = pcm.sample_rate();
        let window_frames = self.config.window_size / 2;

        log::debug!(
            "Estimating BPM: {} frames at {} Hz",
            pcm.frames(),
            sample_rate
        );
        if pcm.frames() < window_frames {
            log::warn!(
                "Buffer ({} frames) shorter than one window ({}), no tempo estimated",
                pcm.frames(),
                window_frames
            );
        }

        let mut timeline = EventTimeline::new();
        let mut windows_processed = 0;

        for window in pcm.windows(window_frames, window_frames) {
            windows_processed += 1;
            let time = window.end_seconds(sample_rate);
            if let Some(frequency) = self.process_window(time, window.samples)? {
                log::trace!(
                    "Beat at {:.3}s ({} tenths BPM)",
                    time,
                    self.tracker.winning_bpm_tenths()
                );
                timeline.push(BeatEvent::new(time, frequency));
            }
        }

        log::debug!(
            "BPM estimator emitted {} beats in {} windows, winning {:.1} BPM",
            timeline.len(),
            windows_processed,
            self.tracker.winning_bpm_tenths() as f32 / 10.0
        );

        Ok(BpmReport {
            timeline,
            winning_bpm_tenths: self.tracker.winning_bpm_tenths(),
            winning_bpm_lo: self.tracker.winning_bpm_lo(),
            current_bpm: self.tracker.current_bpm(),
            metadata: ScanMetadata {
                engine: "multiband-bpm".to_string(),
                duration_seconds: pcm.duration_seconds(),
                sample_rate,
                windows_processed,
                processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
                ..ScanMetadata::default()
            },
        })
    }

    /// Process one window using the estimator's own scratch buffer
    ///
    /// # Returns
    ///
    /// `Some(frequency indicator)` on a whole-beat tick, `None` otherwise
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the window does not hold exactly
    /// `window_size` samples
    pub fn process_window(&mut self, timestamp: f32, window: &[i16]) -> Result<Option<f32>, AnalysisError> {
        let mut mono = std::mem::take(&mut self.mono);
        let result = self.process_window_with_scratch(timestamp, window, &mut mono);
        self.mono = mono;
        result
    }

    /// Process one window using a caller-supplied scratch buffer
    ///
    /// `scratch` must hold `window_size / 2` values; it may live on the stack.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a window or scratch length mismatch
    pub fn process_window_with_scratch(
        &mut self,
        timestamp: f32,
        window: &[i16],
        scratch: &mut [f32],
    ) -> Result<Option<f32>, AnalysisError> {
        if window.len() != self.config.window_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Expected {} interleaved samples, got {}",
                self.config.window_size,
                window.len()
            )));
        }
        if scratch.len() != window.len() / 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Scratch buffer must hold {} values, got {}",
                window.len() / 2,
                scratch.len()
            )));
        }

        mix_to_mono(window, scratch);
        if self.config.bit_reverse_input {
            fft::bit_reverse(&mut Interleaved(&mut *scratch));
        }
        fft::fft_interleaved(scratch)?;
        magnitude_spectrum(&Interleaved(scratch), &mut self.spectrum);

        if !self.tracker.process_window(timestamp, &self.spectrum)? {
            return Ok(None);
        }

        self.amplitudes.clear();
        self.amplitudes.extend(self.tracker.amplitudes());
        Ok(Some(dominant_frequency(
            &self.amplitudes,
            self.config.exact_dominant_frequency,
        )))
    }
}
