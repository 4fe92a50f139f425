//! Spectral energy-variance beat detection
//!
//! Flags transient energy spikes per frequency band.
//!
//! # Algorithm
//!
//! For each window (1024 frames, hop 256):
//! 1. Pack left/right samples as the real/imaginary parts of a complex buffer
//! 2. Transform and compute the Fourier score of each bin: `re² + im²`
//! 3. Per band: `energy = width * (sum of scores in band / window length)`
//! 4. Compare each band energy against the average and variance of its last 24
//!    window energies: the band fires when `energy > 250 * average` and
//!    `variance > 150`
//! 5. If any band fires, emit one beat at the window midpoint
//! 6. Push the energies into the band histories
//!
//! A trailing window shorter than the window length is never processed: partial
//! windows give unreliable band statistics.
//!
//! # Example
//!
//! ```no_run
//! use stratum_beat::features::onset::spectral_energy::SpectralBeatDetector;
//! use stratum_beat::SpectralConfig;
//!
//! let samples = vec![0i16; 2 * 44100 * 10]; // 10 seconds of stereo silence
//! let mut detector = SpectralBeatDetector::new(SpectralConfig::default())?;
//! let timeline = detector.detect(&samples, 44100)?;
//! assert!(timeline.is_empty());
//! # Ok::<(), stratum_beat::AnalysisError>(())
//! ```

use super::bands::BandLayout;
use super::history::EnergyHistory;
use crate::analysis::metadata::ScanMetadata;
use crate::analysis::result::{BeatEvent, BeatReport, EventTimeline};
use crate::config::SpectralConfig;
use crate::error::AnalysisError;
use crate::features::dominant_frequency;
use crate::features::fft::{self, power_spectrum};
use crate::io::sample_buffer::PcmBuffer;
use crate::preprocessing::channel_mixer::pack_stereo_complex;
use rustfft::num_complex::Complex;
use std::time::Instant;

/// Spectral energy-variance beat detector
///
/// Holds the band layout, one energy history per band and reusable scratch buffers.
/// State persists across calls to [`detect`](Self::detect) until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct SpectralBeatDetector {
    config: SpectralConfig,
    layout: BandLayout,
    histories: Vec<EnergyHistory>,
    buffer: Vec<Complex<f32>>,
    scores: Vec<f32>,
    energies: Vec<f32>,
}

impl SpectralBeatDetector {
    /// Create a detector
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    pub fn new(config: SpectralConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let layout = BandLayout::linear_ramp(config.window_size, config.band_count);
        let histories = vec![EnergyHistory::new(config.history_size); config.band_count];

        log::debug!(
            "Spectral detector: window={}, hop={}, bands={}, history={}",
            config.window_size,
            config.hop_size,
            config.band_count,
            config.history_size
        );

        Ok(Self {
            buffer: Vec::with_capacity(config.window_size),
            scores: Vec::with_capacity(config.window_size),
            energies: vec![0.0; config.band_count],
            config,
            layout,
            histories,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SpectralConfig {
        &self.config
    }

    /// Band partition of the spectrum
    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    /// Band energies of the most recently processed window
    pub fn band_energies(&self) -> &[f32] {
        &self.energies
    }

    /// Energy history of band `index`
    pub fn history(&self, index: usize) -> &EnergyHistory {
        &self.histories[index]
    }

    /// Clear all band histories; configuration and layout are kept
    pub fn reset(&mut self) {
        for history in &mut self.histories {
            history.clear();
        }
        self.energies.iter_mut().for_each(|e| *e = 0.0);
    }

    /// Scan an interleaved stereo buffer and return the detected beats
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

    /// Scan a buffer and return the beats together with scan metadata
    pub fn analyze(&mut self, pcm: PcmBuffer<'_>) -> Result<BeatReport, AnalysisError> {
        let start_time = Instant::now();
        let sample_rate = pcm.sample_rate();

        log::debug!(
            "Detecting spectral beats: {} frames at {} Hz",
            pcm.frames(),
            sample_rate
        );
        if pcm.frames() < self.config.window_size {
            log::warn!(
                "Buffer ({} frames) shorter than one window ({}), no beats detected",
                pcm.frames(),
                self.config.window_size
            );
        }

        let mut timeline = EventTimeline::new();
        let mut windows_processed = 0;

        for window in pcm.windows(self.config.window_size, self.config.hop_size) {
            windows_processed += 1;
            if let Some(frequency) = self.process_window(window.samples)? {
                let time = window.midpoint_seconds(sample_rate);
                log::trace!("Beat at {:.3}s (frequency indicator {:.3})", time, frequency);
                timeline.push(BeatEvent::new(time, frequency));
            }
        }

        log::debug!(
            "Spectral detector found {} beats in {} windows",
            timeline.len(),
            windows_processed
        );

        Ok(BeatReport {
            timeline,
            metadata: ScanMetadata {
                engine: "spectral-energy".to_string(),
                duration_seconds: pcm.duration_seconds(),
                sample_rate,
                windows_processed,
                processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
                ..ScanMetadata::default()
            },
        })
    }

    /// Process one window of interleaved stereo samples
    ///
    /// # Returns
    ///
    /// `Some(frequency indicator)` if one or more bands fired, `None` otherwise
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the window does not hold exactly
    /// `window_size` frames
    pub fn process_window(&mut self, window: &[i16]) -> Result<Option<f32>, AnalysisError> {
        let window_size = self.config.window_size;
        if window.len() != window_size * 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Expected {} interleaved samples, got {}",
                window_size * 2,
                window.len()
            )));
        }

        pack_stereo_complex(window, &mut self.buffer);
        if self.config.bit_reverse_input {
            fft::bit_reverse(&mut self.buffer[..]);
        }
        fft::fft(&mut self.buffer)?;
        power_spectrum(&self.buffer[..], &mut self.scores);

        let mut fired = 0usize;
        for (band, range) in self.layout.iter().enumerate() {
            let width = range.len() as f32;
            let band_sum: f32 = self.scores[range].iter().sum();
            let energy = width * (band_sum / window_size as f32);

            let history = &mut self.histories[band];
            if !history.is_empty() {
                let average = history.average();
                let variance = history.variance();
                if energy > self.config.energy_ratio * average && variance > self.config.variance_floor {
                    fired += 1;
                }
            }
            history.push(energy);
            self.energies[band] = energy;
        }

        if fired == 0 {
            return Ok(None);
        }

        log::trace!("{} of {} bands fired", fired, self.layout.len());
        Ok(Some(dominant_frequency(
            &self.scores,
            self.config.exact_dominant_frequency,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noise in [-1.0, 1.0]
    fn noise(i: usize) -> f32 {
        let x = (i as f32 * 12.9898).sin() * 43758.547;
        (x - x.floor()) * 2.0 - 1.0
    }

    /// Stereo click track: a short decaying noise burst every `interval` seconds over a
    /// low noise floor
    fn click_track(duration: f32, interval: f32, sample_rate: u32) -> (Vec<i16>, Vec<f32>) {
        let frames = (duration * sample_rate as f32) as usize;
        let click_frames = (0.005 * sample_rate as f32) as usize;
        let mut samples = vec![0i16; frames * 2];
        for i in 0..frames {
            let floor = noise(i) * 8.0;
            samples[2 * i] = floor as i16;
            samples[2 * i + 1] = (noise(i + 7919) * 8.0) as i16;
        }

        let mut clicks = Vec::new();
        let mut t = 0.25f32;
        while t < duration {
            let start = (t * sample_rate as f32) as usize;
            for k in 0..click_frames.min(frames.saturating_sub(start)) {
                let env = (-(k as f32) / click_frames as f32 * 4.0).exp();
                let v = (noise(start + k + 104729) * 20000.0 * env) as i16;
                samples[2 * (start + k)] = v;
                samples[2 * (start + k) + 1] = v;
            }
            clicks.push(t);
            t += interval;
        }
        (samples, clicks)
    }

    #[test]
    fn test_silence_produces_no_beats() {
        let samples = vec![0i16; 2 * 44100 * 3];
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();
        let timeline = detector.detect(&samples, 44100).unwrap();
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_buffer_shorter_than_window() {
        let samples = vec![1000i16; 2 * 1000];
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();
        let timeline = detector.detect(&samples, 44100).unwrap();
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();
        assert!(detector.detect(&[0i16; 3], 44100).is_err());
        assert!(detector.detect(&[0i16; 4], 0).is_err());
        assert!(detector.process_window(&[0i16; 100]).is_err());
    }

    #[test]
    fn test_click_track_beats_follow_clicks() {
        let sample_rate = 44100;
        let (samples, clicks) = click_track(4.0, 0.5, sample_rate);
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();
        let timeline = detector.detect(&samples, sample_rate).unwrap();

        assert!(
            timeline.len() >= clicks.len() / 2,
            "Expected beats for most of {} clicks, got {}",
            clicks.len(),
            timeline.len()
        );

        let duration = samples.len() as f32 / 2.0 / sample_rate as f32;
        let mut last = 0.0f32;
        for event in &timeline {
            assert!(event.time_seconds >= last, "Timestamps must be non-decreasing");
            assert!(event.time_seconds < duration);
            last = event.time_seconds;

            let nearest = clicks
                .iter()
                .map(|c| (c - event.time_seconds).abs())
                .fold(f32::MAX, f32::min);
            assert!(nearest < 0.03, "Beat at {:.3}s is {:.3}s from any click", event.time_seconds, nearest);

            // Truncating division of bin index by spectrum length
            assert_eq!(event.frequency, 0.0);
        }
    }

    #[test]
    fn test_exact_dominant_frequency() {
        let (samples, _) = click_track(2.0, 0.5, 44100);
        let config = SpectralConfig {
            exact_dominant_frequency: true,
            ..SpectralConfig::default()
        };
        let mut detector = SpectralBeatDetector::new(config).unwrap();
        let timeline = detector.detect(&samples, 44100).unwrap();
        assert!(!timeline.is_empty());
        assert!(timeline.iter().all(|e| (0.0..1.0).contains(&e.frequency)));
    }

    #[test]
    fn test_no_beat_when_energy_drops() {
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();
        let loud: Vec<i16> = (0..2048).map(|i| (noise(i) * 20000.0) as i16).collect();
        let quiet: Vec<i16> = (0..2048).map(|i| (noise(i + 3) * 50.0) as i16).collect();

        for _ in 0..30 {
            detector.process_window(&loud).unwrap();
        }
        for _ in 0..30 {
            // Every band sits below its history average
            assert_eq!(detector.process_window(&quiet).unwrap(), None);
        }
    }

    #[test]
    fn test_reset_reproduces_timeline() {
        let (samples, _) = click_track(3.0, 0.5, 44100);
        let mut detector = SpectralBeatDetector::new(SpectralConfig::default()).unwrap();

        let first = detector.detect(&samples, 44100).unwrap();
        detector.reset();
        let second = detector.detect(&samples, 44100).unwrap();

        assert_eq!(first, second);
        assert!(detector.history(0).len() <= 24);
    }
}
