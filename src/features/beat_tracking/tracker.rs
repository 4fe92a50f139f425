//! Multi-band tempo tracking automaton
//!
//! Consumes one magnitude spectrum per window and maintains the tempo estimate.
//!
//! # Algorithm
//!
//! The first window of a stream only primes the amplitude averages, so a loud
//! opening is not mistaken for an onset. After that, per window, with `dt` the time
//! elapsed since the previous window:
//! 1. Split the spectrum into 128 equal ranges; each range's amplitude is the mean
//!    of its bins. Two cascaded moving averages follow the amplitude at a rate of
//!    `min(dt * 12, 1)`
//! 2. A range triggers while `amplitude_avg * 0.925 >= amplitude_lag`. On a rising
//!    edge the gap since the range's last trigger is classified (a range's first
//!    rising edge only sets the origin):
//!    - within `[60 / max_bpm, 60 / min_bpm]`, widened by a relative `1e-4` for
//!      rounding: scored against seven tolerance
//!      tiers around the range's gap average; a match adds to quality and pulls the
//!      gap averages toward the gap, a miss costs quality
//!    - beyond the window: retried as half the gap (a missed alternate beat); on a
//!      miss the gap averages are pulled toward the global beat period
//!    - below the window: ignored, the gap keeps measuring from the same origin
//! 3. Stale or off-tempo ranges lose quality in proportion to `dt`
//! 4. Ranges with above-average quality vote their lagging gap average, quantized
//!    to tenths of BPM and weighted by relative quality. With at least six voters
//!    the heaviest bucket becomes the prediction and the global beat period is
//!    low-passed toward it at the moving-average rate
//! 5. A quarter-beat timer runs on the winning period; every whole beat credits the
//!    current tempo in the high-resolution contest. Both contests decay by
//!    `dt / 12` and are capped at the finish line; their leaders are the reported
//!    tempos
//!
//! # Example
//!
//! ```no_run
//! use stratum_beat::features::beat_tracking::MultiBandTracker;
//!
//! let mut tracker = MultiBandTracker::new(100.0, 200.0)?;
//! let spectrum = vec![0.0f32; 256];
//! for i in 1..=1000 {
//!     let beat = tracker.process_window(i as f32 * 0.01, &spectrum)?;
//!     assert!(!beat);
//! }
//! assert_eq!(tracker.winning_bpm_tenths(), 0);
//! # Ok::<(), stratum_beat::AnalysisError>(())
//! ```

use super::contest::Contest;
use super::ranges::RangeTracker;
use super::{
    period_to_bpm, period_to_tenths, tenths_to_period, BeatCounters, DETECTION_RANGES,
    DETECTION_RATE, FINISH_LINE, MINIMUM_CONTRIBUTIONS, OFF_TEMPO_TOLERANCE, QUALITY_DECAY,
    QUALITY_FLOOR, QUALITY_REWARD, QUALITY_STEP, QUALITY_TOLERANCE,
};
use crate::error::AnalysisError;

/// Step used to pull a range that missed a long gap toward the global beat period
const GLOBAL_PULL: f32 = 0.5;

/// High-resolution contest entries above this score feed the low-resolution contest
const LO_FEED_THRESHOLD: f32 = 30.0;

/// Divisor applied to high-resolution scores fed into the low-resolution contest
const LO_FEED_DIVISOR: f32 = 6.0;

/// Relative slack on both ends of the gap window, so gaps accumulated from `f32`
/// timestamps still land on a boundary tempo
const GAP_TOLERANCE: f32 = 1e-4;

/// Adaptive BPM tracker over 128 frequency ranges
#[derive(Debug, Clone)]
pub struct MultiBandTracker {
    min_bpm: f32,
    max_bpm: f32,
    min_gap: f32,
    max_gap: f32,
    ranges: Vec<RangeTracker>,
    quality_avg: f32,
    ma_quality_avg: f32,
    current_period: f32,
    winning_period: f32,
    winning_bpm_tenths: u32,
    winning_bpm_lo: u32,
    beat_timer: f32,
    counters: BeatCounters,
    contest: Contest,
    contest_lo: Contest,
    draft: Contest,
    last_timestamp: f32,
    primed: bool,
}

impl MultiBandTracker {
    /// Create a tracker searching `[min_bpm, max_bpm]`
    ///
    /// The range should satisfy `max_bpm < 2 * min_bpm - 1`; wider ranges are
    /// accepted but tend to lock onto alternate beats.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `min_bpm <= 0`, `max_bpm <= min_bpm`
    /// or either bound is not finite
    pub fn new(min_bpm: f32, max_bpm: f32) -> Result<Self, AnalysisError> {
        if !(min_bpm > 0.0) || !(max_bpm > min_bpm) || !max_bpm.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                min_bpm, max_bpm
            )));
        }

        let mut tracker = Self {
            min_bpm,
            max_bpm,
            min_gap: 60.0 / max_bpm,
            max_gap: 60.0 / min_bpm,
            ranges: Vec::with_capacity(DETECTION_RANGES),
            quality_avg: QUALITY_FLOOR,
            ma_quality_avg: QUALITY_FLOOR,
            current_period: 0.0,
            winning_period: 0.0,
            winning_bpm_tenths: 0,
            winning_bpm_lo: 0,
            beat_timer: 0.0,
            counters: BeatCounters::default(),
            contest: Contest::new(),
            contest_lo: Contest::new(),
            draft: Contest::new(),
            last_timestamp: 0.0,
            primed: false,
        };
        let ranges = (0..DETECTION_RANGES)
            .map(|i| RangeTracker::new(tracker.initial_gap(i)))
            .collect();
        tracker.ranges = ranges;

        log::debug!(
            "Multi-band tracker: {} ranges, BPM [{:.1}, {:.1}], gap window [{:.3}s, {:.3}s]",
            DETECTION_RANGES,
            min_bpm,
            max_bpm,
            tracker.min_gap,
            tracker.max_gap
        );

        Ok(tracker)
    }

    /// Starting gap of range `index`
    ///
    /// Ranges are seeded across the whole search window so some of them start
    /// close to any tempo in it.
    fn initial_gap(&self, index: usize) -> f32 {
        let position = (index as f32 + 0.5) / DETECTION_RANGES as f32;
        60.0 / (self.min_bpm + (self.max_bpm - self.min_bpm) * position)
    }

    /// Inclusive gap window in seconds, with [`GAP_TOLERANCE`] applied
    fn gap_window(&self) -> (f32, f32) {
        (
            self.min_gap * (1.0 - GAP_TOLERANCE),
            self.max_gap * (1.0 + GAP_TOLERANCE),
        )
    }

    /// Clear trigger state, quality, contests and beat counters
    ///
    /// The BPM range is kept. With `keep_frequency_history` the per-range amplitude
    /// averages survive, so trigger detection resumes without a settling period;
    /// otherwise the next window primes them again.
    pub fn reset(&mut self, keep_frequency_history: bool) {
        for i in 0..self.ranges.len() {
            let gap = self.initial_gap(i);
            self.ranges[i].reset(gap, keep_frequency_history);
        }
        self.quality_avg = QUALITY_FLOOR;
        self.ma_quality_avg = QUALITY_FLOOR;
        self.current_period = 0.0;
        self.winning_period = 0.0;
        self.winning_bpm_tenths = 0;
        self.winning_bpm_lo = 0;
        self.beat_timer = 0.0;
        self.counters = BeatCounters::default();
        self.contest.clear();
        self.contest_lo.clear();
        self.draft.clear();
        self.last_timestamp = 0.0;
        self.primed = keep_frequency_history && self.primed;
    }

    /// Feed one magnitude spectrum
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Stream time of the window in seconds; a timestamp earlier than
    ///   the previous one starts a new stream (the tracker is reset)
    /// * `spectrum` - Magnitudes; the length must be a non-zero multiple of 128
    ///
    /// # Returns
    ///
    /// True if the whole-beat counter advanced during this call
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a spectrum that does not split into
    /// 128 equal ranges, `AnalysisError::NumericalError` for non-finite input
    pub fn process_window(&mut self, timestamp: f32, spectrum: &[f32]) -> Result<bool, AnalysisError> {
        if spectrum.len() < DETECTION_RANGES || spectrum.len() % DETECTION_RANGES != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Spectrum length must be a non-zero multiple of {}, got {}",
                DETECTION_RANGES,
                spectrum.len()
            )));
        }
        if !timestamp.is_finite() {
            return Err(AnalysisError::NumericalError(format!(
                "Non-finite timestamp: {}",
                timestamp
            )));
        }
        if spectrum.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::NumericalError(
                "Spectrum contains non-finite values".to_string(),
            ));
        }

        if timestamp < self.last_timestamp {
            log::debug!(
                "Timestamp moved backwards ({:.3}s -> {:.3}s), restarting tracker",
                self.last_timestamp,
                timestamp
            );
            self.reset(false);
            self.last_timestamp = timestamp;
            return Ok(false);
        }

        let dt = timestamp - self.last_timestamp;
        self.last_timestamp = timestamp;
        if dt <= 0.0 {
            return Ok(false);
        }

        if !self.primed {
            self.prime(spectrum);
            return Ok(false);
        }

        let rate = (dt * DETECTION_RATE).min(1.0);
        self.update_ranges(timestamp, dt, rate, spectrum);
        self.update_quality_average(rate);
        self.vote(rate);

        if self.current_period > 0.0 {
            Ok(self.run_contest(dt))
        } else {
            Ok(false)
        }
    }

    fn prime(&mut self, spectrum: &[f32]) {
        let step = spectrum.len() / DETECTION_RANGES;
        for (range, bins) in self.ranges.iter_mut().zip(spectrum.chunks_exact(step)) {
            range.prime(bins.iter().sum::<f32>() / step as f32);
        }
        self.primed = true;
        log::trace!("Amplitude averages primed from first window");
    }

    /// Trigger detection, gap classification and quality bookkeeping per range
    fn update_ranges(&mut self, timestamp: f32, dt: f32, rate: f32, spectrum: &[f32]) {
        let step = spectrum.len() / DETECTION_RANGES;
        let (min_gap, max_gap) = (self.min_gap, self.max_gap);
        let (lo, hi) = self.gap_window();
        let current = self.current_period;
        let quality_ref = self.quality_avg.max(QUALITY_FLOOR);

        for (range, bins) in self.ranges.iter_mut().zip(spectrum.chunks_exact(step)) {
            let amplitude = bins.iter().sum::<f32>() / step as f32;
            range.update_amplitude(amplitude, rate);
            range.clamp_gaps(min_gap, max_gap);

            let detected = range.detects();
            let mut rewarded = false;

            let rising = detected && !range.triggered;
            if let (true, Some(origin)) = (rising, range.last_trigger) {
                let gap = timestamp - origin;

                if (lo..=hi).contains(&gap) {
                    let reward = range.gap_reward(gap);
                    if reward > 0.0 {
                        accept_gap(range, gap, reward, quality_ref);
                        range.last_trigger = Some(timestamp);
                        rewarded = true;
                    } else {
                        if range.quality * QUALITY_TOLERANCE < quality_ref {
                            range.pull_gaps(gap, QUALITY_STEP);
                        }
                        range.penalize(QUALITY_STEP);
                    }
                } else if gap > hi {
                    let half = gap * 0.5;
                    if (lo..=hi).contains(&half) {
                        let reward = range.gap_reward(half);
                        if reward > 0.0 {
                            accept_gap(range, half, reward, quality_ref);
                            rewarded = true;
                        }
                    }
                    if !rewarded {
                        if current > 0.0 {
                            range.pull_gaps(current, GLOBAL_PULL);
                        } else {
                            range.pull_gaps(half.clamp(min_gap, max_gap), QUALITY_STEP);
                        }
                        range.penalize(QUALITY_STEP);
                    }
                    range.last_trigger = Some(timestamp);
                }
            } else if rising {
                range.last_trigger = Some(timestamp);
            }

            let stale = !rewarded
                && range
                    .last_trigger
                    .map_or(false, |origin| timestamp - origin > max_gap);
            let off_tempo = detected
                && current > 0.0
                && (range.gap_avg - current).abs() > current * OFF_TEMPO_TOLERANCE;
            if stale || off_tempo {
                range.decay_quality(QUALITY_STEP * QUALITY_DECAY * dt);
            }

            range.triggered = detected;
        }
    }

    fn update_quality_average(&mut self, rate: f32) {
        let total: f32 = self.ranges.iter().map(|r| r.quality).sum();
        self.quality_avg = (total / self.ranges.len() as f32).max(QUALITY_FLOOR);
        self.ma_quality_avg -= (self.ma_quality_avg - self.quality_avg) * rate;
    }

    /// Draft vote over the ranges and low-pass of the global beat period
    fn vote(&mut self, rate: f32) {
        self.draft.clear();
        let mut contributions = 0;
        let (lo, hi) = self.gap_window();

        for range in &self.ranges {
            let eligible = range.quality > QUALITY_FLOOR
                && range.quality * QUALITY_TOLERANCE >= self.ma_quality_avg
                && (lo..=hi).contains(&range.gap_lag);
            if eligible {
                self.draft
                    .credit(period_to_tenths(range.gap_lag), range.quality / self.quality_avg);
                contributions += 1;
            }
        }

        if contributions < MINIMUM_CONTRIBUTIONS {
            return;
        }
        let Some((bucket, weight)) = self.draft.leader() else {
            return;
        };

        let predicted = tenths_to_period(bucket).clamp(self.min_gap, self.max_gap);
        if self.current_period == 0.0 {
            self.current_period = predicted;
            log::debug!(
                "First tempo prediction: {:.1} BPM from {} ranges",
                period_to_bpm(predicted),
                contributions
            );
        } else {
            self.current_period -= (self.current_period - predicted) * rate;
        }
        log::trace!(
            "Draft: {} ranges, leader {} (weight {:.2}), current {:.2} BPM",
            contributions,
            bucket,
            weight,
            period_to_bpm(self.current_period)
        );
    }

    /// Beat timer and contest bookkeeping; returns true on a whole-beat increment
    fn run_contest(&mut self, dt: f32) -> bool {
        for (bucket, score) in self.contest.iter() {
            if score > LO_FEED_THRESHOLD {
                let lo_bucket = (bucket as f32 / 10.0).round() as i32;
                self.contest_lo.credit(lo_bucket, score / LO_FEED_DIVISOR * dt);
            }
        }

        let decay = dt / DETECTION_RATE;
        self.contest.decay(decay);
        self.contest_lo.decay(decay);

        let mut beat = false;
        let beat_period = if self.winning_period > 0.0 {
            self.winning_period
        } else {
            self.current_period
        };
        let quarter_period = beat_period / 4.0;

        self.beat_timer += dt;
        if self.beat_timer > quarter_period {
            self.beat_timer %= quarter_period;

            let previous_whole = self.counters.whole;
            self.counters.quarter += 1;
            self.counters.half = self.counters.quarter / 2;
            self.counters.whole = self.counters.quarter / 4;

            if self.counters.whole > previous_whole {
                beat = true;
                self.contest
                    .credit(period_to_tenths(self.current_period), QUALITY_REWARD);
            }
        }

        self.contest.rescale(FINISH_LINE);
        self.contest_lo.rescale(FINISH_LINE);

        if let Some((bucket, _)) = self.contest.leader() {
            self.winning_bpm_tenths = bucket.max(0) as u32;
            self.winning_period = tenths_to_period(bucket);
        }
        if let Some((bucket, _)) = self.contest_lo.leader() {
            self.winning_bpm_lo = bucket.max(0) as u32;
        }

        beat
    }

    /// Winning BPM of the high-resolution contest in tenths (0 until a tempo wins)
    pub fn winning_bpm_tenths(&self) -> u32 {
        self.winning_bpm_tenths
    }

    /// Winning BPM of the 1-BPM resolution contest (0 until a tempo wins)
    pub fn winning_bpm_lo(&self) -> u32 {
        self.winning_bpm_lo
    }

    /// Continuously refined BPM estimate (0.0 until the first prediction)
    pub fn current_bpm(&self) -> f32 {
        period_to_bpm(self.current_period)
    }

    /// Searched BPM range
    pub fn bpm_range(&self) -> (f32, f32) {
        (self.min_bpm, self.max_bpm)
    }

    /// Quality of range `index`
    pub fn quality(&self, index: usize) -> f32 {
        self.ranges[index].quality
    }

    /// State of range `index`
    pub fn range(&self, index: usize) -> &RangeTracker {
        &self.ranges[index]
    }

    /// Quarter, half and whole beat counters
    pub fn beat_counters(&self) -> BeatCounters {
        self.counters
    }

    /// High-resolution (0.1 BPM) contest
    pub fn contest(&self) -> &Contest {
        &self.contest
    }

    /// Low-resolution (1 BPM) contest
    pub fn contest_lo(&self) -> &Contest {
        &self.contest_lo
    }

    /// Current amplitude of every range, in range order
    pub fn amplitudes(&self) -> impl Iterator<Item = f32> + '_ {
        self.ranges.iter().map(|r| r.amplitude)
    }
}

/// Credit a matched gap and pull the range's gap averages toward it
fn accept_gap(range: &mut RangeTracker, gap: f32, reward: f32, quality_ref: f32) {
    range.quality += reward;
    let step = (range.quality / quality_ref * QUALITY_STEP).min(1.0);
    range.pull_gaps(gap, step);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECTRUM_LEN: usize = 256;

    /// Feed a spectrum that spikes every `period` seconds over a low floor
    fn feed_spikes(tracker: &mut MultiBandTracker, period: f32, dt: f32, duration: f32) -> usize {
        let quiet = vec![0.01f32; SPECTRUM_LEN];
        let loud = vec![1.0f32; SPECTRUM_LEN];
        let steps = (duration / dt).round() as usize;
        let spike_every = (period / dt).round() as usize;
        let mut beats = 0;

        for step in 1..=steps {
            let spectrum = if step % spike_every == 0 { &loud } else { &quiet };
            if tracker.process_window(step as f32 * dt, spectrum).unwrap() {
                beats += 1;
            }
        }
        beats
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(MultiBandTracker::new(0.0, 100.0).is_err());
        assert!(MultiBandTracker::new(120.0, 100.0).is_err());
        assert!(MultiBandTracker::new(100.0, f32::INFINITY).is_err());
        assert!(MultiBandTracker::new(100.0, 200.0).is_ok());
    }

    #[test]
    fn test_invalid_spectrum_rejected() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        assert!(matches!(
            tracker.process_window(0.01, &[0.0; 100]),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            tracker.process_window(0.01, &[0.0; 200]),
            Err(AnalysisError::InvalidInput(_))
        ));

        let mut spectrum = vec![0.0f32; 128];
        spectrum[3] = f32::NAN;
        assert!(matches!(
            tracker.process_window(0.01, &spectrum),
            Err(AnalysisError::NumericalError(_))
        ));
    }

    #[test]
    fn test_initial_gaps_span_search_window() {
        let tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        let first = tracker.range(0).gap_avg;
        let last = tracker.range(DETECTION_RANGES - 1).gap_avg;
        assert!(first < 0.6 && first > 0.59);
        assert!(last > 0.3 && last < 0.31);
    }

    #[test]
    fn test_silence_never_wins() {
        let mut tracker = MultiBandTracker::new(90.0, 180.0).unwrap();
        let silence = vec![0.0f32; SPECTRUM_LEN];
        for i in 1..=2000 {
            assert!(!tracker.process_window(i as f32 * 0.0116, &silence).unwrap());
        }
        assert_eq!(tracker.winning_bpm_tenths(), 0);
        assert_eq!(tracker.winning_bpm_lo(), 0);
        assert_eq!(tracker.current_bpm(), 0.0);
        assert!(tracker.contest().is_empty());
    }

    #[test]
    fn test_quality_floored_after_stale_windows() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.5, 0.01, 5.0);
        assert!((0..DETECTION_RANGES).any(|i| tracker.quality(i) > QUALITY_FLOOR));

        // No more spikes: every range goes stale
        let quiet = vec![0.01f32; SPECTRUM_LEN];
        for step in 1..=20_000 {
            tracker.process_window(5.0 + step as f32 * 0.01, &quiet).unwrap();
        }
        for i in 0..DETECTION_RANGES {
            let quality = tracker.quality(i);
            assert!(quality >= QUALITY_FLOOR, "range {} quality {}", i, quality);
            assert!(quality < 0.1, "range {} quality {}", i, quality);
        }
    }

    #[test]
    fn test_contests_capped_at_finish_line() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        let quiet = vec![0.01f32; SPECTRUM_LEN];
        let loud = vec![1.0f32; SPECTRUM_LEN];

        for step in 1..=3000 {
            let spectrum = if step % 50 == 0 { &loud } else { &quiet };
            tracker.process_window(step as f32 * 0.01, spectrum).unwrap();
            assert!(tracker.contest().max() <= FINISH_LINE);
            assert!(tracker.contest_lo().max() <= FINISH_LINE);
        }
    }

    #[test]
    fn test_periodic_spike_converges() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        let beats = feed_spikes(&mut tracker, 0.5, 0.01, 30.0);

        let winning = tracker.winning_bpm_tenths();
        assert!((1198..=1202).contains(&winning), "winning {}", winning);
        assert_eq!(tracker.winning_bpm_lo(), 120);
        assert!((tracker.current_bpm() - 120.0).abs() < 1.0);
        assert!((50..=61).contains(&beats), "beats {}", beats);
    }

    #[test]
    fn test_periodic_spike_other_tempo() {
        // 0.4s apart = 150 BPM
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.4, 0.01, 30.0);
        let winning = tracker.winning_bpm_tenths();
        assert!((1495..=1505).contains(&winning), "winning {}", winning);
    }

    #[test]
    fn test_spike_at_fastest_tempo() {
        // 0.3s apart = 200 BPM, the top of the window
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.3, 0.01, 30.0);
        let winning = tracker.winning_bpm_tenths();
        assert!((1998..=2002).contains(&winning), "winning {}", winning);
        assert_eq!(tracker.winning_bpm_lo(), 200);
    }

    #[test]
    fn test_spike_at_slowest_tempo() {
        // 0.6s apart = 100 BPM, the bottom of the window
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.6, 0.01, 30.0);
        let winning = tracker.winning_bpm_tenths();
        assert!((998..=1002).contains(&winning), "winning {}", winning);
        assert_eq!(tracker.winning_bpm_lo(), 100);

        let mut narrow = MultiBandTracker::new(100.0, 150.0).unwrap();
        feed_spikes(&mut narrow, 0.4, 0.01, 30.0);
        let winning = narrow.winning_bpm_tenths();
        assert!((1498..=1502).contains(&winning), "winning {}", winning);
    }

    #[test]
    fn test_loud_first_window_is_not_an_onset() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        let loud = vec![1.0f32; SPECTRUM_LEN];
        tracker.process_window(0.01, &loud).unwrap();
        assert_eq!(tracker.range(0).amplitude_avg, 1.0);
        assert!(!tracker.range(0).triggered);

        // Steady level afterwards never triggers, so no origin is set
        for step in 2..=100 {
            tracker.process_window(step as f32 * 0.01, &loud).unwrap();
        }
        assert!((0..DETECTION_RANGES).all(|i| tracker.range(i).last_trigger.is_none()));
    }

    #[test]
    fn test_backwards_timestamp_resets() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.5, 0.01, 10.0);
        assert!(tracker.winning_bpm_tenths() > 0);

        let quiet = vec![0.01f32; SPECTRUM_LEN];
        assert!(!tracker.process_window(0.5, &quiet).unwrap());
        assert_eq!(tracker.winning_bpm_tenths(), 0);
        assert_eq!(tracker.beat_counters(), BeatCounters::default());
        assert!(tracker.contest().is_empty());
    }

    #[test]
    fn test_reset_keeps_frequency_history() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        feed_spikes(&mut tracker, 0.5, 0.01, 3.0);
        let amplitude_avg = tracker.range(10).amplitude_avg;
        assert!(amplitude_avg > 0.0);

        tracker.reset(true);
        assert_eq!(tracker.range(10).amplitude_avg, amplitude_avg);
        assert_eq!(tracker.quality(10), QUALITY_FLOOR);
        assert_eq!(tracker.bpm_range(), (100.0, 200.0));

        tracker.reset(false);
        assert_eq!(tracker.range(10).amplitude_avg, 0.0);
    }

    #[test]
    fn test_repeated_timestamp_is_ignored() {
        let mut tracker = MultiBandTracker::new(100.0, 200.0).unwrap();
        let loud = vec![1.0f32; SPECTRUM_LEN];
        tracker.process_window(0.1, &loud).unwrap();
        let before = tracker.range(0).clone();
        assert!(!tracker.process_window(0.1, &loud).unwrap());
        assert_eq!(tracker.range(0), &before);
    }
}
