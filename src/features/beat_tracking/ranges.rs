//! Per-range trigger tracker records
//!
//! One record per frequency range, so every quantity of a range lives together and
//! index alignment holds by construction.

use super::{
    DETECTION_FACTOR, QUALITY_FLOOR, QUALITY_REWARD, REWARD_MULTIPLIERS, REWARD_TOLERANCES,
};

/// Trigger-timing state of one frequency range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTracker {
    /// Mean magnitude of the range's bins in the latest window
    pub amplitude: f32,

    /// Moving average of `amplitude`
    pub amplitude_avg: f32,

    /// Moving average of `amplitude_avg` (lagging)
    pub amplitude_lag: f32,

    /// Moving average of accepted trigger gaps in seconds
    pub gap_avg: f32,

    /// Moving average of `gap_avg` (lagging); this is what the range votes with
    pub gap_lag: f32,

    /// Timestamp the current gap is measured from, in seconds; `None` until the
    /// range's first rising edge
    pub last_trigger: Option<f32>,

    /// Reliability score, never below [`QUALITY_FLOOR`]
    pub quality: f32,

    /// Whether the range is currently triggered
    pub triggered: bool,
}

impl RangeTracker {
    /// Create a quiescent range whose gap averages start at `initial_gap` seconds
    pub fn new(initial_gap: f32) -> Self {
        Self {
            amplitude: 0.0,
            amplitude_avg: 0.0,
            amplitude_lag: 0.0,
            gap_avg: initial_gap,
            gap_lag: initial_gap,
            last_trigger: None,
            quality: QUALITY_FLOOR,
            triggered: false,
        }
    }

    /// Return to the initial state, optionally keeping the amplitude averages
    pub fn reset(&mut self, initial_gap: f32, keep_amplitude: bool) {
        let amplitudes = (self.amplitude, self.amplitude_avg, self.amplitude_lag);
        *self = Self::new(initial_gap);
        if keep_amplitude {
            (self.amplitude, self.amplitude_avg, self.amplitude_lag) = amplitudes;
        }
    }

    /// Start both moving averages at `amplitude`, as if it had been steady forever
    pub fn prime(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
        self.amplitude_avg = amplitude;
        self.amplitude_lag = amplitude;
        self.triggered = self.detects();
    }

    /// Feed the latest amplitude through both cascaded moving averages
    ///
    /// `rate` is the fraction of the distance each average moves this window.
    pub fn update_amplitude(&mut self, amplitude: f32, rate: f32) {
        self.amplitude = amplitude;
        self.amplitude_avg -= (self.amplitude_avg - amplitude) * rate;
        self.amplitude_lag -= (self.amplitude_lag - self.amplitude_avg) * rate;
    }

    /// Trigger condition: the fast average has risen clear of the lagging one
    pub fn detects(&self) -> bool {
        self.amplitude_avg * DETECTION_FACTOR >= self.amplitude_lag
    }

    /// Keep both gap averages within `[min_gap, max_gap]`
    pub fn clamp_gaps(&mut self, min_gap: f32, max_gap: f32) {
        self.gap_avg = self.gap_avg.clamp(min_gap, max_gap);
        self.gap_lag = self.gap_lag.clamp(min_gap, max_gap);
    }

    /// Quality reward for an observed gap
    ///
    /// Every tolerance tier the gap falls within (relative to the gap average) adds
    /// its multiplier times [`QUALITY_REWARD`]; 0.0 if no tier matches.
    pub fn gap_reward(&self, gap: f32) -> f32 {
        let deviation = (self.gap_avg - gap).abs();
        REWARD_TOLERANCES
            .iter()
            .zip(REWARD_MULTIPLIERS.iter())
            .filter(|(&tolerance, _)| deviation < self.gap_avg * tolerance)
            .map(|(_, &multiplier)| QUALITY_REWARD * multiplier)
            .sum()
    }

    /// Move the gap average toward `target` by `step`, and the lagging average
    /// toward the gap average by the same step
    pub fn pull_gaps(&mut self, target: f32, step: f32) {
        self.gap_avg -= (self.gap_avg - target) * step;
        self.gap_lag -= (self.gap_lag - self.gap_avg) * step;
    }

    /// Subtract `amount` from quality, respecting the floor
    pub fn penalize(&mut self, amount: f32) {
        self.quality = (self.quality - amount).max(QUALITY_FLOOR);
    }

    /// Shrink quality by `fraction` of itself, respecting the floor
    pub fn decay_quality(&mut self, fraction: f32) {
        self.quality = (self.quality - self.quality * fraction).max(QUALITY_FLOOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_range_is_quiescent() {
        let range = RangeTracker::new(0.4);
        assert!(!range.triggered);
        assert_eq!(range.quality, QUALITY_FLOOR);
        assert_eq!(range.gap_avg, 0.4);
        assert_eq!(range.gap_lag, 0.4);
        assert_eq!(range.last_trigger, None);
    }

    #[test]
    fn test_prime_settles_averages() {
        let mut range = RangeTracker::new(0.5);
        range.prime(0.3);
        assert_eq!(range.amplitude_avg, 0.3);
        assert_eq!(range.amplitude_lag, 0.3);
        // Steady input is not an onset
        assert!(!range.detects());
        assert!(!range.triggered);

        range.update_amplitude(0.3, 0.12);
        assert!(!range.detects());
    }

    #[test]
    fn test_rising_amplitude_triggers() {
        let mut range = RangeTracker::new(0.5);
        for _ in 0..50 {
            range.update_amplitude(0.01, 0.12);
        }
        // Flat input: the lagging average catches up
        assert!(!range.detects());

        range.update_amplitude(1.0, 0.12);
        assert!(range.detects());

        for _ in 0..10 {
            range.update_amplitude(0.0, 0.12);
        }
        assert!(!range.detects());
    }

    #[test]
    fn test_gap_reward_tiers() {
        let range = RangeTracker::new(0.5);

        // Exact match hits every tier
        let all: f32 = REWARD_MULTIPLIERS.iter().sum::<f32>() * QUALITY_REWARD;
        assert!((range.gap_reward(0.5) - all).abs() < 1e-4);

        // 3% off: only the 4%, 8% and 10% tiers
        let expected = (0.5 + 0.25 + 0.125) * QUALITY_REWARD;
        assert!((range.gap_reward(0.515) - expected).abs() < 1e-4);

        // 20% off: nothing
        assert_eq!(range.gap_reward(0.6), 0.0);
    }

    #[test]
    fn test_pull_gaps() {
        let mut range = RangeTracker::new(0.4);
        range.pull_gaps(0.5, 0.5);
        assert!((range.gap_avg - 0.45).abs() < 1e-6);
        assert!((range.gap_lag - 0.425).abs() < 1e-6);

        range.pull_gaps(0.5, 1.0);
        assert!((range.gap_avg - 0.5).abs() < 1e-6);
        assert!((range.gap_lag - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_quality_never_below_floor() {
        let mut range = RangeTracker::new(0.5);
        range.quality = 1.0;
        range.penalize(5.0);
        assert_eq!(range.quality, QUALITY_FLOOR);

        range.quality = 1.0;
        for _ in 0..100_000 {
            range.decay_quality(0.5);
        }
        assert_eq!(range.quality, QUALITY_FLOOR);
        assert!(range.quality > 0.0);
    }

    #[test]
    fn test_reset_keeps_amplitude_on_request() {
        let mut range = RangeTracker::new(0.5);
        range.update_amplitude(2.0, 0.5);
        range.quality = 10.0;
        range.triggered = true;
        range.last_trigger = Some(1.5);

        range.reset(0.45, true);
        assert_eq!(range.amplitude, 2.0);
        assert_eq!(range.amplitude_avg, 1.0);
        assert_eq!(range.quality, QUALITY_FLOOR);
        assert!(!range.triggered);
        assert_eq!(range.last_trigger, None);
        assert_eq!(range.gap_avg, 0.45);

        range.reset(0.45, false);
        assert_eq!(range.amplitude_avg, 0.0);
    }
}
