//! Adaptive multi-band BPM estimation
//!
//! Tracks trigger timing independently in 128 frequency ranges and votes the
//! per-range evidence into one tempo estimate:
//! - Per-range tracker records (amplitude and gap moving averages, quality)
//! - Contest tables keyed by quantized tempo
//! - The tracker automaton fed one magnitude spectrum per window
//! - The estimator driving the tracker over a sample buffer

pub mod contest;
pub mod estimator;
pub mod ranges;
pub mod tracker;

pub use contest::Contest;
pub use estimator::BpmEstimator;
pub use ranges::RangeTracker;
pub use tracker::MultiBandTracker;

/// Number of equal-width frequency ranges tracked independently
pub const DETECTION_RANGES: usize = 128;

/// Moving averages approach their input at a rate of `1 / DETECTION_RATE` seconds;
/// contest tables decay over the same time scale
pub const DETECTION_RATE: f32 = 12.0;

/// A range triggers when `amplitude_avg * DETECTION_FACTOR >= amplitude_lag`
pub const DETECTION_FACTOR: f32 = 0.925;

/// Quality decay weight for stale or off-tempo ranges
pub const QUALITY_DECAY: f32 = 0.6;

/// Ranges vote when `quality * QUALITY_TOLERANCE >= average quality`
pub const QUALITY_TOLERANCE: f32 = 0.96;

/// Reward unit for matched gaps and contest credit
pub const QUALITY_REWARD: f32 = 7.0;

/// Roaming speed of gap averages and quality penalty per missed gap
pub const QUALITY_STEP: f32 = 0.1;

/// Quality never drops below this value
pub const QUALITY_FLOOR: f32 = 0.001;

/// Minimum number of voting ranges for a tempo prediction
pub const MINIMUM_CONTRIBUTIONS: usize = 6;

/// Contest tables are rescaled so no entry exceeds this value
pub const FINISH_LINE: f32 = 60.0;

/// Relative tolerance tiers a trigger gap is scored against (0.1% .. 10%)
pub const REWARD_TOLERANCES: [f32; 7] = [0.001, 0.005, 0.01, 0.02, 0.04, 0.08, 0.10];

/// Reward multipliers matching [`REWARD_TOLERANCES`]
pub const REWARD_MULTIPLIERS: [f32; 7] = [20.0, 10.0, 8.0, 1.0, 0.5, 0.25, 0.125];

/// A range whose gap average sits further than this fraction from the global beat
/// period is considered off-tempo
pub const OFF_TEMPO_TOLERANCE: f32 = 0.10;

/// Quarter, half and whole beat counters advanced by the beat timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeatCounters {
    /// Quarter beats elapsed
    pub quarter: u64,

    /// Half beats elapsed (`quarter / 2`)
    pub half: u64,

    /// Whole beats elapsed (`quarter / 4`)
    pub whole: u64,
}

/// Convert a beat period in seconds to BPM
pub fn period_to_bpm(period: f32) -> f32 {
    if period > 0.0 {
        60.0 / period
    } else {
        0.0
    }
}

/// Quantize a beat period to tenths of BPM (0.5 s -> 1200)
pub fn period_to_tenths(period: f32) -> i32 {
    (600.0 / period).round() as i32
}

/// Beat period in seconds of a tempo in tenths of BPM (1200 -> 0.5 s)
pub fn tenths_to_period(tenths: i32) -> f32 {
    600.0 / tenths as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_conversions() {
        assert_eq!(period_to_tenths(0.5), 1200);
        assert_eq!(period_to_tenths(60.0 / 128.0), 1280);
        assert!((tenths_to_period(1200) - 0.5).abs() < 1e-6);
        assert!((period_to_bpm(0.5) - 120.0).abs() < 1e-4);
        assert_eq!(period_to_bpm(0.0), 0.0);
    }

    #[test]
    fn test_reward_tiers_decrease() {
        assert_eq!(REWARD_TOLERANCES.len(), REWARD_MULTIPLIERS.len());
        assert!(REWARD_TOLERANCES.windows(2).all(|w| w[0] < w[1]));
        assert!(REWARD_MULTIPLIERS.windows(2).all(|w| w[0] > w[1]));
    }
}
