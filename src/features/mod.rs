//! Feature extraction modules
//!
//! - In-place radix-2 transform
//! - Spectral energy-variance beat detection
//! - Adaptive multi-band BPM estimation

pub mod beat_tracking;
pub mod fft;
pub mod onset;

/// Dominant-frequency indicator: index of the largest value normalized by length
///
/// With `exact == false` the index is divided by the length in integer arithmetic
/// before conversion, reproducing the historical behavior: the result truncates to
/// 0.0 for every index. Pass `exact == true` for the real-valued ratio in [0.0, 1.0).
pub fn dominant_frequency(values: &[f32], exact: bool) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut peak_index = 0;
    let mut peak = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > peak {
            peak = v;
            peak_index = i;
        }
    }

    if exact {
        peak_index as f32 / values.len() as f32
    } else {
        (peak_index / values.len()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_frequency() {
        let values = [0.0, 1.0, 5.0, 2.0];
        assert_eq!(dominant_frequency(&values, true), 0.5);
        assert_eq!(dominant_frequency(&values, false), 0.0);
        assert_eq!(dominant_frequency(&[], true), 0.0);
    }

    #[test]
    fn test_dominant_frequency_first_peak_wins() {
        let values = [3.0, 1.0, 3.0, 0.0];
        assert_eq!(dominant_frequency(&values, true), 0.0);
    }
}
