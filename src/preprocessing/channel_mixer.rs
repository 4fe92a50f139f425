//! Channel packing for the transform
//!
//! The spectral detector carries the two channels through one complex transform
//! (left as the real part, right as the imaginary part). The BPM estimator mixes the
//! channels to one normalized signal and packs consecutive values as interleaved
//! real/imaginary pairs, halving the transform length.

use rustfft::num_complex::Complex;

/// Full-scale value of a signed 16-bit sample
const I16_FULL_SCALE: f32 = 32768.0;

/// Pack an interleaved stereo window into complex samples (re = left, im = right)
///
/// Sample values are kept at their raw 16-bit scale.
///
/// # Arguments
///
/// * `window` - Interleaved `[L, R, ...]` samples
/// * `out` - Cleared and filled with one complex value per frame
pub fn pack_stereo_complex(window: &[i16], out: &mut Vec<Complex<f32>>) {
    out.clear();
    out.extend(
        window
            .chunks_exact(2)
            .map(|frame| Complex::new(frame[0] as f32, frame[1] as f32)),
    );
}

/// Mix an interleaved stereo window to mono, normalized to [-1.0, 1.0]
///
/// Pairs of consecutive output values form the interleaved real/imaginary points of
/// the BPM estimator's transform.
///
/// # Arguments
///
/// * `window` - Interleaved `[L, R, ...]` samples
/// * `out` - One slot per frame; caller-owned so it can live on the stack or heap
pub fn mix_to_mono(window: &[i16], out: &mut [f32]) {
    debug_assert_eq!(out.len(), window.len() / 2);
    for (slot, frame) in out.iter_mut().zip(window.chunks_exact(2)) {
        *slot = (frame[0] as f32 + frame[1] as f32) * 0.5 / I16_FULL_SCALE;
    }
}
