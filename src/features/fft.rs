//! In-place radix-2 Fast Fourier Transform
//!
//! Moves windows of samples into the frequency domain for both detectors.
//!
//! # Algorithm
//!
//! Classic radix-2 decimation in time, driven by index arithmetic over one buffer:
//!
//! 1. Reorder the points into bit-reversed order so every sub-transform occupies a
//!    contiguous block
//! 2. For block sizes 2, 4, 8, ..., N combine the transformed first and second halves
//!    of each block with twiddle factors
//! 3. Twiddles are produced by incremental rotation: the rotor is seeded from the
//!    half-angle sine and advanced by its own recurrence, so no sine/cosine is
//!    evaluated per butterfly
//!
//! Arithmetic is single precision, no scaling is applied, and the result is in
//! ascending-frequency bin order (the same convention as `rustfft`'s forward FFT).
//!
//! # Example
//!
//! ```
//! use rustfft::num_complex::Complex;
//! use stratum_beat::features::fft::fft;
//!
//! let mut buffer = vec![Complex::new(1.0f32, 0.0); 8];
//! fft(&mut buffer)?;
//! assert!((buffer[0].re - 8.0).abs() < 1e-5);
//! # Ok::<(), stratum_beat::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Storage the transform can run over: a sequence of complex points
///
/// Implemented for plain complex slices and for interleaved `[re, im, re, im, ...]`
/// float buffers, so both detectors share one butterfly core.
pub trait ComplexBuffer {
    /// Number of complex points
    fn points(&self) -> usize;

    /// Read point `index` as `(re, im)`
    fn load(&self, index: usize) -> (f32, f32);

    /// Write point `index`
    fn store(&mut self, index: usize, value: (f32, f32));

    /// Exchange two points
    fn swap_points(&mut self, a: usize, b: usize) {
        let va = self.load(a);
        let vb = self.load(b);
        self.store(a, vb);
        self.store(b, va);
    }
}

impl ComplexBuffer for [Complex<f32>] {
    fn points(&self) -> usize {
        self.len()
    }

    fn load(&self, index: usize) -> (f32, f32) {
        let c = self[index];
        (c.re, c.im)
    }

    fn store(&mut self, index: usize, value: (f32, f32)) {
        self[index] = Complex::new(value.0, value.1);
    }

    fn swap_points(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }
}

/// Interleaved real/imaginary view over a float buffer
///
/// Point `i` is `(buffer[2i], buffer[2i + 1])`.
#[derive(Debug)]
pub struct Interleaved<'a>(pub &'a mut [f32]);

impl ComplexBuffer for Interleaved<'_> {
    fn points(&self) -> usize {
        self.0.len() / 2
    }

    fn load(&self, index: usize) -> (f32, f32) {
        (self.0[2 * index], self.0[2 * index + 1])
    }

    fn store(&mut self, index: usize, value: (f32, f32)) {
        self.0[2 * index] = value.0;
        self.0[2 * index + 1] = value.1;
    }

    fn swap_points(&mut self, a: usize, b: usize) {
        self.0.swap(2 * a, 2 * b);
        self.0.swap(2 * a + 1, 2 * b + 1);
    }
}

/// Transform a buffer of complex samples in place
///
/// # Arguments
///
/// * `buffer` - Complex samples; length must be a power of two (1 is the identity)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the length is not a power of two
pub fn fft(buffer: &mut [Complex<f32>]) -> Result<(), AnalysisError> {
    check_power_of_two(buffer.len())?;
    transform(buffer);
    Ok(())
}

/// Transform an interleaved `[re, im, ...]` buffer in place
///
/// The buffer holds `buffer.len() / 2` complex points, which must be a power of two.
/// Used by the BPM estimator, which only needs magnitudes and packs its real
/// window values two per point.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the buffer length is odd or the point
/// count is not a power of two
pub fn fft_interleaved(buffer: &mut [f32]) -> Result<(), AnalysisError> {
    if buffer.len() % 2 != 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Interleaved buffer length must be even, got {}",
            buffer.len()
        )));
    }
    check_power_of_two(buffer.len() / 2)?;
    transform(&mut Interleaved(buffer));
    Ok(())
}

/// Run the transform over any complex storage
///
/// The caller guarantees a power-of-two point count.
pub fn transform<B: ComplexBuffer + ?Sized>(buffer: &mut B) {
    let n = buffer.points();
    debug_assert!(n == 0 || n.is_power_of_two());
    if n < 2 {
        return;
    }

    bit_reverse(buffer);

    let mut half = 1;
    while half < n {
        let block = half * 2;
        let theta = -PI / half as f32;

        // Rotor recurrence: cos(theta) - 1 = -2 sin^2(theta / 2)
        let sin_half = (0.5 * theta).sin();
        let wpr = -2.0 * sin_half * sin_half;
        let wpi = theta.sin();
        let mut wr = 1.0f32;
        let mut wi = 0.0f32;

        for k in 0..half {
            let mut start = 0;
            while start < n {
                let i = start + k;
                let j = i + half;

                let (xr, xi) = buffer.load(j);
                let tr = wr * xr - wi * xi;
                let ti = wr * xi + wi * xr;
                let (ur, ui) = buffer.load(i);

                buffer.store(j, (ur - tr, ui - ti));
                buffer.store(i, (ur + tr, ui + ti));
                start += block;
            }

            let wt = wr;
            wr += wr * wpr - wi * wpi;
            wi += wi * wpr + wt * wpi;
        }

        half = block;
    }
}

/// Reorder points into bit-reversed index order
///
/// Part of every transform; also exposed for the optional reindexing pass the
/// detectors can apply to a window before transforming it.
pub fn bit_reverse<B: ComplexBuffer + ?Sized>(buffer: &mut B) {
    let n = buffer.points();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buffer.swap_points(i, j);
        }
    }
}

/// Squared magnitude of each point (`re² + im²`)
pub fn power_spectrum<B: ComplexBuffer + ?Sized>(buffer: &B, out: &mut Vec<f32>) {
    out.clear();
    out.extend((0..buffer.points()).map(|i| {
        let (re, im) = buffer.load(i);
        re * re + im * im
    }));
}

/// Magnitude of each point
pub fn magnitude_spectrum<B: ComplexBuffer + ?Sized>(buffer: &B, out: &mut Vec<f32>) {
    out.clear();
    out.extend((0..buffer.points()).map(|i| {
        let (re, im) = buffer.load(i);
        (re * re + im * im).sqrt()
    }));
}

fn check_power_of_two(n: usize) -> Result<(), AnalysisError> {
    if !n.is_power_of_two() {
        return Err(AnalysisError::InvalidInput(format!(
            "Transform length must be a power of two, got {}",
            n
        )));
    }
    Ok(())
}
