//! Frequency band layout
//!
//! Partitions a spectrum into contiguous bands whose widths follow a linear ramp
//! `width(i) = a * (i + 1) + b`, with `a` and `b` chosen so the widths sum exactly to
//! the spectrum length. Low bands are narrow, high bands wide.

use std::ops::Range;

/// Contiguous partition of spectrum bins into bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandLayout {
    bands: Vec<Range<usize>>,
    spectrum_len: usize,
}

impl BandLayout {
    /// Build the linear-ramp layout
    ///
    /// A quarter of the spectrum is spread evenly as the constant term `b`; the
    /// rest grows linearly with the band index. Band edges are the rounded cumulative
    /// widths, so every band gets at least one bin as long as
    /// `spectrum_len >= 4 * band_count`.
    ///
    /// # Arguments
    ///
    /// * `spectrum_len` - Number of bins to partition (e.g. 1024)
    /// * `band_count` - Number of bands (e.g. 64)
    pub fn linear_ramp(spectrum_len: usize, band_count: usize) -> Self {
        let n = band_count as f32;
        let total = spectrum_len as f32;
        let b = total / (4.0 * n);
        let a = (total - n * b) / (n * (n + 1.0) / 2.0);

        let mut bands = Vec::with_capacity(band_count);
        let mut cumulative = 0.0f32;
        let mut start = 0usize;
        for i in 0..band_count {
            cumulative += a * (i + 1) as f32 + b;
            let end = if i + 1 == band_count {
                spectrum_len
            } else {
                (cumulative.round() as usize).min(spectrum_len)
            };
            bands.push(start..end);
            start = end;
        }

        Self {
            bands,
            spectrum_len,
        }
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// True if the layout has no bands
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Number of bins covered
    pub fn spectrum_len(&self) -> usize {
        self.spectrum_len
    }

    /// Bin range of band `index`
    pub fn range(&self, index: usize) -> Range<usize> {
        self.bands[index].clone()
    }

    /// Width of band `index` in bins
    pub fn width(&self, index: usize) -> usize {
        self.bands[index].len()
    }

    /// Iterate over band bin ranges, lowest frequency first
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.bands.iter().cloned()
    }
}
