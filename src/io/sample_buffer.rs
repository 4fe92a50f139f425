//! Interleaved stereo PCM buffers and window iteration
//!
//! The detectors never copy or mutate the caller's samples: a [`PcmBuffer`] borrows the
//! interleaved `[L, R, L, R, ...]` 16-bit data for the duration of a scan and hands out
//! fixed-length windows that are views into it.

use crate::error::AnalysisError;

/// Borrowed interleaved 16-bit stereo PCM with its sample rate
#[derive(Debug, Clone, Copy)]
pub struct PcmBuffer<'a> {
    samples: &'a [i16],
    sample_rate: u32,
}

impl<'a> PcmBuffer<'a> {
    /// Wrap an interleaved stereo buffer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate is zero or the buffer
    /// length is odd (see [`pad_to_even`])
    pub fn new(samples: &'a [i16], sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput("Invalid sample rate: 0".to_string()));
        }
        if samples.len() % 2 != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Interleaved stereo buffer must have even length, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The raw interleaved samples
    pub fn samples(&self) -> &'a [i16] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames (left/right pairs)
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Buffer duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Iterate over full windows of `window_frames` frames, advancing `hop_frames`
    ///
    /// A trailing partial window is never produced.
    pub fn windows(&self, window_frames: usize, hop_frames: usize) -> Windows<'a> {
        Windows {
            samples: self.samples,
            window_frames,
            hop_frames: hop_frames.max(1),
            next_frame: 0,
        }
    }
}

/// One window of interleaved stereo samples
#[derive(Debug, Clone, Copy)]
pub struct StereoWindow<'a> {
    /// Index of the first frame of the window within the buffer
    pub start_frame: usize,

    /// Interleaved samples (`2 * frames` values)
    pub samples: &'a [i16],
}

impl StereoWindow<'_> {
    /// Number of stereo frames in the window
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Time of the window start in seconds
    pub fn start_seconds(&self, sample_rate: u32) -> f32 {
        self.start_frame as f32 / sample_rate as f32
    }

    /// Time of the window end in seconds
    pub fn end_seconds(&self, sample_rate: u32) -> f32 {
        (self.start_frame + self.frames()) as f32 / sample_rate as f32
    }

    /// Temporal midpoint of the window in seconds
    pub fn midpoint_seconds(&self, sample_rate: u32) -> f32 {
        (self.start_frame as f32 + self.frames() as f32 / 2.0) / sample_rate as f32
    }
}

/// Iterator over [`StereoWindow`]s of a [`PcmBuffer`]
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    samples: &'a [i16],
    window_frames: usize,
    hop_frames: usize,
    next_frame: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = StereoWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.window_frames == 0 {
            return None;
        }
        let start = self.next_frame * 2;
        let end = start + self.window_frames * 2;
        if end > self.samples.len() {
            return None;
        }

        let window = StereoWindow {
            start_frame: self.next_frame,
            samples: &self.samples[start..end],
        };
        self.next_frame += self.hop_frames;
        Some(window)
    }
}

/// Pad an interleaved buffer to even length with a trailing zero sample
///
/// Odd-length buffers are padded, never truncated, before they reach the detectors.
pub fn pad_to_even(mut samples: Vec<i16>) -> Vec<i16> {
    if samples.len() % 2 != 0 {
        samples.push(0);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_buffer_rejects_invalid_input() {
        let odd = vec![0i16; 7];
        assert!(PcmBuffer::new(&odd, 44100).is_err());

        let even = vec![0i16; 8];
        assert!(PcmBuffer::new(&even, 0).is_err());
        assert!(PcmBuffer::new(&even, 44100).is_ok());
    }

    #[test]
    fn test_pcm_buffer_duration() {
        let samples = vec![0i16; 2 * 44100];
        let buffer = PcmBuffer::new(&samples, 44100).unwrap();
        assert_eq!(buffer.frames(), 44100);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_windows_skip_partial_tail() {
        // 10 frames, window 4, hop 2: starts at 0, 2, 4, 6 (8 would need frames 8..12)
        let samples: Vec<i16> = (0..20).collect();
        let buffer = PcmBuffer::new(&samples, 8000).unwrap();
        let starts: Vec<usize> = buffer.windows(4, 2).map(|w| w.start_frame).collect();
        assert_eq!(starts, vec![0, 2, 4, 6]);

        let first = buffer.windows(4, 2).next().unwrap();
        assert_eq!(first.samples, &samples[0..8]);
        assert_eq!(first.frames(), 4);
    }

    #[test]
    fn test_windows_shorter_than_one_window() {
        let samples = vec![1i16; 10];
        let buffer = PcmBuffer::new(&samples, 8000).unwrap();
        assert_eq!(buffer.windows(8, 8).count(), 0);
    }

    #[test]
    fn test_window_times() {
        let samples = vec![0i16; 2 * 2048];
        let buffer = PcmBuffer::new(&samples, 1000).unwrap();
        let window = buffer.windows(1024, 256).nth(1).unwrap();
        assert_eq!(window.start_frame, 256);
        assert!((window.start_seconds(1000) - 0.256).abs() < 1e-6);
        assert!((window.midpoint_seconds(1000) - 0.768).abs() < 1e-6);
        assert!((window.end_seconds(1000) - 1.280).abs() < 1e-6);
    }

    #[test]
    fn test_pad_to_even() {
        assert_eq!(pad_to_even(vec![1, 2, 3]), vec![1, 2, 3, 0]);
        assert_eq!(pad_to_even(vec![1, 2]), vec![1, 2]);
    }
}
