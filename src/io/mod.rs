//! Audio input modules
//!
//! Borrowed views over interleaved 16-bit stereo PCM and fixed-size windowing.

pub mod sample_buffer;

pub use sample_buffer::{pad_to_even, PcmBuffer, StereoWindow};
