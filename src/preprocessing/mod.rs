//! Audio preprocessing modules
//!
//! Converts windows of interleaved 16-bit stereo samples into the layouts the
//! transform consumes:
//! - Stereo packed as complex samples (spectral detector)
//! - Normalized mono packed as interleaved real/imaginary pairs (BPM estimator)

pub mod channel_mixer;
