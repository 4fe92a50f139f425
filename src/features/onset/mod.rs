//! Spectral energy-variance beat detection
//!
//! - Linear-ramp band layout
//! - Per-band energy history
//! - Window-by-window detector emitting beat events

pub mod bands;
pub mod history;
pub mod spectral_energy;

pub use spectral_energy::SpectralBeatDetector;
