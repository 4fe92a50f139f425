//! Per-band energy history ring

use std::collections::VecDeque;

/// Fixed-capacity ring of the most recent window energies of one band
///
/// Average and variance are recomputed from the ring on demand rather than
/// maintained incrementally.
#[derive(Debug, Clone)]
pub struct EnergyHistory {
    ring: VecDeque<f32>,
    capacity: usize,
}

impl EnergyHistory {
    /// Create an empty history holding up to `capacity` energies
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an energy, evicting the oldest once full
    pub fn push(&mut self, energy: f32) {
        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(energy);
    }

    /// Number of stored energies
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// True if nothing has been pushed since creation or the last clear
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Mean of the stored energies (0.0 when empty)
    pub fn average(&self) -> f32 {
        if self.ring.is_empty() {
            return 0.0;
        }
        self.ring.iter().sum::<f32>() / self.ring.len() as f32
    }

    /// Population variance of the stored energies (0.0 when empty)
    pub fn variance(&self) -> f32 {
        if self.ring.is_empty() {
            return 0.0;
        }
        let mean = self.average();
        self.ring.iter().map(|&e| (e - mean) * (e - mean)).sum::<f32>() / self.ring.len() as f32
    }

    /// Drop all stored energies
    pub fn clear(&mut self) {
        self.ring.clear();
    }
}
