//! Beat events and scan results

use super::metadata::ScanMetadata;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A detected beat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatEvent {
    /// Time from stream start in seconds
    pub time_seconds: f32,

    /// Dominant-frequency indicator: normalized band index in [0.0, 1.0)
    pub frequency: f32,
}

impl BeatEvent {
    /// Create a beat event
    pub fn new(time_seconds: f32, frequency: f32) -> Self {
        Self {
            time_seconds,
            frequency,
        }
    }

    /// Time from stream start
    pub fn timestamp(&self) -> Duration {
        Duration::from_secs_f32(self.time_seconds.max(0.0))
    }
}

/// Insertion-ordered sequence of beat events produced by one scan
///
/// Events are appended during the scan and never reordered or deduplicated;
/// timestamps are non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTimeline {
    events: Vec<BeatEvent>,
}

impl EventTimeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: BeatEvent) {
        debug_assert!(self
            .events
            .last()
            .map_or(true, |last| last.time_seconds <= event.time_seconds));
        self.events.push(event);
    }

    /// All events in insertion order
    pub fn events(&self) -> &[BeatEvent] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no beat was detected
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, BeatEvent> {
        self.events.iter()
    }

    /// Time between consecutive events in seconds
    pub fn intervals(&self) -> Vec<f32> {
        self.events
            .windows(2)
            .map(|w| w[1].time_seconds - w[0].time_seconds)
            .collect()
    }

    /// Consume the timeline, returning its events
    pub fn into_events(self) -> Vec<BeatEvent> {
        self.events
    }
}

impl<'a> IntoIterator for &'a EventTimeline {
    type Item = &'a BeatEvent;
    type IntoIter = std::slice::Iter<'a, BeatEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Result of a spectral beat detection scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatReport {
    /// Detected beat events
    pub timeline: EventTimeline,

    /// Scan metadata
    pub metadata: ScanMetadata,
}

/// Result of a BPM estimation scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BpmReport {
    /// Beat ticks emitted on every whole-beat increment
    pub timeline: EventTimeline,

    /// Winning BPM in tenths (1200 = 120.0 BPM), 0 if no tempo was found
    pub winning_bpm_tenths: u32,

    /// Winning BPM of the 1-BPM resolution contest, 0 if none
    pub winning_bpm_lo: u32,

    /// Continuously refined BPM estimate at the end of the scan, 0.0 if none
    pub current_bpm: f32,

    /// Scan metadata
    pub metadata: ScanMetadata,
}

impl BpmReport {
    /// Winning BPM as a float (120.0 for 1200 tenths)
    pub fn bpm(&self) -> f32 {
        self.winning_bpm_tenths as f32 / 10.0
    }
}
