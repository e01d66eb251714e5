// SPDX-License-Identifier: MIT OR Apache-2.0
//! Beat timing derived from the song tempo.

use serde::{Deserialize, Serialize};

/// Beat grid of a song. Without a tempo the grid falls back to one beat per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatClock {
    /// Beats per minute
    pub bpm: Option<f32>,
}

impl BeatClock {
    /// Create a clock for a tempo
    pub fn new(bpm: Option<f32>) -> Self {
        Self { bpm }
    }

    /// Length of one beat in seconds
    pub fn seconds_per_beat(&self) -> f32 {
        match self.bpm {
            Some(bpm) if bpm > 0.0 => 60.0 / bpm,
            _ => 1.0,
        }
    }

    /// Seconds elapsed since the most recent beat
    pub fn beat_offset(&self, time: f32) -> f32 {
        let beat = self.seconds_per_beat();
        time - (time / beat).floor() * beat
    }

    /// Whether a frame at `time` is the first frame of a beat
    pub fn is_pulse(&self, time: f32, frames_per_second: f32) -> bool {
        frames_per_second > 0.0 && self.beat_offset(time) <= 1.0 / frames_per_second
    }

    /// Nearest beat time
    pub fn snap(&self, time: f32) -> f32 {
        let beat = self.seconds_per_beat();
        (time / beat).round() * beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_per_beat() {
        assert_eq!(BeatClock::new(Some(120.0)).seconds_per_beat(), 0.5);
        assert_eq!(BeatClock::new(None).seconds_per_beat(), 1.0);
        assert_eq!(BeatClock::new(Some(0.0)).seconds_per_beat(), 1.0);
        assert_eq!(BeatClock::new(Some(-90.0)).seconds_per_beat(), 1.0);
    }

    #[test]
    fn test_pulse_on_first_frame_of_beat() {
        let clock = BeatClock::new(Some(120.0));
        assert!(clock.is_pulse(1.0, 60.0));
        assert!(clock.is_pulse(1.01, 60.0));
        assert!(!clock.is_pulse(1.25, 60.0));
        assert!(!clock.is_pulse(1.0, 0.0));
    }

    #[test]
    fn test_snap() {
        let clock = BeatClock::new(Some(120.0));
        assert_eq!(clock.snap(1.2), 1.0);
        assert_eq!(clock.snap(1.3), 1.5);
        assert_eq!(BeatClock::default().snap(2.6), 3.0);
    }
}
