// SPDX-License-Identifier: MIT OR Apache-2.0
//! Song clock for the preview.
//!
//! The clock is the only source of song time; tracks and the stage receive
//! it as a parameter every frame.

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
}

/// Frame-stepped song clock
#[derive(Debug, Clone)]
pub struct PlaybackController {
    /// Current song time in seconds
    pub time: f32,
    /// Playback state
    pub state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f32,
    /// Loop start point
    pub loop_start: Option<f32>,
    /// Loop end point
    pub loop_end: Option<f32>,
}

impl PlaybackController {
    /// Create a stopped clock at time zero
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: PlaybackState::Stopped,
            speed: 1.0,
            loop_start: None,
            loop_end: None,
        }
    }

    /// Advance the clock by `delta_time` seconds of wall time
    pub fn update(&mut self, delta_time: f32, duration: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }

        let step = delta_time * self.speed;
        let next = self.time + step;
        if step > 0.0 && next <= self.time {
            tracing::warn!(
                "Playback step of {step}s is lost at {:.3}s, stopping",
                self.time
            );
            self.state = PlaybackState::Stopped;
            return;
        }

        self.time = next;
        self.check_bounds(duration);
    }

    /// Wrap inside a loop range, or stop at the end
    fn check_bounds(&mut self, duration: f32) {
        let end_time = self.loop_end.unwrap_or(duration);
        if self.time < end_time {
            return;
        }

        match (self.loop_start, self.loop_end) {
            (Some(start), Some(end)) if end > start => {
                self.time = start + (self.time - end) % (end - start);
            }
            _ => {
                self.time = end_time;
                self.state = PlaybackState::Stopped;
                tracing::debug!("Playback reached end at {:.3}s", end_time);
            }
        }
    }

    /// Play from the current position
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind to the loop start, or zero
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = self.loop_start.unwrap_or(0.0);
    }

    /// Toggle play/pause
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Seek to a time
    pub fn seek(&mut self, time: f32) {
        self.time = time.max(0.0);
    }

    /// Set loop range
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn set_loop_range(&mut self, start: f32, end: f32) {
        self.loop_start = Some(start);
        self.loop_end = Some(end);
    }

    /// Clear loop range
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn clear_loop_range(&mut self) {
        self.loop_start = None;
        self.loop_end = None;
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current frame number at a frame rate
    pub fn current_frame(&self, frames_per_second: f32) -> u32 {
        (self.time * frames_per_second) as u32
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_advances_while_playing() {
        let mut clock = PlaybackController::new();
        clock.update(0.5, 10.0);
        assert_eq!(clock.time, 0.0);

        clock.play();
        clock.update(0.5, 10.0);
        assert_eq!(clock.time, 0.5);

        clock.pause();
        clock.update(0.5, 10.0);
        assert_eq!(clock.time, 0.5);
        assert_eq!(clock.state, PlaybackState::Paused);
    }

    #[test]
    fn test_stops_at_end() {
        let mut clock = PlaybackController::new();
        clock.seek(9.75);
        clock.play();
        clock.update(0.5, 10.0);
        assert_eq!(clock.time, 10.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_loop_range_wraps() {
        let mut clock = PlaybackController::new();
        clock.set_loop_range(2.0, 4.0);
        clock.seek(3.5);
        clock.play();
        clock.update(1.0, 10.0);
        assert_eq!(clock.time, 2.5);
        assert!(clock.is_playing());

        clock.clear_loop_range();
        clock.stop();
        assert_eq!(clock.time, 0.0);
    }

    #[test]
    fn test_speed_and_frames() {
        let mut clock = PlaybackController::new();
        clock.speed = 2.0;
        clock.toggle_playback();
        clock.update(0.25, 10.0);
        assert_eq!(clock.time, 0.5);
        assert_eq!(clock.current_frame(60.0), 30);

        clock.toggle_playback();
        assert_eq!(clock.state, PlaybackState::Paused);
        clock.seek(-4.0);
        assert_eq!(clock.time, 0.0);
    }

    #[test]
    fn test_stops_when_step_is_lost() {
        let mut clock = PlaybackController::new();
        clock.seek(1_000_000.0);
        clock.play();
        clock.update(1.0 / 60.0, 1_000_001.0);
        assert!(!clock.is_playing());
        assert_eq!(clock.time, 1_000_000.0);

        let mut clock = PlaybackController::new();
        clock.play();
        clock.update(1.0 / 60.0, 10.0);
        assert!(clock.is_playing());
    }
}
