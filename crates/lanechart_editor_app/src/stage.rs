// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live track management for the preview.
//!
//! The stage spawns a track when the song time enters its lifetime window,
//! updates it every frame, and drops it once the track reports that the
//! time has left the window. Evaluated values are laid out in screen space
//! for whatever renders them.

use crate::settings::EditorSettings;
use indexmap::IndexMap;
use lanechart_editor_timeline::{BeatClock, Chart, Palette, Rgba, Track, TrackId, TrackState};
use serde::Serialize;

/// Converts evaluated track values to screen attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    /// Screen size in pixels
    pub resolution: [f32; 2],
    /// Fraction of the screen height covered by tracks
    pub track_screen_height: f32,
    /// Track width at scale 1.0, as a fraction of the screen width
    pub track_screen_width: f32,
}

impl ScreenLayout {
    /// Layout from editor settings
    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            resolution: settings.resolution,
            track_screen_height: settings.track_screen_height,
            track_screen_width: settings.track_screen_width,
        }
    }

    /// Horizontal pixel position of a track center
    pub fn x_px(&self, x: f32) -> f32 {
        x * self.resolution[0]
    }

    /// Vertical pixel position of the track top edge
    pub fn y_px(&self) -> f32 {
        self.resolution[1] * (1.0 - self.track_screen_height)
    }

    /// Pixel width of a track at `scale`
    pub fn width_px(&self, scale: f32) -> f32 {
        self.resolution[0] * self.track_screen_width * scale
    }
}

/// A live track as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    /// Track ID
    pub id: TrackId,
    /// Center position in pixels
    pub x_px: f32,
    /// Top edge in pixels
    pub y_px: f32,
    /// Width in pixels
    pub width_px: f32,
    /// Display color
    pub color: Rgba,
    /// Whether this frame starts a beat
    pub pulse: bool,
}

/// Everything visible in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFrame {
    /// Frame number
    pub frame: u32,
    /// Song time
    pub time: f32,
    /// Live tracks in chart order
    pub tracks: Vec<TrackView>,
}

/// Owner of the live tracks of one chart
pub struct Stage {
    layout: ScreenLayout,
    palette: Palette,
    beat: BeatClock,
    frames_per_second: f32,
    live: IndexMap<TrackId, Track>,
}

impl Stage {
    /// Create an empty stage
    pub fn new(
        layout: ScreenLayout,
        palette: Palette,
        beat: BeatClock,
        frames_per_second: f32,
    ) -> Self {
        Self {
            layout,
            palette,
            beat,
            frames_per_second,
            live: IndexMap::new(),
        }
    }

    /// Spawn, update and retire tracks for one frame
    pub fn step(&mut self, chart: &Chart, frame: u32, time: f32) -> StageFrame {
        self.spawn(chart, time);

        let pulse = self.beat.is_pulse(time, self.frames_per_second);
        let mut views = Vec::with_capacity(self.live.len());
        let mut retired = Vec::new();

        for (id, track) in &mut self.live {
            match track.update(time, &self.palette) {
                TrackState::Live(evaluated) => views.push(TrackView {
                    id: *id,
                    x_px: self.layout.x_px(evaluated.x),
                    y_px: self.layout.y_px(),
                    width_px: self.layout.width_px(evaluated.scale),
                    color: evaluated.color,
                    pulse,
                }),
                TrackState::Retire => retired.push(*id),
            }
        }

        for id in retired {
            self.live.shift_remove(&id);
            tracing::debug!("Retired track {id} at {time:.3}s");
        }

        StageFrame {
            frame,
            time,
            tracks: views,
        }
    }

    /// Bring in tracks whose window contains `time`, keeping chart order
    fn spawn(&mut self, chart: &Chart, time: f32) {
        let mut spawned = false;
        for id in chart.tracks_in_window(time) {
            if self.live.contains_key(&id) {
                continue;
            }
            if let Some(track) = chart.track(id) {
                self.live.insert(id, track.clone());
                tracing::debug!("Spawned track {id} at {time:.3}s");
                spawned = true;
            }
        }

        if spawned {
            let order: IndexMap<TrackId, usize> = chart
                .tracks()
                .enumerate()
                .map(|(index, track)| (track.id, index))
                .collect();
            let rank = |id: &TrackId| order.get(id).copied().unwrap_or(usize::MAX);
            self.live.sort_by(|a, _, b, _| rank(a).cmp(&rank(b)));
        }
    }

    /// Number of live tracks
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether a track is live
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn is_live(&self, id: TrackId) -> bool {
        self.live.contains_key(&id)
    }

    /// Drop every live track
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn clear(&mut self) {
        self.live.clear();
    }
}
