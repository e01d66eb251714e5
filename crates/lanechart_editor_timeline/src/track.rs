// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chart tracks: lanes whose position, color and width are animated by
//! segment timelines over a lifetime window.

use crate::color::{ColorIndex, Palette, Rgba};
use crate::timeline::{Timeline, TimelineIssue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a track within a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Values in effect before any segment applies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackBase {
    /// Horizontal position, as a fraction of the screen width
    pub x: f32,
    /// Palette color
    pub color: ColorIndex,
    /// Width multiplier
    pub size: f32,
}

impl Default for TrackBase {
    fn default() -> Self {
        Self {
            x: 0.5,
            color: ColorIndex(0),
            size: 1.0,
        }
    }
}

/// Animated property of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    /// Horizontal position
    Move,
    /// Display color
    Color,
    /// Width multiplier
    Scale,
}

impl TrackProperty {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Color => "color",
            Self::Scale => "scale",
        }
    }
}

/// Evaluated attributes of a track for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    /// Song time the frame was evaluated at
    pub time: f32,
    /// Progress through the lifetime window
    pub progress: f32,
    /// Horizontal position
    pub x: f32,
    /// Display color
    pub color: Rgba,
    /// Width multiplier
    pub scale: f32,
}

/// Outcome of a per-frame track update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackState {
    /// The track is inside its window; render this frame
    Live(TrackFrame),
    /// The song time left the window; the owner should retire the track
    Retire,
}

/// A track in a chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Track ID
    pub id: TrackId,
    /// Values before any segment applies
    #[serde(default)]
    pub base: TrackBase,
    /// Time the track appears
    pub start: f32,
    /// Time the track disappears
    pub end: f32,
    /// Position changes
    #[serde(default, rename = "move")]
    pub movement: Timeline<f32>,
    /// Color changes
    #[serde(default, alias = "color_change")]
    pub color: Timeline<ColorIndex>,
    /// Width changes
    #[serde(default)]
    pub scale: Timeline<f32>,
    /// Attributes from the latest update
    #[serde(skip)]
    current: Option<TrackFrame>,
}

impl Track {
    /// Create a track without segments
    pub fn new(id: TrackId, start: f32, end: f32, base: TrackBase) -> Self {
        Self {
            id,
            base,
            start,
            end,
            movement: Timeline::new(),
            color: Timeline::new(),
            scale: Timeline::new(),
            current: None,
        }
    }

    /// Progress through the lifetime window.
    ///
    /// A zero-length window is only in range at exactly its start.
    pub fn progress_at(&self, time: f32) -> f32 {
        let span = self.end - self.start;
        if span == 0.0 {
            return if time == self.start {
                1.0
            } else if time < self.start {
                f32::NEG_INFINITY
            } else {
                f32::INFINITY
            };
        }
        (time - self.start) / span
    }

    /// Whether `time` lies in the lifetime window
    pub fn is_in_window(&self, time: f32) -> bool {
        (0.0..=1.0).contains(&self.progress_at(time))
    }

    /// Evaluate every property at `time` without the window check
    pub fn evaluate(&self, time: f32, palette: &Palette) -> TrackFrame {
        TrackFrame {
            time,
            progress: self.progress_at(time),
            x: self.movement.evaluate(time, self.base.x, self.end),
            color: self.color.evaluate_with(time, &self.base.color, self.end, |index| {
                palette.resolve(*index)
            }),
            scale: self.scale.evaluate(time, self.base.size, self.end),
        }
    }

    /// Refresh the current frame for `time`.
    ///
    /// Outside the lifetime window the cached frame is cleared and
    /// [`TrackState::Retire`] is returned; the caller decides what to do.
    pub fn update(&mut self, time: f32, palette: &Palette) -> TrackState {
        if !self.is_in_window(time) {
            self.current = None;
            return TrackState::Retire;
        }

        let frame = self.evaluate(time, palette);
        self.current = Some(frame);
        TrackState::Live(frame)
    }

    /// Attributes from the latest in-window update
    pub fn current(&self) -> Option<&TrackFrame> {
        self.current.as_ref()
    }

    /// Authoring problems in every timeline
    pub fn issues(&self) -> Vec<(TrackProperty, TimelineIssue)> {
        let tagged = |property: TrackProperty, issues: Vec<TimelineIssue>| {
            issues.into_iter().map(move |issue| (property, issue))
        };

        tagged(TrackProperty::Move, self.movement.issues())
            .chain(tagged(TrackProperty::Color, self.color.issues()))
            .chain(tagged(TrackProperty::Scale, self.scale.issues()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::segment::Segment;

    fn lane() -> Track {
        let mut track = Track::new(
            TrackId(1),
            0.0,
            4.0,
            TrackBase {
                x: 0.2,
                color: ColorIndex(0),
                size: 1.0,
            },
        );
        track.movement.push(Segment::new(1.0, 2.0, 0.8));
        track.color.push(Segment::new(0.0, 1.0, ColorIndex(1)));
        track.scale.push(Segment::new(2.0, 3.0, 2.0).with_easing(Easing::OutQuad));
        track
    }

    fn palette() -> Palette {
        Palette::new(vec![
            Rgba::new(0.0, 0.0, 0.0, 1.0),
            Rgba::new(1.0, 1.0, 1.0, 1.0),
        ])
    }

    #[test]
    fn test_update_inside_window() {
        let mut track = lane();
        let palette = palette();

        let TrackState::Live(frame) = track.update(1.5, &palette) else {
            panic!("track should be live at 1.5");
        };
        assert!((frame.x - 0.5).abs() < 1e-6);
        assert_eq!(frame.color, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(frame.scale, 1.0);
        assert_eq!(frame.progress, 0.375);
        assert_eq!(track.current(), Some(&frame));
    }

    #[test]
    fn test_update_blends_color_from_base() {
        let mut track = lane();
        let TrackState::Live(frame) = track.update(0.5, &palette()) else {
            panic!("track should be live at 0.5");
        };
        assert_eq!(frame.color, Rgba::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(frame.x, 0.2);
    }

    #[test]
    fn test_update_outside_window_retires() {
        let mut track = lane();
        let palette = palette();
        assert!(matches!(track.update(3.0, &palette), TrackState::Live(_)));
        assert!(track.current().is_some());

        assert_eq!(track.update(4.5, &palette), TrackState::Retire);
        assert!(track.current().is_none());
        assert_eq!(track.update(-0.1, &palette), TrackState::Retire);
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let track = lane();
        assert!(track.is_in_window(0.0));
        assert!(track.is_in_window(4.0));
        assert!(!track.is_in_window(4.01));
    }

    #[test]
    fn test_zero_length_window() {
        let track = Track::new(TrackId(2), 1.0, 1.0, TrackBase::default());
        assert!(track.is_in_window(1.0));
        assert!(!track.is_in_window(0.5));
        assert!(!track.is_in_window(1.5));
    }

    #[test]
    fn test_properties_evaluate_independently() {
        let track = lane();
        let frame = track.evaluate(2.5, &palette());
        assert!((frame.x - 0.8).abs() < 1e-6);
        assert_eq!(frame.color, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert!((frame.scale - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_issues_are_tagged_by_property() {
        let mut track = lane();
        track.scale.push(Segment::new(2.5, 3.5, 1.0));
        let issues = track.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, TrackProperty::Scale);
    }

    #[test]
    fn test_deserialize_chart_track() {
        let source = r#"(
            id: 7,
            base: (x: 0.3, color: 2, size: 1.5),
            start: 0.0,
            end: 8.0,
            move: [(start: 1.0, end: 2.0, to: 0.6, easing: "easeinoutsine")],
            color_change: [(start: 0.0, end: 1.0, to: 4)],
        )"#;
        let track: Track = ron::from_str(source).unwrap();
        assert_eq!(track.id, TrackId(7));
        assert_eq!(track.movement.len(), 1);
        assert_eq!(track.color.segments()[0].target, ColorIndex(4));
        assert!(track.scale.is_empty());
        assert!(track.current().is_none());
    }
}
