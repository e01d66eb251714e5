// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segment timelines for Lanechart Editor.
//!
//! Chart tracks animate three properties over their lifetime: horizontal
//! position, color and width. Each property is a [`Timeline`] of change
//! segments, evaluated once per frame against the song time.
//!
//! ## Architecture
//!
//! - Easing curves and the [`Lerp`] blend trait
//! - Segments and the generic timeline evaluator
//! - Palette resolution for color segments
//! - Tracks, which own one timeline per property and report when the song
//!   time leaves their lifetime window
//! - Charts and the beat clock

pub mod beat;
pub mod chart;
pub mod color;
pub mod easing;
pub mod segment;
pub mod timeline;
pub mod track;

pub use beat::BeatClock;
pub use chart::{Chart, ChartError, ChartIssue};
pub use color::{ColorIndex, Palette, ParseColorError, Rgba};
pub use easing::{Easing, Lerp, ParseEasingError};
pub use segment::{Segment, SegmentId};
pub use timeline::{Sample, Timeline, TimelineIssue};
pub use track::{Track, TrackBase, TrackFrame, TrackId, TrackProperty, TrackState};
