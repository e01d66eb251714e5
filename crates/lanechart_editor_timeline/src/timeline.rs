// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline evaluation for one animatable property.
//!
//! A timeline is an ordered list of change segments. At any query time it is
//! in one of three states:
//! - before any segment applies, it yields the base value
//! - inside a segment's `[start, end)` window, it tweens from the previous
//!   target (or the base value, for the first segment) to the segment target
//! - in the gap after a segment, it holds that segment's target until the
//!   next segment starts, or until the owning entity's end time
//!
//! Segments are scanned in order and the first match wins. Overlapping or
//! unsorted segments are evaluated as authored; [`Timeline::issues`] reports
//! them without changing anything.

use crate::easing::{Easing, Lerp};
use crate::segment::{Segment, SegmentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a timeline at a query time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample<'a, T> {
    /// No segment applies
    Base,
    /// Inside a segment, moving from `from` to `to`
    Tween {
        /// Value the segment starts from
        from: &'a T,
        /// Segment target
        to: &'a T,
        /// Segment curve
        easing: Easing,
        /// Clamped progress through the segment
        progress: f32,
    },
    /// Between segments, holding the last reached target
    Hold(&'a T),
}

impl<'a, T> Sample<'a, T> {
    /// Resolve the sample to an output value.
    ///
    /// `base` is resolved as is when no segment applies.
    pub fn resolve<V, F>(self, base: &'a T, resolve: F) -> V
    where
        V: Lerp,
        F: Fn(&T) -> V,
    {
        match self {
            Sample::Base => resolve(base),
            Sample::Hold(target) => resolve(target),
            Sample::Tween {
                from,
                to,
                easing,
                progress,
            } => easing.ease(&resolve(from), &resolve(to), progress),
        }
    }
}

/// Ordered change segments for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline<T> {
    segments: Vec<Segment<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<T> From<Vec<Segment<T>>> for Timeline<T> {
    fn from(segments: Vec<Segment<T>>) -> Self {
        Self { segments }
    }
}

impl<T> FromIterator<Segment<T>> for Timeline<T> {
    fn from_iter<I: IntoIterator<Item = Segment<T>>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<T> Timeline<T> {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the state of the timeline at `time`
    pub fn sample<'a>(&'a self, time: f32, base: &'a T, entity_end: f32) -> Sample<'a, T> {
        let Some(last) = self.segments.len().checked_sub(1) else {
            return Sample::Base;
        };

        for (i, segment) in self.segments.iter().enumerate() {
            if segment.is_active_at(time) {
                let from = if i == 0 {
                    base
                } else {
                    &self.segments[i - 1].target
                };
                return Sample::Tween {
                    from,
                    to: &segment.target,
                    easing: segment.easing,
                    progress: segment.progress_at(time),
                };
            }

            let hold_until = if i < last {
                self.segments[i + 1].start
            } else {
                entity_end
            };
            if time >= segment.end && time < hold_until {
                return Sample::Hold(&segment.target);
            }
        }

        Sample::Base
    }

    /// Evaluate at `time`, mapping segment targets to output values with `resolve`
    pub fn evaluate_with<V, F>(&self, time: f32, base: &T, entity_end: f32, resolve: F) -> V
    where
        V: Lerp,
        F: Fn(&T) -> V,
    {
        self.sample(time, base, entity_end).resolve(base, resolve)
    }

    /// Evaluate a timeline whose targets are blended directly
    pub fn evaluate(&self, time: f32, base: T, entity_end: f32) -> T
    where
        T: Lerp + Clone,
    {
        self.evaluate_with(time, &base, entity_end, T::clone)
    }

    /// Append a segment as authored, without reordering
    pub fn push(&mut self, segment: Segment<T>) -> SegmentId {
        let id = segment.id;
        self.segments.push(segment);
        id
    }

    /// Insert a segment after every segment starting at or before it
    pub fn insert(&mut self, segment: Segment<T>) -> SegmentId {
        let id = segment.id;
        let index = self.segments.partition_point(|s| s.start <= segment.start);
        self.segments.insert(index, segment);
        id
    }

    /// Remove a segment
    pub fn remove(&mut self, id: SegmentId) -> Option<Segment<T>> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(index))
    }

    /// Get a segment by ID
    pub fn segment(&self, id: SegmentId) -> Option<&Segment<T>> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Get a mutable segment by ID
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment<T>> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// Move a segment to a new time span, keeping the list sorted by start
    pub fn retime(&mut self, id: SegmentId, start: f32, end: f32) -> bool {
        match self.remove(id) {
            Some(mut segment) => {
                segment.start = start;
                segment.end = end;
                self.insert(segment);
                true
            }
            None => false,
        }
    }

    /// Segments overlapping `[start, end]`
    pub fn segments_in_range(&self, start: f32, end: f32) -> Vec<&Segment<T>> {
        self.segments
            .iter()
            .filter(|s| s.end >= start && s.start <= end)
            .collect()
    }

    /// All segments in scan order
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Segment count
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the timeline has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Latest segment end, if any
    pub fn end_time(&self) -> Option<f32> {
        self.segments.iter().map(|s| s.end).reduce(f32::max)
    }

    /// Report authoring problems. Evaluation is unaffected by these.
    pub fn issues(&self) -> Vec<TimelineIssue> {
        let mut issues = Vec::new();

        for (index, segment) in self.segments.iter().enumerate() {
            if segment.end < segment.start {
                issues.push(TimelineIssue::Reversed { index });
            }
        }

        for (index, pair) in self.segments.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start < prev.start {
                issues.push(TimelineIssue::OutOfOrder { index: index + 1 });
            } else if next.start < prev.end {
                issues.push(TimelineIssue::Overlap {
                    first: index,
                    second: index + 1,
                });
            }
        }

        issues
    }
}

/// Authoring problem in a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineIssue {
    /// Segment ends before it starts
    Reversed {
        /// Segment index
        index: usize,
    },
    /// Segment starts before its predecessor
    OutOfOrder {
        /// Segment index
        index: usize,
    },
    /// Segment starts before its predecessor ends
    Overlap {
        /// Earlier segment index
        first: usize,
        /// Later segment index
        second: usize,
    },
}

impl fmt::Display for TimelineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reversed { index } => write!(f, "segment {index} ends before it starts"),
            Self::OutOfOrder { index } => {
                write!(
                    f,
                    "segment {index} starts before segment {}",
                    index.saturating_sub(1)
                )
            }
            Self::Overlap { first, second } => {
                write!(f, "segments {first} and {second} overlap")
            }
        }
    }
}
