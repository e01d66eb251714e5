// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change segments: one timed transition towards a target value.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Spans shorter than this resolve straight to the target
pub const DEGENERATE_SPAN: f32 = 1e-4;

/// Unique identifier for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    /// Create a new random segment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

/// A transition from the previous value to `target` over `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment<T> {
    /// Editing handle, generated when missing from chart data
    #[serde(default)]
    pub id: SegmentId,
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds
    pub end: f32,
    /// Value reached at `end`
    #[serde(alias = "to")]
    pub target: T,
    /// Curve used to approach the target
    #[serde(default)]
    pub easing: Easing,
}

impl<T> Segment<T> {
    /// Create a new linear segment
    pub fn new(start: f32, end: f32, target: T) -> Self {
        Self {
            id: SegmentId::new(),
            start,
            end,
            target,
            easing: Easing::Linear,
        }
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Length of the segment in seconds
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Whether the span is numerically zero
    pub fn is_degenerate(&self) -> bool {
        self.duration().abs() < DEGENERATE_SPAN
    }

    /// Whether `time` lies in `[start, end)`
    pub fn is_active_at(&self, time: f32) -> bool {
        time >= self.start && time < self.end
    }

    /// Normalized progress through the segment, clamped to `[0, 1]`.
    ///
    /// Degenerate segments are always fully resolved.
    pub fn progress_at(&self, time: f32) -> f32 {
        if self.is_degenerate() {
            return 1.0;
        }
        ((time - self.start) / self.duration()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let segment = Segment::new(2.0, 4.0, 10.0);
        assert_eq!(segment.progress_at(1.0), 0.0);
        assert_eq!(segment.progress_at(3.0), 0.5);
        assert_eq!(segment.progress_at(9.0), 1.0);
    }

    #[test]
    fn test_degenerate_progress() {
        let segment = Segment::new(2.0, 2.0, 7.0);
        assert!(segment.is_degenerate());
        assert_eq!(segment.progress_at(2.0), 1.0);
        assert_eq!(segment.progress_at(0.0), 1.0);
        assert!(!segment.is_active_at(2.0));
    }

    #[test]
    fn test_active_window_is_half_open() {
        let segment = Segment::new(1.0, 2.0, 0.0);
        assert!(segment.is_active_at(1.0));
        assert!(segment.is_active_at(1.999));
        assert!(!segment.is_active_at(2.0));
        assert!(!segment.is_active_at(0.999));
    }

    #[test]
    fn test_deserialize_without_id() {
        let segment: Segment<f32> =
            ron::from_str("(start: 0.5, end: 1.5, to: 0.25, easing: \"easeoutquad\")").unwrap();
        assert_eq!(segment.target, 0.25);
        assert_eq!(segment.easing, Easing::OutQuad);

        let plain: Segment<f32> = ron::from_str("(start: 0.0, end: 1.0, target: 3.0)").unwrap();
        assert_eq!(plain.easing, Easing::Linear);
        assert_ne!(plain.id, segment.id);
    }
}
