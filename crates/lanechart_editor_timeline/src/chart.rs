// SPDX-License-Identifier: MIT OR Apache-2.0
//! Charts: the set of tracks of one song, with RON and JSON codecs.

use crate::timeline::TimelineIssue;
use crate::track::{Track, TrackId, TrackProperty};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Chart loading and saving errors
#[derive(Debug, Error)]
pub enum ChartError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON serialization error
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// RON parse error with position
    #[error("RON parse error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.ron` nor `.json`
    #[error("Unsupported chart format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// Authoring problem found in a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartIssue {
    /// Track containing the problem
    pub track: TrackId,
    /// Affected property
    pub property: TrackProperty,
    /// The problem
    pub issue: TimelineIssue,
}

impl fmt::Display for ChartIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {} {}: {}", self.track, self.property.name(), self.issue)
    }
}

/// On-disk layout: tracks as a list
#[derive(Serialize, Deserialize)]
struct ChartFile {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bpm: Option<f32>,
    #[serde(default)]
    tracks: Vec<Track>,
}

/// All tracks of one song
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ChartFile", into = "ChartFile")]
pub struct Chart {
    /// Chart name
    pub name: String,
    /// Song tempo, if known
    pub bpm: Option<f32>,
    tracks: IndexMap<TrackId, Track>,
}

impl From<ChartFile> for Chart {
    fn from(file: ChartFile) -> Self {
        let mut chart = Chart::new(file.name);
        chart.bpm = file.bpm;
        for track in file.tracks {
            chart.add_track(track);
        }
        chart
    }
}

impl From<Chart> for ChartFile {
    fn from(chart: Chart) -> Self {
        Self {
            name: chart.name,
            bpm: chart.bpm,
            tracks: chart.tracks.into_values().collect(),
        }
    }
}

impl Chart {
    /// Create an empty chart
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bpm: None,
            tracks: IndexMap::new(),
        }
    }

    /// Add a track, replacing any track with the same ID
    pub fn add_track(&mut self, track: Track) -> TrackId {
        let id = track.id;
        if self.tracks.insert(id, track).is_some() {
            tracing::warn!("Replaced duplicate track {id}");
        }
        id
    }

    /// Remove a track
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        self.tracks.shift_remove(&id)
    }

    /// Get a track
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&id)
    }

    /// All tracks in authored order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// IDs of tracks whose lifetime window contains `time`
    pub fn tracks_in_window(&self, time: f32) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks
            .values()
            .filter(move |track| track.is_in_window(time))
            .map(|track| track.id)
    }

    /// Latest track end time
    pub fn duration(&self) -> f32 {
        self.tracks.values().map(|t| t.end).fold(0.0, f32::max)
    }

    /// ID after the highest one in use, or the lowest free ID once that
    /// would overflow. `None` when every ID is taken.
    pub fn next_track_id(&self) -> Option<TrackId> {
        let Some(highest) = self.tracks.keys().map(|id| id.0).max() else {
            return Some(TrackId(0));
        };
        if let Some(next) = highest.checked_add(1) {
            return Some(TrackId(next));
        }
        (0..=u32::MAX)
            .map(TrackId)
            .find(|id| !self.tracks.contains_key(id))
    }

    /// Authoring problems across all tracks
    pub fn issues(&self) -> Vec<ChartIssue> {
        self.tracks
            .values()
            .flat_map(|track| {
                track
                    .issues()
                    .into_iter()
                    .map(move |(property, issue)| ChartIssue {
                        track: track.id,
                        property,
                        issue,
                    })
            })
            .collect()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a chart, picking the codec from the file extension.
    ///
    /// Authoring problems are logged and kept as is.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let chart = match Format::of(path)? {
            Format::Ron => Self::from_ron(&contents)?,
            Format::Json => Self::from_json(&contents)?,
        };

        tracing::info!(
            "Loaded chart '{}' with {} tracks from {}",
            chart.name,
            chart.track_count(),
            path.display()
        );
        for issue in chart.issues() {
            tracing::warn!("{issue}");
        }

        Ok(chart)
    }

    /// Save a chart, picking the codec from the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match Format::of(path)? {
            Format::Ron => self.to_ron()?,
            Format::Json => self.to_json()?,
        };
        std::fs::write(path, contents)?;
        tracing::info!("Saved chart '{}' to {}", self.name, path.display());
        Ok(())
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new("Untitled Chart")
    }
}

enum Format {
    Ron,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "ron" => Ok(Self::Ron),
            "json" => Ok(Self::Json),
            _ => Err(ChartError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
