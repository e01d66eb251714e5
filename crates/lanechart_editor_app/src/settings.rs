// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Stored as RON next to the charts (`lanechart.ron`). Every field has a
//! default, so a partial file only overrides what it names.

use lanechart_editor_timeline::{Palette, Rgba};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "lanechart.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed settings file
    #[error("Settings parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written
    #[error("Settings serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File written by a newer editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// Palette entry is not a hex color
    #[error("Palette entry {index}: {source}")]
    InvalidColor {
        /// Palette position
        index: usize,
        /// Parse failure
        source: lanechart_editor_timeline::ParseColorError,
    },
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Settings format version
    pub version: u32,
    /// Preview frame rate
    pub frames_per_second: f32,
    /// Preview resolution in pixels
    pub resolution: [f32; 2],
    /// Fraction of the screen height covered by tracks
    pub track_screen_height: f32,
    /// Track width at size 1.0, as a fraction of the screen width
    pub track_screen_width: f32,
    /// Track colors as `#RRGGBB` or `#RRGGBBAA`
    pub palette: Vec<String>,
    /// Log filter directive added to `RUST_LOG`
    pub log_filter: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            frames_per_second: 60.0,
            resolution: [1280.0, 720.0],
            track_screen_height: 0.85,
            track_screen_width: 0.12,
            palette: Palette::default().colors().iter().map(Rgba::to_hex).collect(),
            log_filter: "lanechart_editor_app=info".to_string(),
        }
    }
}

impl EditorSettings {
    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Save settings to a file
    #[allow(dead_code)] // Used by tests and embedding hosts
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings file path inside a directory
    pub fn settings_file_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }

    /// Parse the configured palette
    pub fn palette(&self) -> Result<Palette, SettingsError> {
        self.palette
            .iter()
            .enumerate()
            .map(|(index, hex)| {
                hex.parse::<Rgba>()
                    .map_err(|source| SettingsError::InvalidColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Palette::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.frames_per_second, 60.0);
        assert_eq!(settings.palette().unwrap(), Palette::default());
    }

    #[test]
    fn test_serialization() {
        let mut settings = EditorSettings::default();
        settings.frames_per_second = 144.0;
        let config = ron::ser::PrettyConfig::default();
        let ron_str = ron::ser::to_string_pretty(&settings, config).unwrap();
        let loaded: EditorSettings = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: EditorSettings = ron::from_str("(frames_per_second: 30.0)").unwrap();
        assert_eq!(loaded.frames_per_second, 30.0);
        assert_eq!(loaded.track_screen_width, 0.12);
        assert_eq!(loaded.palette.len(), 10);
    }

    #[test]
    fn test_invalid_palette_entry() {
        let settings = EditorSettings {
            palette: vec!["#FFFFFF".to_string(), "blue".to_string()],
            ..EditorSettings::default()
        };
        let err = settings.palette().unwrap_err();
        assert!(matches!(err, SettingsError::InvalidColor { index: 1, .. }));
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("lanechart-settings-does-not-exist.ron");
        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("lanechart-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = EditorSettings::settings_file_path(&dir);

        let settings = EditorSettings {
            resolution: [1920.0, 1080.0],
            ..EditorSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(EditorSettings::load(&path).unwrap(), settings);

        std::fs::write(&path, "(version: 99)").unwrap();
        assert!(matches!(
            EditorSettings::load(&path),
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
