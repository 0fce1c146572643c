//! Editor preferences.
//!
//! Persistent settings that survive editor restarts, stored as TOML under
//! the user's config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the preferences file.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Editor preferences and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    // History
    pub undo_capacity: usize,

    // Manipulation
    /// Radians of rotation per world unit dragged
    pub rotation_sensitivity: f32,
    /// Scale change per world unit dragged
    pub scale_sensitivity: f32,
    /// Rotation increment in degrees, 0 disables snapping
    pub rotation_snap_degrees: f32,

    // Recent files
    pub max_recent_files: usize,
    pub recent_files: Vec<PathBuf>,

    // Last used directories
    pub last_mesh_directory: Option<PathBuf>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            undo_capacity: 100,

            rotation_sensitivity: 1.0,
            scale_sensitivity: 0.1,
            rotation_snap_degrees: 0.0,

            max_recent_files: 10,
            recent_files: Vec::new(),

            last_mesh_directory: None,
        }
    }
}

impl Preferences {
    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        let content = std::fs::read_to_string(path)?;
        let prefs = toml::from_str(&content)?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(prefs)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(prefs) => prefs,
            Err(PreferencesError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No preferences at {:?}, using defaults", path);
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring preferences at {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Save preferences to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("lathe");
            p.push("preferences.toml");
            p
        })
    }

    /// Move `path` to the front of the recent files list and remember its
    /// directory.
    pub fn add_recent_file(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(self.max_recent_files);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.last_mesh_directory = Some(dir.to_path_buf());
        }
    }
}
