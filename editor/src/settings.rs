//! Editor settings management
//!
//! Persistent settings storage for the editor, currently the interactive
//! creation preferences.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main editor settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Interactive creation settings
    #[serde(default)]
    pub creation: CreationSettings,

    /// Settings version for future migration support
    #[serde(default)]
    pub version: u32,
}

/// Interactive creation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreationSettings {
    /// Grid size coordinates snap to while sizing; 0.0 disables snapping
    pub grid_snap: f32,
    /// Material script used for the live preview
    pub preview_material: String,
    /// Material script used for the finalized object
    pub model_material: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            creation: CreationSettings::default(),
            version: 1,
        }
    }
}

impl Default for CreationSettings {
    fn default() -> Self {
        Self {
            grid_snap: 0.0,
            preview_material: "turquoise_glow_outline".to_string(),
            model_material: "grey".to_string(),
        }
    }
}

impl EditorSettings {
    /// Get the default path for the settings file
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("editor_settings.json")
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(Self::default_path())
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::default_path();
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<Self>(&content) {
            Ok(settings) => {
                info!("Loaded editor settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                warn!("Failed to parse settings file: {}. Using defaults.", e);
                Ok(Self::default())
            }
        }
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved editor settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)?;
        info!("Loaded editor settings from {:?}", path.as_ref());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.creation.grid_snap, 0.0);
        assert_eq!(settings.creation.model_material, "grey");
    }

    #[test]
    fn test_save_load_settings() {
        let mut settings = EditorSettings::default();
        settings.creation.grid_snap = 0.5;
        settings.creation.preview_material = "wireframe".to_string();

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let temp_path = temp_file.path();

        settings
            .save_to(temp_path)
            .expect("Failed to save settings");

        let loaded = EditorSettings::load_from(temp_path).expect("Failed to load settings");
        assert_eq!(loaded.creation.grid_snap, 0.5);
        assert_eq!(loaded.creation.preview_material, "wireframe");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let temp_path = temp_file.path();

        std::fs::write(temp_path, "{ invalid json }").expect("Failed to write file");
        assert!(EditorSettings::load_from(temp_path).is_err());
    }
}
