//! Configuration management for CrabRTC
//!
//! Provides loading, saving and validation of session defaults and canvas
//! rendering defaults stored as TOML.

use crate::canvas::CanvasConfig;
use crate::errors::RtcError;
use crate::types::{ClientRole, CropRect, RenderMode, SetupMode, Uid};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtcConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub canvas: CanvasDefaults,
}

/// Session-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Engine application identifier
    pub app_id: String,
    /// Role the session starts in
    pub default_role: ClientRole,
    /// Channel to join when the application does not pick one
    pub channel: Option<String>,
    /// Join token; leave unset only for testing projects
    pub token: Option<String>,
}

/// Rendering defaults applied to new canvases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasDefaults {
    pub render_mode: RenderMode,
    pub setup_mode: SetupMode,
    pub crop_area: CropRect,
}

impl CanvasDefaults {
    /// Canvas config for `target` using these defaults
    pub fn declare(&self, target: Uid) -> CanvasConfig {
        CanvasConfig::new(target)
            .with_render_mode(self.render_mode)
            .with_crop_area(self.crop_area)
            .with_setup_mode(self.setup_mode)
    }
}

impl RtcConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RtcError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| RtcError::ConfigIo(format!("Failed to read config file: {}", e)))?;

        let config: RtcConfig = toml::from_str(&contents)
            .map_err(|e| RtcError::InvalidConfig(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RtcError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RtcError::ConfigIo(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| RtcError::InvalidConfig(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| RtcError::ConfigIo(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabrtc.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RtcError> {
        if self.session.app_id.chars().any(char::is_whitespace) {
            return Err(RtcError::InvalidConfig(
                "App id must not contain whitespace".to_string(),
            ));
        }
        if let Some(channel) = &self.session.channel {
            if channel.is_empty() {
                return Err(RtcError::InvalidConfig(
                    "Channel name must not be empty".to_string(),
                ));
            }
        }
        if !self.canvas.crop_area.is_normalized() {
            return Err(RtcError::InvalidConfig(
                "Crop area must lie inside the unit square with positive size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RtcConfig::default();
        assert_eq!(config.session.default_role, ClientRole::Audience);
        assert_eq!(config.canvas.render_mode, RenderMode::Hidden);
        assert!(config.canvas.crop_area.is_full_frame());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut bad_crop = RtcConfig::default();
        bad_crop.canvas.crop_area = CropRect::new(0.5, 0.5, 0.75, 0.25);
        assert!(bad_crop.validate().is_err());

        let mut bad_app = RtcConfig::default();
        bad_app.session.app_id = "has space".to_string();
        assert!(bad_app.validate().is_err());

        let mut bad_channel = RtcConfig::default();
        bad_channel.session.channel = Some(String::new());
        assert!(bad_channel.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("crabrtc.toml");

        let mut config = RtcConfig::default();
        config.session.app_id = "abc123".to_string();
        config.session.default_role = ClientRole::Broadcaster;
        config.canvas.render_mode = RenderMode::Fit;
        config.save_to_file(&config_path).unwrap();

        let loaded = RtcConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_toml_format() {
        let toml_string = toml::to_string_pretty(&RtcConfig::default()).unwrap();
        assert!(toml_string.contains("[session]"));
        assert!(toml_string.contains("[canvas]"));
        assert!(toml_string.contains("default_role = \"audience\""));
        assert!(toml_string.contains("render_mode = \"hidden\""));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[session]\napp_id = \"xyz\"\n").unwrap();

        let loaded = RtcConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.session.app_id, "xyz");
        assert_eq!(loaded.canvas, CanvasDefaults::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = RtcConfig::load_from_file("nonexistent_crabrtc.toml");
        assert_eq!(result.unwrap(), RtcConfig::default());
    }

    #[test]
    fn test_defaults_declare_canvas() {
        let defaults = CanvasDefaults {
            render_mode: RenderMode::Fill,
            ..CanvasDefaults::default()
        };
        let canvas = defaults.declare(9);
        assert_eq!(canvas.target, 9);
        assert_eq!(canvas.render_mode, RenderMode::Fill);
    }
}
