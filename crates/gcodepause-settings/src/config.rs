//! Configuration for pause editing
//!
//! Configuration is organized into logical sections:
//! - Pause defaults (raise, park position, message)
//! - Output naming (suffix for derived file names)
//! - Input acceptance (recognized G-Code extensions)
//!
//! Files are read and written as JSON or TOML, chosen by extension.

use gcodepause_core::PauseOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SettingsError, SettingsResult};

/// Default parameters applied to pauses that do not set their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseDefaults {
    /// Relative Z raise (mm)
    pub z_offset: f64,
    /// X park position (mm)
    pub x_pause: f64,
    /// Y park position (mm)
    pub y_pause: f64,
    /// Operator message
    pub message: Option<String>,
}

impl Default for PauseDefaults {
    fn default() -> Self {
        let options = PauseOptions::default();
        Self {
            z_offset: options.z_offset,
            x_pause: options.x_pause,
            y_pause: options.y_pause,
            message: options.message,
        }
    }
}

impl PauseDefaults {
    /// Convert to fully resolved pause options
    pub fn to_options(&self) -> PauseOptions {
        PauseOptions {
            z_offset: self.z_offset,
            x_pause: self.x_pause,
            y_pause: self.y_pause,
            message: self.message.clone(),
        }
    }
}

/// Output file naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Inserted between the source stem and its extension
    pub suffix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: "_pause".to_string(),
        }
    }
}

/// Accepted input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Extensions (without the dot) recognized as G-Code
    pub extensions: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["gcode".to_string()],
        }
    }
}

impl InputSettings {
    /// Check whether a path carries an accepted extension (ASCII case-insensitive)
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}

/// Complete pause editing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Pause defaults
    pub defaults: PauseDefaults,
    /// Output naming
    pub output: OutputSettings,
    /// Input acceptance
    pub input: InputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Self::format_of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Self::format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.defaults.z_offset) {
            return Err(SettingsError::invalid(
                "defaults.z_offset",
                "must be greater than zero",
            ));
        }
        if !positive(self.defaults.x_pause) {
            return Err(SettingsError::invalid(
                "defaults.x_pause",
                "must be greater than zero",
            ));
        }
        if !positive(self.defaults.y_pause) {
            return Err(SettingsError::invalid(
                "defaults.y_pause",
                "must be greater than zero",
            ));
        }

        if let Some(message) = &self.defaults.message {
            if message.contains(['\n', '\r']) {
                return Err(SettingsError::invalid(
                    "defaults.message",
                    "must be a single line",
                ));
            }
        }

        // An empty suffix would write over the source file
        if self.output.suffix.is_empty() {
            return Err(SettingsError::invalid("output.suffix", "must not be empty"));
        }
        if self.output.suffix.contains(['/', '\\']) {
            return Err(SettingsError::invalid(
                "output.suffix",
                "must not contain path separators",
            ));
        }

        if self.input.extensions.is_empty() {
            return Err(SettingsError::invalid(
                "input.extensions",
                "at least one extension is required",
            ));
        }

        Ok(())
    }

    fn format_of(path: &Path) -> SettingsResult<Format> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

enum Format {
    Json,
    Toml,
}
