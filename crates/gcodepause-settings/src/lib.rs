//! gcodepause Settings Crate
//!
//! Handles the configuration that drives pause editing: default pause
//! parameters, output file naming and accepted input extensions.

pub mod config;
pub mod error;

pub use config::{Config, InputSettings, OutputSettings, PauseDefaults};
pub use error::{SettingsError, SettingsResult};
