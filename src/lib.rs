//! # gcodepause
//!
//! Inserts and removes operator pauses at layer heights in 3D printer G-Code.
//!
//! ## Architecture
//!
//! gcodepause is organized as a workspace with multiple crates:
//!
//! 1. **gcodepause-core** - Heights, pause template, diagnostics, schedules, errors
//! 2. **gcodepause-settings** - Pause defaults, output naming, accepted extensions
//! 3. **gcodepause-editor** - Line buffer, layer/pause indices, `LayerFile` editor
//! 4. **gcodepause** - Facade re-exporting the public API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gcodepause::{LayerFile, PauseOptions};
//!
//! gcodepause::init_logging()?;
//!
//! let mut file = LayerFile::open("benchy.gcode")?;
//! file.insert_pause(12.4, &PauseOptions::default().with_message("Insert magnets"))?;
//! file.insert_pauses_from_file("pauses.yaml")?;
//! file.remove_pause(3.0)?;
//! let written = file.write(None, None)?; // benchy_pause.gcode
//! ```

pub use gcodepause_core::{
    format_general, Diagnostic, Error, Height, LineEnding, PauseOptions, PauseParams,
    PauseRecord, PauseSchedule, PauseTemplate, Result, ScheduleError, SourceError,
    StructureError, TemplateError, PAUSE_BEGIN, PAUSE_BLOCK_LEN, PAUSE_END,
};

pub use gcodepause_editor::{
    parse_layer_marker, EditReport, LayerFile, LayerIndex, LayerTarget, LineBuffer, PauseBlock,
    PauseIndex,
};

pub use gcodepause_settings::{
    Config, InputSettings, OutputSettings, PauseDefaults, SettingsError, SettingsResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, keeping stdout free for G-Code
/// - RUST_LOG environment variable support, INFO by default
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }

    Ok(())
}
