//! Error handling for gcodepause
//!
//! Provides error types for every stage of a pause edit:
//! - Source errors (locating and reading the print file)
//! - Template errors (invalid pause parameters)
//! - Structure errors (pause blocks that do not follow a layer marker)
//! - Schedule errors (declarative pause lists)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Source file error type
///
/// Raised while validating or reading the G-Code file being edited.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The path does not point at an existing file
    #[error("{} is not a valid file", .path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but does not carry a printer-control extension
    #[error("{} is not a G-Code file (expected one of: {expected})", .path.display())]
    UnsupportedExtension {
        /// The path that was requested.
        path: PathBuf,
        /// Comma separated list of accepted extensions.
        expected: String,
    },

    /// The file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Pause template error type
///
/// Raised when a pause cannot be instantiated from its parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// The Z raise is not strictly positive
    #[error("z_offset must be greater than zero, got {z_offset}")]
    InvalidZOffset {
        /// The rejected value.
        z_offset: f64,
    },

    /// The park position is not strictly positive
    #[error("x_pause and y_pause must be greater than zero, got ({x_pause}, {y_pause})")]
    InvalidPausePosition {
        /// The rejected X value.
        x_pause: f64,
        /// The rejected Y value.
        y_pause: f64,
    },

    /// The message would split the M0 line
    #[error("message must be a single line, got {message:?}")]
    InvalidMessage {
        /// The rejected message.
        message: String,
    },
}

/// Buffer structure error type
///
/// Raised when the scanned file violates the layer/pause layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A pause sentinel that is not directly preceded by a layer marker
    #[error("Pause block at line {line} does not follow a layer marker")]
    OrphanPause {
        /// Zero-based line of the opening sentinel.
        line: usize,
    },
}

/// Pause schedule error type
///
/// Raised while loading a declarative list of pauses.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The schedule file does not exist
    #[error("{} is not a valid file", .path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The schedule file could not be read
    #[error("Failed to read schedule {}: {source}", .path.display())]
    Read {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The schedule file extension is not a known format
    #[error("Unsupported schedule format: {0}")]
    UnsupportedFormat(String),

    /// YAML parse error
    #[error("Invalid YAML schedule: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error
    #[error("Invalid JSON schedule: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for gcodepause
///
/// A unified error type covering every fatal condition of an edit.
#[derive(Error, Debug)]
pub enum Error {
    /// Source file error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Template parameter error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Buffer structure error
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Schedule error
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a source file error
    pub fn is_source_error(&self) -> bool {
        matches!(self, Error::Source(_))
    }

    /// Check if this is an invalid parameter error
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Error::Template(_))
    }

    /// Check if this is a structure error
    pub fn is_structure_error(&self) -> bool {
        matches!(self, Error::Structure(_))
    }

    /// Check if this is a schedule error
    pub fn is_schedule_error(&self) -> bool {
        matches!(self, Error::Schedule(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
