//! # gcodepause core
//!
//! Shared building blocks for editing pauses into layered G-Code:
//! - **Height**: ordered layer height key and general numeric formatting
//! - **PauseTemplate**: the seven-line pause block and its parameters
//! - **Diagnostic**: non-fatal warnings produced by edits
//! - **PauseSchedule**: declarative, ordered pause lists (YAML/JSON)
//! - **Error**: unified error type for every fatal condition

pub mod diagnostics;
pub mod error;
pub mod height;
pub mod schedule;
pub mod template;

pub use diagnostics::Diagnostic;
pub use error::{Error, Result, ScheduleError, SourceError, StructureError, TemplateError};
pub use height::{format_general, Height};
pub use schedule::{PauseParams, PauseRecord, PauseSchedule};
pub use template::{
    is_pause_begin, is_pause_end, strip_terminator, LineEnding, PauseOptions, PauseTemplate,
    PAUSE_BEGIN, PAUSE_BLOCK_LEN, PAUSE_END,
};
