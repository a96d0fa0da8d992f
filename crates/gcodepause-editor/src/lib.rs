//! # gcodepause editor
//!
//! Loads a layered G-Code file, finds its layer markers (`;12.4`) and pause
//! blocks, and inserts or removes pauses at layer heights.
//!
//! ## Architecture
//!
//! ```text
//! LayerFile (public API)
//!   ├── LineBuffer (lines with their original terminators)
//!   ├── LayerIndex (height -> marker line, rebuilt after each edit)
//!   └── PauseIndex (height -> pause block range, rebuilt after each edit)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gcodepause_core::PauseOptions;
//! use gcodepause_editor::LayerFile;
//!
//! let mut file = LayerFile::open("benchy.gcode")?;
//! file.insert_pause(12.4, &PauseOptions::default().with_message("Insert magnets"))?;
//! file.write(None, None)?; // benchy_pause.gcode
//! ```

mod index;
mod layer_file;
mod line_buffer;

pub use index::{parse_layer_marker, LayerIndex, LayerTarget, PauseBlock, PauseIndex};
pub use layer_file::{EditReport, LayerFile};
pub use line_buffer::LineBuffer;
