//! Pause block template
//!
//! A pause block is a fixed run of seven G-Code lines that raises the hot end,
//! parks the head away from the print and waits for the operator:
//!
//! ```text
//! ;BEGIN_PAUSE
//! G91    ; Put in relative mode
//! G1 Z10    ; Raise hot end by 10mm
//! G90    ; Put back in absolute mode
//! G1 X10 Y10    ; Move the X & Y away from the print
//! M0 Change filament    ; Pause and wait for the user
//! ;END_PAUSE
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::height::format_general;

/// Opening sentinel, also the detection pattern for existing pauses
pub const PAUSE_BEGIN: &str = ";BEGIN_PAUSE";

/// Closing sentinel
pub const PAUSE_END: &str = ";END_PAUSE";

/// Number of lines in a pause block
pub const PAUSE_BLOCK_LEN: usize = 7;

/// Significant digits used for every number in the block
const NUMBER_PRECISION: usize = 4;

/// Line terminator convention of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix `\n`
    #[default]
    Lf,
    /// Windows `\r\n`
    CrLf,
}

impl LineEnding {
    /// Terminator text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Detect the convention from the first terminated line
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> Self {
        lines
            .iter()
            .map(AsRef::as_ref)
            .find(|line| line.ends_with('\n'))
            .map(|line| {
                if line.ends_with("\r\n") {
                    Self::CrLf
                } else {
                    Self::Lf
                }
            })
            .unwrap_or_default()
    }
}

/// Fully resolved parameters of one pause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseOptions {
    /// Relative Z raise at the start of the pause (mm, > 0)
    pub z_offset: f64,
    /// Absolute X park position (mm, > 0)
    pub x_pause: f64,
    /// Absolute Y park position (mm, > 0)
    pub y_pause: f64,
    /// Text shown by the printer while paused
    pub message: Option<String>,
}

impl Default for PauseOptions {
    fn default() -> Self {
        Self {
            z_offset: 10.0,
            x_pause: 10.0,
            y_pause: 10.0,
            message: None,
        }
    }
}

impl PauseOptions {
    /// Set the pause message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check the raise, park position and message are usable
    ///
    /// The message must not contain line terminators, a pause block is
    /// always exactly [`PAUSE_BLOCK_LEN`] physical lines.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if !(self.z_offset.is_finite() && self.z_offset > 0.0) {
            return Err(TemplateError::InvalidZOffset {
                z_offset: self.z_offset,
            });
        }
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(self.x_pause) && valid(self.y_pause)) {
            return Err(TemplateError::InvalidPausePosition {
                x_pause: self.x_pause,
                y_pause: self.y_pause,
            });
        }
        if let Some(message) = self.message.as_deref() {
            if message.contains(['\n', '\r']) {
                return Err(TemplateError::InvalidMessage {
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Generator for pause blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct PauseTemplate {
    line_ending: LineEnding,
}

impl PauseTemplate {
    /// Create a template emitting lines with the given terminator
    pub fn new(line_ending: LineEnding) -> Self {
        Self { line_ending }
    }

    /// Terminator used by instantiated lines
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Instantiate the block for the given parameters
    ///
    /// Every returned line carries its terminator.
    pub fn instantiate(&self, options: &PauseOptions) -> Result<Vec<String>, TemplateError> {
        options.validate()?;

        let z = format_general(options.z_offset, NUMBER_PRECISION);
        let x = format_general(options.x_pause, NUMBER_PRECISION);
        let y = format_general(options.y_pause, NUMBER_PRECISION);
        let message = options.message.as_deref().unwrap_or_default();

        let eol = self.line_ending.as_str();
        Ok(vec![
            format!("{PAUSE_BEGIN}{eol}"),
            format!("G91    ; Put in relative mode{eol}"),
            format!("G1 Z{z}    ; Raise hot end by {z}mm{eol}"),
            format!("G90    ; Put back in absolute mode{eol}"),
            format!("G1 X{x} Y{y}    ; Move the X & Y away from the print{eol}"),
            format!("M0 {message}    ; Pause and wait for the user{eol}"),
            format!("{PAUSE_END}{eol}"),
        ])
    }
}

/// Strip trailing line terminator characters
pub fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Check whether a line is the opening sentinel of a pause block
pub fn is_pause_begin(line: &str) -> bool {
    strip_terminator(line) == PAUSE_BEGIN
}

/// Check whether a line is the closing sentinel of a pause block
pub fn is_pause_end(line: &str) -> bool {
    strip_terminator(line) == PAUSE_END
}
