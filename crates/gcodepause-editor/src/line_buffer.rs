//! Line buffer holding the whole G-Code file in memory

use gcodepause_core::LineEnding;
use std::fmt;
use std::ops::RangeInclusive;

/// Ordered lines of a file, each keeping its original terminator
///
/// Concatenating the lines reproduces the file byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line, terminator included
    pub fn line(&self, line_idx: usize) -> Option<&str> {
        self.lines.get(line_idx).map(String::as_str)
    }

    /// All lines, terminators included
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Iterate over lines
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }

    /// Line terminator convention of the buffer
    pub fn line_ending(&self) -> LineEnding {
        LineEnding::detect(&self.lines)
    }

    /// Insert lines so the first one lands at `line_idx`
    pub fn insert_lines(&mut self, line_idx: usize, lines: Vec<String>) {
        let line_idx = line_idx.min(self.len());
        self.lines.splice(line_idx..line_idx, lines);
    }

    /// Remove an inclusive range of lines
    pub fn remove_lines(&mut self, range: RangeInclusive<usize>) {
        let start = (*range.start()).min(self.len());
        let end = range.end().saturating_add(1).min(self.len());

        if start < end {
            self.lines.drain(start..end);
        }
    }

    /// Give an unterminated line the given terminator
    pub fn terminate_line(&mut self, line_idx: usize, ending: LineEnding) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            if !line.ends_with('\n') {
                line.push_str(ending.as_str());
            }
        }
    }
}

impl From<&str> for LineBuffer {
    fn from(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }
}

impl From<Vec<String>> for LineBuffer {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}
