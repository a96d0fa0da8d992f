//! Pause editing for a layered G-Code file

use gcodepause_core::{
    Diagnostic, Error, Height, PauseOptions, PauseSchedule, PauseTemplate, Result, SourceError,
};
use gcodepause_settings::Config;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::index::{LayerIndex, LayerTarget, PauseBlock, PauseIndex};
use crate::line_buffer::LineBuffer;

/// Outcome of a single insert or remove
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditReport {
    /// Layer the edit was applied to
    pub height: Option<Height>,
    /// Lines inserted or removed
    pub block: Option<PauseBlock>,
    /// Warnings raised while editing
    pub diagnostics: Vec<Diagnostic>,
}

impl EditReport {
    /// Check whether the buffer was changed
    pub fn applied(&self) -> bool {
        self.block.is_some()
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }
}

/// A G-Code file loaded for pause editing
///
/// Owns the file's lines plus the layer and pause indices derived from them.
/// Every edit builds the new lines and their indices first and only replaces
/// the current state once both are valid.
#[derive(Debug, Clone)]
pub struct LayerFile {
    source: PathBuf,
    config: Config,
    buffer: LineBuffer,
    layers: LayerIndex,
    pauses: PauseIndex,
}

impl LayerFile {
    /// Load a G-Code file with the default configuration
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Load a G-Code file
    ///
    /// The path must be an existing file with one of the extensions accepted
    /// by `config.input`.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        if !config.input.accepts(path) {
            return Err(SourceError::UnsupportedExtension {
                path: path.to_path_buf(),
                expected: config.input.extensions.join(", "),
            }
            .into());
        }

        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file = Self::parse_with_config(path, &text, config)?;
        info!(
            "Loaded {} ({} lines, {} layers, {} pauses)",
            path.display(),
            file.line_count(),
            file.layers.len(),
            file.pauses.len()
        );
        Ok(file)
    }

    /// Build from in-memory text with the default configuration
    ///
    /// `source` is only used to name the output of [`LayerFile::write`].
    pub fn parse(source: impl Into<PathBuf>, text: &str) -> Result<Self> {
        Self::parse_with_config(source, text, Config::default())
    }

    /// Build from in-memory text
    pub fn parse_with_config(
        source: impl Into<PathBuf>,
        text: &str,
        config: Config,
    ) -> Result<Self> {
        let buffer = LineBuffer::from(text);
        let layers = LayerIndex::scan(&buffer);
        let pauses = PauseIndex::scan(&buffer, &layers)?;

        Ok(Self {
            source: source.into(),
            config,
            buffer,
            layers,
            pauses,
        })
    }

    /// Path of the original file
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current lines
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Current lines, terminators included
    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.buffer.len()
    }

    /// Layer index of the current lines
    pub fn layers(&self) -> &LayerIndex {
        &self.layers
    }

    /// Pause index of the current lines
    pub fn pauses(&self) -> &PauseIndex {
        &self.pauses
    }

    /// Whole file text as it would be written
    pub fn contents(&self) -> String {
        self.buffer.to_string()
    }

    /// Resolve a height to the layer a pause would be attached to
    pub fn resolve_layer(&self, z: impl Into<Height>) -> LayerTarget {
        self.layers.resolve(z)
    }

    /// Insert a pause at the start of the layer at height `z`
    ///
    /// When no layer sits exactly at `z` the next higher layer is used. When
    /// `z` is above every layer nothing happens. Both cases are reported as
    /// diagnostics. Inserting twice at one height stacks two blocks.
    pub fn insert_pause(
        &mut self,
        z: impl Into<Height>,
        options: &PauseOptions,
    ) -> Result<EditReport> {
        let mut report = EditReport::default();

        let target = self.layers.resolve(z);
        if let Some(diagnostic) = target.diagnostic() {
            report.warn(diagnostic);
        }
        let Some((height, marker)) = target.layer() else {
            return Ok(report);
        };

        let ending = self.buffer.line_ending();
        let block_lines = PauseTemplate::new(ending).instantiate(options)?;
        let block = PauseBlock::at(marker + 1);

        let mut buffer = self.buffer.clone();
        buffer.terminate_line(marker, ending);
        buffer.insert_lines(block.start, block_lines);
        self.commit(buffer)?;

        info!(
            "Inserted pause at layer {} (lines {}..={})",
            height, block.start, block.end
        );
        report.height = Some(height);
        report.block = Some(block);
        Ok(report)
    }

    /// Insert a pause using the configured defaults
    pub fn insert_default_pause(&mut self, z: impl Into<Height>) -> Result<EditReport> {
        let options = self.config.defaults.to_options();
        self.insert_pause(z, &options)
    }

    /// Insert every pause of a schedule, in schedule order
    ///
    /// Stops at the first failing record. Records applied before it stay
    /// applied.
    pub fn apply_schedule(&mut self, schedule: &PauseSchedule) -> Result<Vec<EditReport>> {
        let defaults = self.config.defaults.to_options();
        let mut reports = Vec::with_capacity(schedule.len());

        for record in schedule {
            let options = record.params.resolve(&defaults);
            reports.push(self.insert_pause(record.height, &options)?);
        }
        Ok(reports)
    }

    /// Load a schedule file (YAML or JSON) and insert its pauses
    pub fn insert_pauses_from_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<EditReport>> {
        let schedule = PauseSchedule::load(path.as_ref())?;
        self.apply_schedule(&schedule)
    }

    /// Remove the pause recorded at exactly `height`
    ///
    /// A missing pause is reported as a diagnostic and leaves the file as is.
    /// With stacked pauses the most recently inserted block goes first.
    ///
    /// Removal undoes an insert byte-for-byte, except when the marker was the
    /// unterminated last line: the terminator added on insert stays.
    pub fn remove_pause(&mut self, height: impl Into<Height>) -> Result<EditReport> {
        let height = height.into();
        let mut report = EditReport::default();

        let Some(block) = self.pauses.get(height) else {
            report.warn(Diagnostic::NoPauseAtHeight { height });
            return Ok(report);
        };

        let mut buffer = self.buffer.clone();
        buffer.remove_lines(block.start..=block.end);
        self.commit(buffer)?;

        info!(
            "Removed pause at layer {} (lines {}..={})",
            height, block.start, block.end
        );
        report.height = Some(height);
        report.block = Some(block);
        Ok(report)
    }

    /// Remove every pause block, stacked ones included
    ///
    /// Returns the number of blocks removed.
    pub fn remove_all_pauses(&mut self) -> Result<usize> {
        let mut removed = 0;
        while let Some((height, _)) = self.pauses.first() {
            self.remove_pause(height)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Path [`LayerFile::write`] uses when no destination is given
    ///
    /// The suffix goes between the source stem and its extension, in the
    /// source directory.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.source.file_stem().unwrap_or_default().to_os_string();
        name.push(suffix);
        if let Some(extension) = self.source.extension() {
            name.push(".");
            name.push(extension);
        }
        self.source.with_file_name(name)
    }

    /// Write the current lines
    ///
    /// Without a destination the output is named after the source with
    /// `suffix` (or the configured suffix) appended to the stem. An existing
    /// file is overwritten. The write is not atomic.
    pub fn write(&self, destination: Option<&Path>, suffix: Option<&str>) -> Result<PathBuf> {
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => self.output_path(suffix.unwrap_or(&self.config.output.suffix)),
        };

        std::fs::write(&path, self.contents()).map_err(Error::Io)?;
        info!("Wrote {} lines to {}", self.line_count(), path.display());
        Ok(path)
    }

    /// Replace the current lines, rebuilding both indices
    fn commit(&mut self, buffer: LineBuffer) -> Result<()> {
        let layers = LayerIndex::scan(&buffer);
        let pauses = PauseIndex::scan(&buffer, &layers)?;
        debug!(
            "Rebuilt indices: {} layers, {} pauses",
            layers.len(),
            pauses.len()
        );

        self.buffer = buffer;
        self.layers = layers;
        self.pauses = pauses;
        Ok(())
    }
}

impl fmt::Display for LayerFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.buffer, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINT: &str = ";10\nG1 X1\n;20\nG1 X2\n;30\nG1 X3\n";

    fn print() -> LayerFile {
        LayerFile::parse("part.gcode", PRINT).unwrap()
    }

    #[test]
    fn test_output_path() {
        let file = LayerFile::parse("/prints/benchy.gcode", "").unwrap();
        assert_eq!(
            file.output_path("_pause"),
            PathBuf::from("/prints/benchy_pause.gcode")
        );

        let file = LayerFile::parse("benchy", "").unwrap();
        assert_eq!(file.output_path("_x"), PathBuf::from("benchy_x"));
    }

    #[test]
    fn test_insert_shifts_later_layers() {
        let mut file = print();
        let report = file.insert_pause(20.0, &PauseOptions::default()).unwrap();

        assert!(report.applied());
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.block, Some(PauseBlock { start: 3, end: 9 }));
        assert_eq!(file.layers().len(), 3);
        assert_eq!(file.layers().get(10.0), Some(0));
        assert_eq!(file.layers().get(20.0), Some(2));
        assert_eq!(file.layers().get(30.0), Some(4 + 7));
        assert_eq!(file.pauses().get(20.0), Some(PauseBlock { start: 3, end: 9 }));
    }

    #[test]
    fn test_unterminated_last_marker() {
        let mut file = LayerFile::parse("part.gcode", ";10\nG1\n;20").unwrap();
        file.insert_pause(20.0, &PauseOptions::default()).unwrap();

        assert_eq!(file.lines()[2], ";20\n");
        assert_eq!(file.lines()[3], ";BEGIN_PAUSE\n");
        assert_eq!(file.pauses().get(20.0), Some(PauseBlock { start: 3, end: 9 }));

        // The terminator added to the marker survives removal
        file.remove_pause(20.0).unwrap();
        assert_eq!(file.contents(), ";10\nG1\n;20\n");
    }

    #[test]
    fn test_crlf_file_gets_crlf_block() {
        let mut file = LayerFile::parse("part.gcode", ";1\r\nG1\r\n").unwrap();
        file.insert_pause(1.0, &PauseOptions::default()).unwrap();
        assert!(file.lines().iter().all(|l| l.ends_with("\r\n")));
        assert!(file.pauses().contains(1.0));
    }

    #[test]
    fn test_display_matches_contents() {
        let file = print();
        assert_eq!(file.to_string(), PRINT);
        assert_eq!(file.contents(), PRINT);
    }
}
