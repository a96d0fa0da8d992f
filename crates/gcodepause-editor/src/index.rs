//! Layer and pause indices derived from a line buffer
//!
//! Both indices are rebuilt from scratch after every edit, they are never
//! patched in place.

use gcodepause_core::{
    is_pause_begin, is_pause_end, strip_terminator, Diagnostic, Height, StructureError,
    PAUSE_BLOCK_LEN,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use crate::line_buffer::LineBuffer;

/// Check whether a line is a layer marker (`;12.4`) and return its height
pub fn parse_layer_marker(line: &str) -> Option<Height> {
    static LAYER_REGEX: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let regex = LAYER_REGEX
        .get_or_init(|| Regex::new(r"^;[0-9]+(?:\.[0-9]*)?$").expect("invalid regex pattern"));

    let line = strip_terminator(line);
    if regex.is_match(line) {
        line[1..].parse::<f64>().ok().map(Height::new)
    } else {
        None
    }
}

/// Where a pause would go for a requested height
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerTarget {
    /// A layer exists at exactly the requested height
    Exact {
        /// Layer height
        height: Height,
        /// Marker line
        line: usize,
    },
    /// The next higher layer stands in for the requested one
    Substituted {
        /// Height asked for
        requested: Height,
        /// Layer used instead
        height: Height,
        /// Marker line of the substitute
        line: usize,
    },
    /// Nothing at or above the requested height
    AboveAllLayers {
        /// Height asked for
        requested: Height,
    },
}

impl LayerTarget {
    /// Height and marker line of the resolved layer, if any
    pub fn layer(&self) -> Option<(Height, usize)> {
        match *self {
            Self::Exact { height, line } | Self::Substituted { height, line, .. } => {
                Some((height, line))
            }
            Self::AboveAllLayers { .. } => None,
        }
    }

    /// Marker line of the resolved layer, if any
    pub fn line(&self) -> Option<usize> {
        self.layer().map(|(_, line)| line)
    }

    /// Warning implied by this resolution
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match *self {
            Self::Exact { .. } => None,
            Self::Substituted {
                requested, height, ..
            } => Some(Diagnostic::HeightSubstituted {
                requested,
                substitute: height,
            }),
            Self::AboveAllLayers { requested } => Some(Diagnostic::AboveAllLayers { requested }),
        }
    }
}

/// Layer height to marker line, in height order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerIndex {
    layers: BTreeMap<Height, usize>,
}

impl LayerIndex {
    /// Scan a buffer top to bottom for layer markers
    ///
    /// A height seen twice keeps its last marker line.
    pub fn scan(buffer: &LineBuffer) -> Self {
        let layers = buffer
            .iter()
            .enumerate()
            .filter_map(|(line_num, line)| parse_layer_marker(line).map(|h| (h, line_num)))
            .collect();
        Self { layers }
    }

    /// Marker line of the layer at exactly `height`
    pub fn get(&self, height: impl Into<Height>) -> Option<usize> {
        self.layers.get(&height.into()).copied()
    }

    /// Check if a layer exists at exactly `height`
    pub fn contains(&self, height: impl Into<Height>) -> bool {
        self.layers.contains_key(&height.into())
    }

    /// Lowest layer strictly above `height`
    pub fn next_above(&self, height: impl Into<Height>) -> Option<(Height, usize)> {
        self.layers
            .range((Bound::Excluded(height.into()), Bound::Unbounded))
            .next()
            .map(|(h, line)| (*h, *line))
    }

    /// Resolve a requested height to a layer
    pub fn resolve(&self, requested: impl Into<Height>) -> LayerTarget {
        let requested = requested.into();
        if let Some(line) = self.get(requested) {
            return LayerTarget::Exact {
                height: requested,
                line,
            };
        }
        match self.next_above(requested) {
            Some((height, line)) => LayerTarget::Substituted {
                requested,
                height,
                line,
            },
            None => LayerTarget::AboveAllLayers { requested },
        }
    }

    /// Iterate over (height, marker line) in height order
    pub fn iter(&self) -> impl Iterator<Item = (Height, usize)> + '_ {
        self.layers.iter().map(|(h, line)| (*h, *line))
    }

    /// Layer heights in ascending order
    pub fn heights(&self) -> Vec<Height> {
        self.layers.keys().copied().collect()
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if no layer markers were found
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Inclusive line range of a pause block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseBlock {
    /// Line of the opening sentinel
    pub start: usize,
    /// Line of the closing sentinel
    pub end: usize,
}

impl PauseBlock {
    /// Block whose opening sentinel is at `start`
    pub fn at(start: usize) -> Self {
        Self {
            start,
            end: start + PAUSE_BLOCK_LEN - 1,
        }
    }

    /// Number of lines covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false, a block spans at least one line
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Layer height to the pause block right after its marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PauseIndex {
    pauses: BTreeMap<Height, PauseBlock>,
}

impl PauseIndex {
    /// Scan a buffer for pause blocks and attach each to its layer
    ///
    /// A block must follow its layer marker directly, or follow the closing
    /// line of another block of the same layer when pauses are stacked. Only
    /// the block adjacent to the marker is indexed.
    pub fn scan(buffer: &LineBuffer, layers: &LayerIndex) -> Result<Self, StructureError> {
        let by_line: HashMap<usize, Height> = layers.iter().map(|(h, line)| (line, h)).collect();
        let mut pauses = BTreeMap::new();
        let mut last_block: Option<(Height, PauseBlock)> = None;

        for (line_num, line) in buffer.iter().enumerate() {
            if !is_pause_begin(line) {
                continue;
            }
            let previous = line_num
                .checked_sub(1)
                .ok_or(StructureError::OrphanPause { line: line_num })?;
            let block = PauseBlock::at(line_num);

            if let Some(height) = by_line.get(&previous) {
                pauses.insert(*height, block);
                last_block = Some((*height, block));
                continue;
            }

            let stacked_on = last_block
                .filter(|(_, above)| above.end == previous)
                .filter(|_| buffer.line(previous).is_some_and(is_pause_end));
            match stacked_on {
                Some((height, _)) => last_block = Some((height, block)),
                None => return Err(StructureError::OrphanPause { line: line_num }),
            }
        }

        Ok(Self { pauses })
    }

    /// Pause block of the layer at exactly `height`
    pub fn get(&self, height: impl Into<Height>) -> Option<PauseBlock> {
        self.pauses.get(&height.into()).copied()
    }

    /// Check if a pause is recorded at exactly `height`
    pub fn contains(&self, height: impl Into<Height>) -> bool {
        self.pauses.contains_key(&height.into())
    }

    /// Lowest pause in the index
    pub fn first(&self) -> Option<(Height, PauseBlock)> {
        self.pauses.first_key_value().map(|(h, block)| (*h, *block))
    }

    /// Iterate over (height, block) in height order
    pub fn iter(&self) -> impl Iterator<Item = (Height, PauseBlock)> + '_ {
        self.pauses.iter().map(|(h, block)| (*h, *block))
    }

    /// Number of indexed pauses
    pub fn len(&self) -> usize {
        self.pauses.len()
    }

    /// Check if no pauses are indexed
    pub fn is_empty(&self) -> bool {
        self.pauses.is_empty()
    }
}
