//! Non-fatal warnings raised while editing

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::height::Height;

/// Recoverable condition reported by an edit
///
/// Diagnostics never abort an operation. They are logged where they are
/// produced and handed back to the caller in the operation's report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// No layer at the requested height, the next higher layer was used
    HeightSubstituted {
        /// Height asked for
        requested: Height,
        /// Layer actually used
        substitute: Height,
    },
    /// The requested height is above every layer, nothing was done
    AboveAllLayers {
        /// Height asked for
        requested: Height,
    },
    /// No pause recorded at the height, nothing was removed
    NoPauseAtHeight {
        /// Height asked for
        height: Height,
    },
}

impl Diagnostic {
    /// Emit this diagnostic on the tracing channel
    pub fn log(&self) {
        tracing::warn!("{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeightSubstituted {
                requested,
                substitute,
            } => write!(
                f,
                "{requested} does not exist, using the next higher layer ({substitute})."
            ),
            Self::AboveAllLayers { requested } => write!(f, "{requested} is above all layers."),
            Self::NoPauseAtHeight { height } => write!(f, "No pause found at height of {height}"),
        }
    }
}
