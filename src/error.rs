//! Error taxonomy.
//!
//! All three cases are non-fatal by policy: parsing keeps partial content,
//! unresolved references render a visible placeholder, and invalid imports
//! fall back to the default project. The typed errors exist so callers and
//! diagnostics can still name what went wrong.

use thiserror::Error;

/// A degraded-but-recovered condition in the scenario pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// A multi-line construct was never closed before end of input.
    #[error("unterminated [{construct}] block opened at line {line}")]
    MalformedBlock {
        /// Construct name, e.g. `scene-table` or `ho`
        construct: &'static str,
        /// 1-based source line of the open sentinel
        line: usize,
    },

    /// An inline reference token had no entry in the data store.
    #[error("reference {key} not found in data store")]
    UnresolvedReference {
        /// The token key, e.g. `HO1`
        key: String,
    },

    /// A project import could not be deserialized.
    #[error("invalid project import: {0}")]
    InvalidImport(String),
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidImport(err.to_string())
    }
}
