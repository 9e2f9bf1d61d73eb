// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference
    clippy::module_name_repetitions
)]

//! # Scenarist
//!
//! The core of a tabletop-RPG scenario authoring tool: a line-oriented
//! markup language, a data-card store, and a two-column paginated preview.
//!
//! The pipeline is recompute-everything, in a fixed order per edit:
//! parse, reconcile authored data cards into the store, render to a
//! target-independent node tree, paginate by measured extent.
//!
//! ## Modules
//!
//! - [`document`]: markup parsing into typed blocks
//! - [`data`]: data-card store, reconciliation, reference resolution
//! - [`render`]: block-to-node rendering and the HTML backend
//! - [`layout`]: greedy two-column pagination over measured extents
//! - [`project`]: the persisted/exported project aggregate
//! - [`storage`]: key-value persistence (autosave, snippets)
//! - [`export`]: text/HTML/JSON export and the print bridge
//! - [`config`]: saved command-line defaults

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod export;
pub mod layout;
pub mod project;
pub mod render;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{DataStore, reconcile, resolve_tags};
    pub use crate::document::{Block, Document};
    pub use crate::layout::{Measure, Page, TextMeasure, paginate};
    pub use crate::project::Project;
    pub use crate::render::{Node, render_document};
}
