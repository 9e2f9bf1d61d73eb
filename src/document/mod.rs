//! Scenario document parsing.
//!
//! This module handles:
//! - Parsing the line-oriented scenario markup into typed blocks
//! - Extracting scene headings for the table of contents
//! - Inline span decomposition (ruby, code, emphasis)

pub mod parser;
mod types;

pub use parser::{parse_blocks, parse_inlines, parse_lines};
pub use types::{Block, Document, HeadingRef, Inline, ParsedDocument};
