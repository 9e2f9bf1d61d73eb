//! Core document types.

/// Result of parsing scenario markup, ready to be assembled into a `Document`.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Typed blocks in source line order
    pub blocks: Vec<Block>,
    /// Scene heading references for the TOC, in encountered order
    pub headings: Vec<HeadingRef>,
    /// Non-fatal problems found while parsing (unterminated blocks etc.)
    pub diagnostics: Vec<crate::error::ScenarioError>,
}

/// A parsed scenario document.
///
/// Blocks are recomputed wholesale from the source on every parse; no block
/// survives past the next parse pass.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original source text
    source: String,
    /// Typed blocks in source line order
    blocks: Vec<Block>,
    /// Scene heading references for the TOC
    headings: Vec<HeadingRef>,
    /// Non-fatal parse problems
    diagnostics: Vec<crate::error::ScenarioError>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            source: String::new(),
            blocks: Vec::new(),
            headings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Create a new document from parsed results.
    pub(crate) fn from_parsed(source: String, result: ParsedDocument) -> Self {
        Self {
            source,
            blocks: result.blocks,
            headings: result.headings,
            diagnostics: result.diagnostics,
        }
    }

    /// Get all blocks in source order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the total number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get all scene headings for the TOC.
    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    /// Get the non-fatal problems found while parsing.
    pub fn diagnostics(&self) -> &[crate::error::ScenarioError] {
        &self.diagnostics
    }

    /// Get the source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A typed block of scenario markup.
///
/// Order in the containing document matches source line order; the
/// multi-line constructs (`SceneTable`, authored `DataCard`) consume a
/// contiguous run of lines bounded by their open/close sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Scene heading (`# title`), a navigation and pagination anchor
    Scene { title: String },
    /// Read-aloud quote (`> text`)
    ReadAloud { text: String },
    /// Sidebar note (`! text`)
    Sidebar { text: String },
    /// Secret text (`:::secret text :::`), hidden until revealed
    Secret { text: String },
    /// Data card: an inline reference (`{{KEY}}`, body `None`) or an
    /// authored card block (`[ho id=KEY] .. [/ho]`, body `Some`)
    DataCard { key: String, body: Option<String> },
    /// Scene table; rows of comma-separated cells, row 0 is the header
    SceneTable { rows: Vec<Vec<String>> },
    /// Manual page break (`---`)
    ManualBreak,
    /// Plain paragraph, decomposed into inline spans
    Paragraph { spans: Vec<Inline> },
    /// Blank line, renders as a line break
    Space,
}

/// An inline span inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Unstyled text
    Text(String),
    /// Emphasis (`*text*`)
    Emphasis(String),
    /// Code span (`|text|`)
    Code(String),
    /// Ruby annotation (`{base}(reading)`)
    Ruby { base: String, reading: String },
}

impl Inline {
    /// The plain text of the span, ignoring styling.
    pub fn plain(&self) -> &str {
        match self {
            Self::Text(t) | Self::Emphasis(t) | Self::Code(t) | Self::Ruby { base: t, .. } => t,
        }
    }
}

/// Reference to a scene heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading text (plain, marker stripped)
    pub text: String,
    /// Ordinal position among scene headings, starting at 0
    pub ordinal: usize,
}

impl HeadingRef {
    /// Stable identifier for deep-linking from the table of contents.
    pub fn anchor(&self) -> String {
        format!("heading-{}", self.ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.block_count(), 0);
        assert!(doc.headings().is_empty());
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_heading_anchor_uses_ordinal() {
        let h = HeadingRef {
            text: "導入".to_string(),
            ordinal: 2,
        };
        assert_eq!(h.anchor(), "heading-2");
    }

    #[test]
    fn test_inline_plain_strips_styling() {
        assert_eq!(Inline::Emphasis("影".to_string()).plain(), "影");
        let ruby = Inline::Ruby {
            base: "忍".to_string(),
            reading: "しのび".to_string(),
        };
        assert_eq!(ruby.plain(), "忍");
    }
}
