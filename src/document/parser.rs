//! Line-oriented scenario markup parsing.
//!
//! One top-to-bottom scan over the source lines. Every line maps to exactly
//! one block, except the bracketed multi-line constructs (`[scene-table]`,
//! `[ho id=..]`) which consume a contiguous run of lines, and reference
//! lines which yield one `DataCard` block per `{{KEY}}` token.
//!
//! Parsing is pure: authored data cards are recorded on their blocks and
//! folded into the [`crate::data::DataStore`] by a separate reconciliation
//! pass.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Block, Document, HeadingRef, Inline, ParsedDocument};
use crate::error::ScenarioError;

static SECRET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:::secret\s+(.+?)\s*:::$").expect("secret regex"));

/// Inline reference token: uppercase letters followed by digits.
pub static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z]+[0-9]+)\}\}").expect("tag regex"));

static CARD_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[ho\s+id=([A-Z]+[0-9]+)\]\s*$").expect("card open regex"));

static RUBY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+?)\}\(([^()]+?)\)").expect("ruby regex"));

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|([^|]+?)\|").expect("code regex"));

static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+?)\*").expect("emphasis regex"));

const TABLE_OPEN: &str = "[scene-table]";
const TABLE_CLOSE: &str = "[/scene-table]";
const CARD_CLOSE: &str = "[/ho]";

impl Document {
    /// Parse scenario markup into a document.
    ///
    /// Never fails: malformed constructs degrade to partial or literal
    /// content and are reported through [`Document::diagnostics`].
    ///
    /// # Example
    ///
    /// ```
    /// use scenarist::document::Document;
    ///
    /// let doc = Document::parse("# 導入\n> 読み上げ");
    /// assert_eq!(doc.block_count(), 2);
    /// assert_eq!(doc.headings()[0].text, "導入");
    /// ```
    pub fn parse(source: &str) -> Self {
        let lines: Vec<&str> = source.lines().collect();
        let parsed = parse_lines(&lines);
        Self::from_parsed(source.to_string(), parsed)
    }
}

/// Parse raw lines into blocks plus scene headings, in encountered order.
///
/// Thin pair-returning wrapper over [`parse_lines`] for callers that do not
/// care about diagnostics.
pub fn parse_blocks(lines: &[&str]) -> (Vec<Block>, Vec<HeadingRef>) {
    let parsed = parse_lines(lines);
    (parsed.blocks, parsed.headings)
}

/// Parse raw lines into a [`ParsedDocument`].
pub fn parse_lines(lines: &[&str]) -> ParsedDocument {
    let mut out = ParsedDocument::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();

        if let Some(title) = line.strip_prefix("# ") {
            let ordinal = out.headings.len();
            out.headings.push(HeadingRef {
                text: title.trim().to_string(),
                ordinal,
            });
            out.blocks.push(Block::Scene {
                title: title.trim().to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(text) = line.strip_prefix("> ") {
            out.blocks.push(Block::ReadAloud {
                text: text.trim().to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(text) = line.strip_prefix("! ") {
            out.blocks.push(Block::Sidebar {
                text: text.trim().to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(caps) = SECRET_RE.captures(line) {
            out.blocks.push(Block::Secret {
                text: caps[1].to_string(),
            });
            i += 1;
            continue;
        }

        if line.trim() == "---" {
            out.blocks.push(Block::ManualBreak);
            i += 1;
            continue;
        }

        if line.trim() == TABLE_OPEN {
            i = consume_table(lines, i, &mut out);
            continue;
        }

        if let Some(caps) = CARD_OPEN_RE.captures(line.trim()) {
            let key = caps[1].to_string();
            i = consume_card(lines, i, key, &mut out);
            continue;
        }

        // A line carrying reference tokens becomes one data card per token;
        // any other text on the line is dropped.
        if TAG_RE.is_match(line) {
            for caps in TAG_RE.captures_iter(line) {
                out.blocks.push(Block::DataCard {
                    key: caps[1].to_string(),
                    body: None,
                });
            }
            i += 1;
            continue;
        }

        if line.trim().is_empty() {
            out.blocks.push(Block::Space);
        } else {
            out.blocks.push(Block::Paragraph {
                spans: parse_inlines(line),
            });
        }
        i += 1;
    }

    out
}

/// Consume a `[scene-table]` run starting at `open`, returning the index of
/// the first line after the block.
fn consume_table(lines: &[&str], open: usize, out: &mut ParsedDocument) -> usize {
    let mut rows = Vec::new();
    let mut i = open + 1;
    while i < lines.len() && !lines[i].trim_end().starts_with(TABLE_CLOSE) {
        rows.push(split_row(lines[i]));
        i += 1;
    }
    if i >= lines.len() {
        // Unterminated: keep the partial rows, report, stop at end of input.
        let err = ScenarioError::MalformedBlock {
            construct: "scene-table",
            line: open + 1,
        };
        tracing::warn!(%err, "keeping partial table rows");
        out.diagnostics.push(err);
    } else {
        i += 1; // skip the close sentinel
    }
    out.blocks.push(Block::SceneTable { rows });
    i
}

/// Consume a `[ho id=KEY]` run starting at `open`, returning the index of
/// the first line after the block.
fn consume_card(lines: &[&str], open: usize, key: String, out: &mut ParsedDocument) -> usize {
    let mut body_lines = Vec::new();
    let mut i = open + 1;
    while i < lines.len() && lines[i].trim_end() != CARD_CLOSE {
        body_lines.push(lines[i].trim_end());
        i += 1;
    }
    if i >= lines.len() {
        let err = ScenarioError::MalformedBlock {
            construct: "ho",
            line: open + 1,
        };
        tracing::warn!(%err, "keeping partial card body");
        out.diagnostics.push(err);
    } else {
        i += 1;
    }
    out.blocks.push(Block::DataCard {
        key,
        body: Some(body_lines.join("\n")),
    });
    i
}

/// Split a table row into trimmed cells.
///
/// Rows go through the csv reader so quoted cells may contain commas.
fn split_row(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(|c| c.trim().to_string()).collect(),
        _ => vec![line.trim().to_string()],
    }
}

/// Decompose paragraph text into inline spans.
///
/// Scans left to right; at each step the earliest of ruby / code / emphasis
/// wins, with the text before it emitted verbatim. Malformed markers stay
/// literal text.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let candidates = [
            RUBY_RE.captures(rest),
            CODE_RE.captures(rest),
            EMPHASIS_RE.captures(rest),
        ];
        let best = candidates
            .into_iter()
            .enumerate()
            .filter_map(|(kind, caps)| caps.map(|c| (kind, c)))
            .min_by_key(|(_, c)| c.get(0).map_or(usize::MAX, |m| m.start()));

        let Some((kind, caps)) = best else {
            spans.push(Inline::Text(rest.to_string()));
            break;
        };
        let Some(whole) = caps.get(0) else {
            spans.push(Inline::Text(rest.to_string()));
            break;
        };

        if whole.start() > 0 {
            spans.push(Inline::Text(rest[..whole.start()].to_string()));
        }
        match kind {
            0 => spans.push(Inline::Ruby {
                base: caps[1].to_string(),
                reading: caps[2].to_string(),
            }),
            1 => spans.push(Inline::Code(caps[1].to_string())),
            _ => spans.push(Inline::Emphasis(caps[1].to_string())),
        }
        rest = &rest[whole.end()..];
    }

    spans
}
