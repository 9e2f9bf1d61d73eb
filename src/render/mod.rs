//! Rendering blocks to a target-independent node tree.
//!
//! Each block maps to one presentation node (tag / class / text / children),
//! free of markup syntax. The tree is what the paginator measures and what
//! the HTML backend serializes.

mod html;

pub use html::{escape_html, node_to_html, nodes_to_html, wrap_html_document};

use crate::data::{DataStore, not_found_placeholder};
use crate::document::{Block, Document, HeadingRef, Inline};

/// Class used by the manual page-break node.
pub const FORCED_BREAK_CLASS: &str = "forced-break";

/// A markup-free presentation node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: &'static str,
    class: &'static str,
    id: Option<String>,
    attrs: Vec<(&'static str, String)>,
    text: String,
    children: Vec<Node>,
    /// Reveal state for secret nodes; lives on the node, not the document
    revealed: bool,
}

impl Node {
    /// Create a node with a tag and class.
    pub const fn new(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class,
            id: None,
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            revealed: false,
        }
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attrs(&self) -> &[(&'static str, String)] {
        &self.attrs
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether a secret node is currently revealed.
    pub const fn revealed(&self) -> bool {
        self.revealed
    }

    /// Flip the reveal state (the click interaction on secret nodes).
    pub const fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// True for the manual page-break node.
    pub fn is_forced_break(&self) -> bool {
        self.class == FORCED_BREAK_CLASS
    }

    /// Plain text of this node and its children, depth first.
    pub fn flat_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.flat_text());
        }
        out
    }
}

/// Per-render state threaded through block rendering.
///
/// Holds the store for reference lookup and the running scene count used to
/// assign stable `heading-<n>` ids.
#[derive(Debug)]
pub struct RenderContext<'a> {
    store: &'a DataStore,
    scene_count: usize,
}

impl<'a> RenderContext<'a> {
    /// Create a context over a data store.
    pub const fn new(store: &'a DataStore) -> Self {
        Self {
            store,
            scene_count: 0,
        }
    }
}

/// Render one block to a presentation node.
///
/// Pure apart from the scene counter in the context; secrets come out
/// collapsed, missing data cards come out as visible placeholders.
pub fn render_block(block: &Block, ctx: &mut RenderContext<'_>) -> Node {
    match block {
        Block::Scene { title } => {
            let ordinal = ctx.scene_count;
            ctx.scene_count += 1;
            Node::new("h2", "scene-title")
                .with_id(format!("heading-{ordinal}"))
                .with_text(title)
        }
        Block::ReadAloud { text } => Node::new("blockquote", "read-aloud").with_text(text),
        Block::Sidebar { text } => Node::new("aside", "sidebar").with_text(text),
        Block::Secret { text } => Node::new("button", "secret").with_text(text),
        Block::DataCard { key, body } => render_data_card(key, body.as_deref(), ctx.store),
        Block::SceneTable { rows } => render_scene_table(rows),
        Block::ManualBreak => Node::new("div", FORCED_BREAK_CLASS),
        Block::Paragraph { spans } => render_paragraph(spans),
        Block::Space => Node::new("br", ""),
    }
}

/// Render a whole document to nodes, in block order.
pub fn render_document(doc: &Document, store: &DataStore) -> Vec<Node> {
    let mut ctx = RenderContext::new(store);
    doc.blocks()
        .iter()
        .map(|block| render_block(block, &mut ctx))
        .collect()
}

/// Render the trailer section shown above the document body.
pub fn render_trailer(title: &str, cover_image: &str, summary: &str) -> Node {
    let mut node = Node::new("section", "trailer");
    if !cover_image.is_empty() {
        node = node.with_child(Node::new("img", "cover").with_attr("src", cover_image));
    }
    node = node.with_child(Node::new("h1", "").with_text(title));
    if !summary.is_empty() {
        node = node.with_child(Node::new("p", "").with_text(summary));
    }
    node
}

/// Table-of-contents entries: scene headings with their deep-link anchors.
pub fn toc(doc: &Document) -> Vec<(String, String)> {
    doc.headings()
        .iter()
        .map(|h: &HeadingRef| (h.anchor(), h.text.clone()))
        .collect()
}

fn render_data_card(key: &str, body: Option<&str>, store: &DataStore) -> Node {
    let text = body
        .map(ToString::to_string)
        .or_else(|| store.get(key).map(ToString::to_string))
        .unwrap_or_else(|| {
            let err = crate::error::ScenarioError::UnresolvedReference {
                key: key.to_string(),
            };
            tracing::warn!(%err, "rendering placeholder card");
            not_found_placeholder(key)
        });
    Node::new("section", "data-card")
        .with_child(Node::new("h4", "").with_text(key))
        .with_child(Node::new("p", "").with_text(text))
}

fn render_scene_table(rows: &[Vec<String>]) -> Node {
    let mut table = Node::new("table", "scene-table");
    for (index, row) in rows.iter().enumerate() {
        let cell_tag = if index == 0 { "th" } else { "td" };
        let mut tr = Node::new("tr", "");
        for cell in row {
            tr = tr.with_child(Node::new(cell_tag, "").with_text(cell));
        }
        table = table.with_child(tr);
    }
    table
}

fn render_paragraph(spans: &[Inline]) -> Node {
    let mut p = Node::new("p", "paragraph");
    for span in spans {
        let child = match span {
            Inline::Text(t) => Node::new("span", "").with_text(t),
            Inline::Emphasis(t) => Node::new("em", "").with_text(t),
            Inline::Code(t) => Node::new("code", "").with_text(t),
            Inline::Ruby { base, reading } => Node::new("ruby", "")
                .with_text(base)
                .with_child(Node::new("rt", "").with_text(reading)),
        };
        p = p.with_child(child);
    }
    p
}
