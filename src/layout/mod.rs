//! Greedy two-column pagination.
//!
//! Rendered nodes flow into fixed-capacity columns, two per page, left
//! before right. Capacity is a physical extent compared against what the
//! [`Measure`] capability reports for each node, so the packing is a
//! layout-feedback loop rather than a function of block count. The crate
//! ships a deterministic text-metrics measurer; tests use a fixed-size one.
//!
//! Column state machine: `Left -> Right` on overflow within a page,
//! `Right -> Left` of a fresh page on overflow at the last column. A manual
//! break forces a fresh page from any state, even an empty column.

use unicode_width::UnicodeWidthStr;

use crate::render::Node;

/// Measurement capability: the rendered extent of a node, in rows.
pub trait Measure {
    fn extent_of(&self, node: &Node) -> u32;
}

/// Deterministic text-metrics measurer.
///
/// Estimates rows by wrapping each node's flattened text at the column
/// width using display cell widths, so CJK text counts double. Tables get
/// one row per `tr` child, cards and trailers add their chrome.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasure {
    /// Column width in display cells
    pub column_width: usize,
}

impl TextMeasure {
    pub fn new(column_width: usize) -> Self {
        Self {
            column_width: column_width.max(1),
        }
    }

    // Row counts are tiny; truncation cannot occur in practice.
    #[allow(clippy::cast_possible_truncation)]
    fn wrapped_rows(&self, text: &str) -> u32 {
        text.lines()
            .map(|line| {
                let cells = UnicodeWidthStr::width(line);
                (cells.div_ceil(self.column_width)).max(1) as u32
            })
            .sum::<u32>()
            .max(1)
    }
}

impl Measure for TextMeasure {
    #[allow(clippy::cast_possible_truncation)]
    fn extent_of(&self, node: &Node) -> u32 {
        match node.tag() {
            "br" => 1,
            "table" => node.children().len() as u32 + 1,
            "section" => {
                // Card or trailer: children stack vertically, plus a border row.
                node.children()
                    .iter()
                    .map(|c| self.extent_of(c))
                    .sum::<u32>()
                    + 1
            }
            "h1" | "h2" => self.wrapped_rows(node.text()) + 1,
            _ => self.wrapped_rows(&node.flat_text()),
        }
    }
}

/// Fixed-extent measurer for tests: every node costs the same.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasure(pub u32);

impl Measure for FixedMeasure {
    fn extent_of(&self, _node: &Node) -> u32 {
        self.0
    }
}

/// One column of placed nodes.
#[derive(Debug, Clone, Default)]
pub struct Column {
    nodes: Vec<Node>,
    used: u32,
}

impl Column {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total measured extent of the placed nodes.
    pub const fn used(&self) -> u32 {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn place(&mut self, node: Node, extent: u32) {
        self.nodes.push(node);
        self.used += extent;
    }
}

/// A page: two fixed-height columns, left filled before right.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub left: Column,
    pub right: Column,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Nodes on this page in reading order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.left.nodes().iter().chain(self.right.nodes())
    }

    fn column(&mut self, slot: Slot) -> &mut Column {
        match slot {
            Slot::Left => &mut self.left,
            Slot::Right => &mut self.right,
        }
    }
}

/// Which column of the current page is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Left,
    Right,
}

/// Flow rendered nodes into pages.
///
/// Greedy: each node goes into the open column; when it would overflow a
/// non-empty column the cursor advances (left to right, then a fresh page)
/// and the node is placed there. A node taller than a whole column is
/// placed alone rather than looping. Manual-break nodes are consumed and
/// force a fresh page unconditionally.
pub fn paginate<M: Measure>(nodes: Vec<Node>, measure: &M, capacity: u32) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut page = Page::default();
    let mut slot = Slot::Left;

    for node in nodes {
        if node.is_forced_break() {
            pages.push(std::mem::take(&mut page));
            slot = Slot::Left;
            continue;
        }

        let extent = measure.extent_of(&node);
        let open = page.column(slot);
        if open.used() + extent > capacity && !open.is_empty() {
            match slot {
                Slot::Left => slot = Slot::Right,
                Slot::Right => {
                    pages.push(std::mem::take(&mut page));
                    slot = Slot::Left;
                }
            }
        }
        page.column(slot).place(node, extent);
    }

    pages.push(page);
    pages
}
