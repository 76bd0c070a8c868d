//! Deterministic layout for the clustered heatmap and its dendrogram.
//!
//! This module computes every screen position from the payload alone:
//! - [`layout_dendrogram`] assigns each clustering-tree node a vertical slot
//!   (depth-first, left-to-right leaf ordering, uniform sibling separation)
//!   and a horizontal slot inside the band reserved by
//!   [`LayoutConfig::cluster_space`], so tree and matrix never overlap.
//! - [`layout_matrix`] flattens a co-occurrence matrix into [`CellRecord`]s
//!   on a fixed-size grid offset by the same cluster-space constant.
//! - [`elbow_paths`] derives the right-angle connectors between parent and
//!   child tree nodes. For leaves the horizontal run extends to the right
//!   edge of the row label, whose width comes from a [`Measurer`] evaluated
//!   up front — layout never depends on already-rendered output.
//!
//! The algorithm is fully deterministic and uses no randomness.

use anyhow::{Result, bail};
use indexmap::IndexMap;

use crate::model::{DendrogramNode, display_label};

/// Gap between a leaf node position and the left edge of its row label.
pub const LABEL_GAP: f32 = 8.0;

/// Fixed sizing constants shared by the tree and the grid.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Edge length of one heatmap cell.
    pub cell_size: f32,
    /// Horizontal band reserved at the layout origin for the clustering tree.
    pub cluster_space: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: 12.0,
            cluster_space: 150.0,
        }
    }
}

impl LayoutConfig {
    /// Vertical extent of the dendrogram band for the given row count.
    pub fn tree_height(&self, rows: usize) -> f32 {
        self.cell_size * rows as f32
    }

    /// Horizontal extent of the dendrogram band.
    pub fn tree_width(&self) -> f32 {
        self.cluster_space * 1.5
    }
}

/// A dendrogram node with computed coordinates.
///
/// Following the clustering-layout convention, `x` encodes the vertical
/// position (leaf ordering top-to-bottom) and `y` the horizontal distance
/// from the root.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub taxid: Option<u32>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Vertical position within the tree band.
    pub x: f32,
    /// Horizontal position within the tree band (root at 0).
    pub y: f32,
}

impl LayoutNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The laid-out dendrogram: a node arena (root first) plus the resulting
/// top-to-bottom leaf order. Rebuilt from scratch on every render.
#[derive(Debug, Clone, Default)]
pub struct DendrogramLayout {
    pub nodes: Vec<LayoutNode>,
    /// Taxon ids of the leaves, top to bottom.
    pub leaf_order: Vec<u32>,
}

impl DendrogramLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All (parent, child) index pairs, in node order.
    pub fn links(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            for &c in &node.children {
                out.push((i, c));
            }
        }
        out
    }

    /// Arena index of the leaf carrying the given taxon id.
    pub fn leaf_index(&self, taxid: u32) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.is_leaf() && n.taxid == Some(taxid))
    }

    /// Taxon id of the leftmost leaf beneath the given node. Used to describe
    /// a clustering join by the first species it leads to.
    pub fn first_leaf(&self, mut idx: usize) -> Option<u32> {
        loop {
            let node = self.nodes.get(idx)?;
            match node.children.first() {
                Some(&c) => idx = c,
                None => return node.taxid,
            }
        }
    }
}

/// Lay out the clustering tree for a heatmap with `row_count` rows.
///
/// Leaves are distributed uniformly over the tree band height in depth-first,
/// left-to-right order (siblings keep their given order, no re-sorting).
/// Internal nodes sit midway between their first and last child's vertical
/// positions and at a horizontal level proportional to their clustering
/// height, with all
/// leaves aligned on the right edge of the band. The whole band is offset
/// one cell down so each leaf is vertically centered on its matrix row.
/// A tree with zero leaves produces an empty layout.
pub fn layout_dendrogram(
    tree: &DendrogramNode,
    row_count: usize,
    cfg: &LayoutConfig,
) -> DendrogramLayout {
    if tree.leaf_count() == 0 {
        return DendrogramLayout::default();
    }

    let mut nodes = Vec::new();
    flatten(tree, None, &mut nodes);

    let mut heights = vec![0.0f32; nodes.len()];
    let mut next_slot = 0.0f32;
    first_pass(&mut nodes, &mut heights, 0, &mut next_slot);
    let leaf_total = next_slot;
    let root_height = heights[0];

    let band_h = cfg.tree_height(row_count);
    let band_w = cfg.tree_width();
    for (i, node) in nodes.iter_mut().enumerate() {
        // Leaves occupy slots 0..n; center each within its slot, then scale.
        // The band is shifted one cell down so leaf r is centered on matrix
        // row r, whose cells sit on a 1-based grid.
        node.x = (node.x + 0.5) / leaf_total * band_h + cfg.cell_size;
        node.y = if root_height > 0.0 {
            (1.0 - heights[i] / root_height) * band_w
        } else {
            0.0
        };
    }

    let mut leaf_order = Vec::new();
    for node in &nodes {
        if node.is_leaf() {
            if let Some(id) = node.taxid {
                leaf_order.push(id);
            }
        }
    }
    DendrogramLayout { nodes, leaf_order }
}

fn flatten(node: &DendrogramNode, parent: Option<usize>, nodes: &mut Vec<LayoutNode>) -> usize {
    let idx = nodes.len();
    nodes.push(LayoutNode {
        taxid: node.taxid,
        parent,
        children: Vec::new(),
        x: 0.0,
        y: 0.0,
    });
    for child in &node.children {
        let c = flatten(child, Some(idx), nodes);
        nodes[idx].children.push(c);
    }
    idx
}

/// Post-order pass: leaves take consecutive slots, joins sit midway between
/// their first and last child, at a clustering height of one above the
/// tallest child.
fn first_pass(nodes: &mut [LayoutNode], heights: &mut [f32], idx: usize, next_slot: &mut f32) {
    let children = nodes[idx].children.clone();
    if children.is_empty() {
        nodes[idx].x = *next_slot;
        *next_slot += 1.0;
        heights[idx] = 0.0;
        return;
    }
    let mut hmax = 0.0f32;
    for &c in &children {
        first_pass(nodes, heights, c, next_slot);
        hmax = hmax.max(heights[c]);
    }
    let first = children[0];
    let last = children[children.len() - 1];
    nodes[idx].x = (nodes[first].x + nodes[last].x) / 2.0;
    heights[idx] = hmax + 1.0;
}

// ────────────────────────────────────────────────────────────────────────────
// Matrix grid
// ────────────────────────────────────────────────────────────────────────────

/// One heatmap cell, flattened from the matrix for rendering and hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRecord {
    /// Zero-based row index into the payload's row sequences.
    pub row: usize,
    /// Zero-based column index into the panel's column sequences.
    pub col: usize,
    pub value: f64,
    /// Left edge of the cell rectangle.
    pub x: f32,
    /// Top edge of the cell rectangle.
    pub y: f32,
}

/// Flatten a co-occurrence matrix into cell records on a 1-based grid of
/// `cell_size` squares, offset horizontally by the cluster-space band.
/// A matrix with zero rows produces an empty layout.
pub fn layout_matrix(matrix: &[Vec<f64>], cfg: &LayoutConfig) -> Vec<CellRecord> {
    let mut out = Vec::new();
    for (r, row) in matrix.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            out.push(CellRecord {
                row: r,
                col: c,
                value,
                x: (c + 1) as f32 * cfg.cell_size + cfg.cluster_space,
                y: (r + 1) as f32 * cfg.cell_size,
            });
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Label measurement & elbow connectors
// ────────────────────────────────────────────────────────────────────────────

/// Text measurement abstraction so positions can be computed without a
/// rendering backend (font metrics in the GUI, fixed widths in tests).
pub trait Measurer {
    /// Return the size of the rendered text (width, height) in layout units.
    fn measure(&self, text: &str) -> (f32, f32);
}

/// Fixed-advance measurer for monospace estimates (CLI output and tests).
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMeasurer {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for CharWidthMeasurer {
    fn default() -> Self {
        Self {
            char_width: 7.5,
            line_height: 12.0,
        }
    }
}

impl Measurer for CharWidthMeasurer {
    fn measure(&self, text: &str) -> (f32, f32) {
        (
            text.chars().count() as f32 * self.char_width,
            self.line_height,
        )
    }
}

/// Pre-computed row label widths, keyed by taxon id.
#[derive(Debug, Clone, Default)]
pub struct LabelMetrics {
    widths: IndexMap<u32, f32>,
}

impl LabelMetrics {
    pub fn width(&self, taxid: u32) -> Option<f32> {
        self.widths.get(&taxid).copied()
    }
}

/// Measure the display form of every row label up front.
///
/// `row_ids` and `row_labels` are the payload's parallel row sequences.
pub fn measure_row_labels(
    row_ids: &[u32],
    row_labels: &[String],
    measurer: &dyn Measurer,
) -> LabelMetrics {
    let mut widths = IndexMap::with_capacity(row_ids.len());
    for (id, name) in row_ids.iter().zip(row_labels) {
        let (w, _h) = measurer.measure(&display_label(name));
        widths.insert(*id, w);
    }
    LabelMetrics { widths }
}

/// Right-angle connector between a parent and child dendrogram node.
///
/// Mirrors the SVG path `M<h0>,<v0> V<v1> H<h1>`: move to the parent, draw a
/// vertical segment to the child's level, then a horizontal segment to the
/// child (or to the row label's right edge for leaves).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElbowPath {
    /// Parent horizontal position.
    pub h0: f32,
    /// Parent vertical position.
    pub v0: f32,
    /// Child vertical level.
    pub v1: f32,
    /// End of the horizontal segment.
    pub h1: f32,
}

impl ElbowPath {
    pub fn to_svg(&self) -> String {
        format!("M{},{} V{} H{}", self.h0, self.v0, self.v1, self.h1)
    }
}

/// The basic connector between two laid-out nodes, without leaf extension.
pub fn elbow_between(parent: &LayoutNode, child: &LayoutNode) -> ElbowPath {
    ElbowPath {
        h0: parent.y,
        v0: parent.x,
        v1: child.x,
        h1: child.y,
    }
}

/// Compute the connector for every parent/child link in the layout.
///
/// Leaf connectors extend to the right edge of the leaf's row label. A leaf
/// whose taxon id has no measured label indicates a dendrogram/row-id
/// mismatch and is an error — silently skipping it would draw a wrong tree.
pub fn elbow_paths(layout: &DendrogramLayout, labels: &LabelMetrics) -> Result<Vec<ElbowPath>> {
    let mut out = Vec::new();
    for (p, c) in layout.links() {
        let parent = &layout.nodes[p];
        let child = &layout.nodes[c];
        let mut elbow = elbow_between(parent, child);
        if child.is_leaf() {
            match child.taxid.and_then(|id| labels.width(id)) {
                Some(width) => elbow.h1 = child.y + LABEL_GAP + width,
                None => bail!(
                    "No measured row label for dendrogram leaf {:?}; \
                     leaf ids and row ids are out of sync",
                    child.taxid
                ),
            }
        }
        out.push(elbow);
    }
    Ok(out)
}
