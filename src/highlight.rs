//! Cross-highlighting state for the heatmap and dendrogram.
//!
//! Two independent layers:
//! - **Pinned** rows: a click-toggled, persistent highlight per taxon id.
//!   Multiple taxa can be pinned at once; toggling one never affects another.
//! - **Hover**: a transient row/column cross-highlight plus tooltip target,
//!   active only while the pointer stays over an element.

/// The element currently under the pointer, in payload index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    /// A row label (zero-based row index).
    RowLabel(usize),
    /// A column label (zero-based column index).
    ColLabel(usize),
    /// A matrix cell.
    Cell { row: usize, col: usize },
    /// A dendrogram branch (arena index of the link's parent node).
    Branch(usize),
}

/// Tracks pinned rows and the current hover target.
#[derive(Debug, Clone, Default)]
pub struct HighlightBoard {
    /// Taxon ids whose rows are currently pinned.
    pinned: Vec<u32>,
    hover: Option<HoverTarget>,
}

impl HighlightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the pinned state for one taxon id; returns the new state.
    /// Exactly one state flip per call.
    pub fn toggle_pin(&mut self, taxid: u32) -> bool {
        if let Some(pos) = self.pinned.iter().position(|&id| id == taxid) {
            self.pinned.remove(pos);
            false
        } else {
            self.pinned.push(taxid);
            true
        }
    }

    pub fn is_pinned(&self, taxid: u32) -> bool {
        self.pinned.contains(&taxid)
    }

    pub fn pinned_ids(&self) -> &[u32] {
        &self.pinned
    }

    pub fn pin_count(&self) -> usize {
        self.pinned.len()
    }

    /// Drop all pins (explicit user action or full re-render).
    pub fn clear_pins(&mut self) {
        self.pinned.clear();
    }

    pub fn set_hover(&mut self, target: HoverTarget) {
        self.hover = Some(target);
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    /// True if the hover target touches the given row (label, cell, or the
    /// row label itself).
    pub fn row_is_hot(&self, row: usize) -> bool {
        match self.hover {
            Some(HoverTarget::RowLabel(r)) => r == row,
            Some(HoverTarget::Cell { row: r, .. }) => r == row,
            _ => false,
        }
    }

    /// True if the hover target touches the given column.
    pub fn col_is_hot(&self, col: usize) -> bool {
        match self.hover {
            Some(HoverTarget::ColLabel(c)) => c == col,
            Some(HoverTarget::Cell { col: c, .. }) => c == col,
            _ => false,
        }
    }
}
