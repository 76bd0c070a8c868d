use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// PayloadDoc – binary serialization wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadDoc {
    pub payload: ComparisonPayload,
}

impl PayloadDoc {
    /// Save the PayloadDoc to a binary file with magic bytes and versioning.
    pub fn save_to_binary<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        std::io::Write::write_all(&mut writer, b"PHYLOSCOPE")?;
        std::io::Write::write_all(&mut writer, &1u32.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Load a PayloadDoc from a binary file, checking magic bytes and version.
    pub fn load_from_binary<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut magic = [0u8; 10];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if &magic != b"PHYLOSCOPE" {
            anyhow::bail!("Invalid magic bytes: expected 'PHYLOSCOPE'");
        }
        let mut version_bytes = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != 1 {
            anyhow::bail!("Unsupported version: {}", version);
        }
        let doc: PayloadDoc =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(doc)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DendrogramNode
// ────────────────────────────────────────────────────────────────────────────

/// One node of the hierarchical clustering dendrogram.
///
/// Leaves carry the taxon id of a heatmap row; internal nodes represent
/// clustering joins and carry no payload beyond their children. On the wire a
/// leaf is `{"name": [<taxid>]}` and an internal node is `{"name": ["node"]}`;
/// see [`crate::parser::parse_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DendrogramNode {
    /// Taxon id of the row this leaf stands for; `None` for internal joins.
    pub taxid: Option<u32>,
    #[serde(default)]
    pub children: Vec<DendrogramNode>,
}

impl DendrogramNode {
    pub fn leaf(taxid: u32) -> Self {
        Self {
            taxid: Some(taxid),
            children: Vec::new(),
        }
    }

    pub fn join(children: Vec<DendrogramNode>) -> Self {
        Self {
            taxid: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// All leaf taxon ids in depth-first, left-to-right order.
    pub fn leaf_ids(&self) -> Vec<u32> {
        let mut out = Vec::new();
        self.collect_leaf_ids(&mut out);
        out
    }

    fn collect_leaf_ids(&self, out: &mut Vec<u32>) {
        if self.children.is_empty() {
            if let Some(id) = self.taxid {
                out.push(id);
            }
        } else {
            for c in &self.children {
                c.collect_leaf_ids(out);
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            usize::from(self.taxid.is_some())
        } else {
            self.children.iter().map(|c| c.leaf_count()).sum()
        }
    }

    /// Taxon id of the leftmost leaf beneath this node.
    ///
    /// Used for branch tooltips: a clustering join is described by the first
    /// species it leads to.
    pub fn first_leaf(&self) -> Option<u32> {
        match self.children.first() {
            Some(c) => c.first_leaf(),
            None => self.taxid,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ComparisonPayload
// ────────────────────────────────────────────────────────────────────────────

/// Column data for one heatmap panel: a rows × columns co-occurrence matrix
/// plus parallel column label/id sequences.
///
/// Matrix value semantics: positive = co-occurrence percentage (0–100),
/// zero = the species is absent from the phylome, negative = sentinel marking
/// the phylome's seed species (not a real percentage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelData {
    pub matrix: Vec<Vec<f64>>,
    pub col_labels: Vec<String>,
    pub col_ids: Vec<u32>,
}

impl PanelData {
    pub fn row_count(&self) -> usize {
        self.matrix.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_ids.len()
    }
}

/// A full comparison result as served by the phylo-explorer data service,
/// already fanned out into an ordered collection of per-panel records.
///
/// Row labels/ids and the dendrogram are shared across all panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPayload {
    pub panels: Vec<PanelData>,
    pub row_labels: Vec<String>,
    pub row_ids: Vec<u32>,
    pub tree: DendrogramNode,
}

impl ComparisonPayload {
    /// Check the structural invariants of the payload.
    ///
    /// A violation here means the server response is malformed; rendering it
    /// would produce a visually wrong tree, so the caller must fail loudly
    /// rather than skip rows.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.row_labels.len() != self.row_ids.len() {
            anyhow::bail!(
                "Row label/id length mismatch: {} labels vs {} ids",
                self.row_labels.len(),
                self.row_ids.len()
            );
        }
        let mut seen = std::collections::BTreeSet::new();
        for id in &self.row_ids {
            if !seen.insert(*id) {
                anyhow::bail!("Duplicate row taxon id {}", id);
            }
        }
        for (i, panel) in self.panels.iter().enumerate() {
            let n = i + 1;
            if panel.col_labels.len() != panel.col_ids.len() {
                anyhow::bail!(
                    "Panel {}: column label/id length mismatch: {} labels vs {} ids",
                    n,
                    panel.col_labels.len(),
                    panel.col_ids.len()
                );
            }
            if panel.matrix.len() != self.row_ids.len() {
                anyhow::bail!(
                    "Panel {}: matrix has {} rows but payload has {} row ids",
                    n,
                    panel.matrix.len(),
                    self.row_ids.len()
                );
            }
            for (r, row) in panel.matrix.iter().enumerate() {
                if row.len() != panel.col_ids.len() {
                    anyhow::bail!(
                        "Panel {}: matrix row {} has {} values but panel has {} columns",
                        n,
                        r,
                        row.len(),
                        panel.col_ids.len()
                    );
                }
            }
            let mut col_seen = std::collections::BTreeSet::new();
            for id in &panel.col_ids {
                if !col_seen.insert(*id) {
                    anyhow::bail!("Panel {}: duplicate column phylome id {}", n, id);
                }
            }
        }
        for leaf in self.tree.leaf_ids() {
            if !self.row_ids.contains(&leaf) {
                anyhow::bail!("Dendrogram leaf taxon id {} is missing from row ids", leaf);
            }
        }
        Ok(())
    }

    /// Order-preserving taxon id → row index map.
    pub fn row_index_by_id(&self) -> IndexMap<u32, usize> {
        self.row_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect()
    }

    /// Full species name for a taxon id, if the row exists.
    pub fn row_label(&self, taxid: u32) -> Option<&str> {
        let idx = self.row_ids.iter().position(|id| *id == taxid)?;
        self.row_labels.get(idx).map(|s| s.as_str())
    }
}

/// Shorten a species name to its binomial form (first two words) for row
/// label rendering.
pub fn display_label(name: &str) -> String {
    name.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// PanelSet
// ────────────────────────────────────────────────────────────────────────────

/// One mounting slot for a heatmap panel, tagged with its 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSlot {
    pub index: u32,
    pub hidden: bool,
}

/// Mounting slots for the heatmap panels of one comparison result,
/// one per matrix. At most one slot is visible at a time.
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    slots: Vec<PanelSlot>,
}

impl PanelSet {
    /// Create `count` hidden slots with 1-based sequential indices.
    pub fn provision(count: usize) -> Self {
        let slots = (1..=count as u32)
            .map(|index| PanelSlot {
                index,
                hidden: true,
            })
            .collect();
        Self { slots }
    }

    /// Provision slots for a payload and show the first panel.
    ///
    /// A payload with zero matrices yields an empty set; downstream stages
    /// treat that as "nothing to render".
    pub fn for_payload(payload: &ComparisonPayload) -> Self {
        let mut set = Self::provision(payload.panels.len());
        set.select_default();
        set
    }

    /// Show panel 1 and hide all others. No-op for an empty set.
    pub fn select_default(&mut self) {
        self.activate(1);
    }

    /// Hide all panels, then show the one with the given 1-based index.
    pub fn activate(&mut self, index: u32) {
        for slot in &mut self.slots {
            slot.hidden = slot.index != index;
        }
    }

    /// The 1-based index of the currently visible panel, if any.
    pub fn visible(&self) -> Option<u32> {
        self.slots.iter().find(|s| !s.hidden).map(|s| s.index)
    }

    pub fn slots(&self) -> &[PanelSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
