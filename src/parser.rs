//! Phylo-explorer wire format parser.
//!
//! The data service delivers one comparison result as a flat JSON object with
//! an indexed key family: `matrix_<i>`, `colJSON_<i>`, `colIDJSON_<i>`
//! (1-based), plus the shared `dendrogram_tree`, `rowLabelJSON` and
//! `rowLabelIDJSON` fields. This module fans that shape into the ordered
//! [`ComparisonPayload`] structure so no other part of the crate has to
//! synthesize field names from an index.
//!
//! Error responses arrive as `{"error": "<message>"}` and are surfaced as
//! [`ServiceResponse::Error`] with the message verbatim.

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::model::{ComparisonPayload, DendrogramNode, PanelData};

/// Outcome of decoding a data-service response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    Payload(ComparisonPayload),
    /// Server-reported error message, passed through untranslated.
    Error(String),
}

/// Count the number of heatmap panels present in a raw response object
/// (keys matching the `matrix_` family).
pub fn determine_panel_count(value: &Value) -> usize {
    value
        .as_object()
        .map(|obj| obj.keys().filter(|k| k.starts_with("matrix_")).count())
        .unwrap_or(0)
}

/// Decode a full service response body: either a comparison payload or a
/// server-reported error.
pub fn parse_response(text: &str) -> Result<ServiceResponse> {
    let value: Value =
        serde_json::from_str(text).context("Failed to parse service response as JSON")?;
    if let Some(msg) = value.get("error").and_then(Value::as_str) {
        return Ok(ServiceResponse::Error(msg.to_string()));
    }
    Ok(ServiceResponse::Payload(parse_payload(&value)?))
}

/// Decode and validate a comparison payload from its raw JSON object.
pub fn parse_payload(value: &Value) -> Result<ComparisonPayload> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("Payload is not a JSON object"))?;

    let row_labels: Vec<String> = obj
        .get("rowLabelJSON")
        .map(string_array)
        .transpose()?
        .unwrap_or_default();
    let row_ids: Vec<u32> = obj
        .get("rowLabelIDJSON")
        .map(id_array)
        .transpose()?
        .unwrap_or_default();
    let tree = match obj.get("dendrogram_tree") {
        Some(v) => parse_tree(v).context("Failed to parse dendrogram_tree")?,
        None => DendrogramNode::join(Vec::new()),
    };

    let count = determine_panel_count(value);
    let mut panels = Vec::with_capacity(count);
    for i in 1..=count {
        let matrix_val = obj
            .get(&format!("matrix_{}", i))
            .ok_or_else(|| anyhow!("Missing matrix_{} (non-contiguous panel indices)", i))?;
        let matrix = value_matrix(matrix_val).with_context(|| format!("In matrix_{}", i))?;
        let col_labels = obj
            .get(&format!("colJSON_{}", i))
            .map(string_array)
            .transpose()?
            .ok_or_else(|| anyhow!("Missing colJSON_{}", i))?;
        let col_ids = obj
            .get(&format!("colIDJSON_{}", i))
            .map(id_array)
            .transpose()?
            .ok_or_else(|| anyhow!("Missing colIDJSON_{}", i))?;
        panels.push(PanelData {
            matrix,
            col_labels,
            col_ids,
        });
    }

    let payload = ComparisonPayload {
        panels,
        row_labels,
        row_ids,
        tree,
    };
    payload.validate()?;
    Ok(payload)
}

/// Parse one dendrogram tree node.
///
/// Wire shape: `{"name": [<taxid>], "children": [...]}` for leaves and
/// `{"name": ["node"], "children": [...]}` for clustering joins.
pub fn parse_tree(value: &Value) -> Result<DendrogramNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("Tree node is not a JSON object"))?;
    let name = obj
        .get("name")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Tree node has no 'name' array"))?;
    let taxid = match name.first() {
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| anyhow!("Tree leaf taxon id {} out of range", n))?,
        ),
        Some(Value::String(_)) | None => None,
        Some(other) => bail!("Unexpected tree node name entry: {}", other),
    };
    let mut children = Vec::new();
    if let Some(kids) = obj.get("children").and_then(Value::as_array) {
        for kid in kids {
            children.push(parse_tree(kid)?);
        }
    }
    Ok(DendrogramNode { taxid, children })
}

fn value_matrix(value: &Value) -> Result<Vec<Vec<f64>>> {
    let rows = value
        .as_array()
        .ok_or_else(|| anyhow!("Matrix is not an array"))?;
    let mut out = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| anyhow!("Matrix row {} is not an array", r))?;
        let mut vals = Vec::with_capacity(cells.len());
        for cell in cells {
            vals.push(
                cell.as_f64()
                    .ok_or_else(|| anyhow!("Non-numeric value in matrix row {}", r))?,
            );
        }
        out.push(vals);
    }
    Ok(out)
}

fn string_array(value: &Value) -> Result<Vec<String>> {
    let arr = value
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of strings"))?;
    arr.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Expected a string, got {}", v))
        })
        .collect()
}

fn id_array(value: &Value) -> Result<Vec<u32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of ids"))?;
    arr.iter()
        .map(|v| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| anyhow!("Expected a taxon/phylome id, got {}", v))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Filterable-taxon catalog
// ────────────────────────────────────────────────────────────────────────────

/// One entry of the filterable-taxon catalog, parsed from the service's
/// `"<display name> -> [<taxid>]"` string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display name (the part before `->`), trimmed.
    pub label: String,
    pub taxid: u32,
    /// The raw catalog string, kept for substring search.
    pub raw: String,
}

fn bracket_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^)]+)\]").expect("valid regex"))
}

/// Parse one catalog line. Returns `None` when the line does not match the
/// `"<name> -> [<taxid>]"` format.
pub fn parse_catalog_entry(raw: &str) -> Option<CatalogEntry> {
    let (label, _) = raw.split_once("->")?;
    let caps = bracket_id_pattern().captures(raw)?;
    let taxid: u32 = caps.get(1)?.as_str().trim().parse().ok()?;
    Some(CatalogEntry {
        label: label.trim().to_string(),
        taxid,
        raw: raw.to_string(),
    })
}

/// Parse the full catalog array, skipping malformed lines with a warning.
pub fn parse_catalog(lines: &[String]) -> Vec<CatalogEntry> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        match parse_catalog_entry(line) {
            Some(entry) => out.push(entry),
            None => eprintln!("[phyloscope] Warning: malformed catalog entry '{}'", line),
        }
    }
    out
}
