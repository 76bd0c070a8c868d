#![cfg(feature = "egui")]

use eframe::egui::{self, Color32};
use egui::text::LayoutJob;

/// Tooltip for a hovered row label: species name plus taxonomy id.
pub fn row_tooltip(species: &str, taxid: u32) -> String {
    format!("{} [taxid {}]", species, taxid)
}

/// Tooltip for a hovered column label: phylome name plus id.
pub fn col_tooltip(phylome: &str, id: u32) -> String {
    format!("{} [phylome {}]", phylome, id)
}

/// Tooltip for a hovered cell, derived from the value sign/magnitude rules:
/// negative = seed sentinel, zero = absent, positive = percentage.
pub fn cell_tooltip(species: &str, phylome: &str, value: f64) -> String {
    let presence = if value < 0.0 {
        "This is the phylome seed".to_string()
    } else if value == 0.0 {
        "Not present in any of the trees".to_string()
    } else {
        format!("Present in {}% of all trees", value)
    };
    format!("{}\n{}\n{}", species, phylome, presence)
}

/// Tooltip for a hovered dendrogram branch, describing the clustering join
/// by the first species it leads to.
pub fn branch_tooltip(first_species: &str) -> String {
    format!("Cluster starting at {}", first_species)
}

/// Case-insensitive highlighter that builds a LayoutJob for `text`,
/// highlighting occurrences of `query`. Used for the suggestion dropdown.
pub fn highlight_query_job(text: &str, query: &str) -> LayoutJob {
    let mut job = LayoutJob::default();
    let tl = text.to_lowercase();
    let ql = query.trim().to_lowercase();
    if ql.is_empty() {
        job.append(text, 0.0, egui::TextFormat::default());
        return job;
    }
    let mut i = 0;
    while let Some(pos) = tl[i..].find(&ql) {
        let start = i + pos;
        if start > i {
            job.append(&text[i..start], 0.0, egui::TextFormat::default());
        }
        let end = start + ql.len();
        let mut fmt = egui::TextFormat::default();
        fmt.background = Color32::YELLOW.into();
        job.append(&text[start..end], 0.0, fmt);
        i = end;
    }
    if i < text.len() {
        job.append(&text[i..], 0.0, egui::TextFormat::default());
    }
    job
}
