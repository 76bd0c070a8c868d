//! Phylome co-occurrence heatmap explorer.
//!
//! This crate parses comparison payloads from the phylo-explorer data service
//! into strongly-typed structures, computes the clustered heatmap and
//! dendrogram layout, and drives the interactive highlight/filter state.
//!
//! The binary `phyloscope` loads a payload and prints a layout summary as JSON.

pub mod client;
pub mod color;
pub mod filter;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod parser;

// Optional GUI/egui functionality lives behind the `egui` feature flag.
// This module provides the interactive heatmap viewer with cross-highlighting,
// tooltips and the refinement filter bar.
#[cfg(feature = "egui")]
pub mod egui_app;
