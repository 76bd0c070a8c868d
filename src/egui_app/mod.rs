//! Egui-based interactive viewer for phylome comparison heatmaps
//! (feature = "egui").
//!
//! The viewer is split into submodules: app state, screen geometry, painting
//! helpers, tooltip/label text and the per-frame UI pass.

#![cfg(feature = "egui")]

mod geometry;
mod render;
mod state;
mod text;
mod ui;

pub use geometry::{cell_at, cell_rect, col_label_anchor, row_label_anchor};
pub use render::{cell_fill, color32_from_hex, draw_elbow, draw_legend};
pub use state::ExplorerApp;
pub use text::{branch_tooltip, cell_tooltip, col_tooltip, highlight_query_job, row_tooltip};
