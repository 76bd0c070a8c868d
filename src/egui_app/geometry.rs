#![cfg(feature = "egui")]

use eframe::egui::{Pos2, Rect, Vec2};

use crate::layout::{CellRecord, LABEL_GAP, LayoutConfig, LayoutNode};

/// The model-space rectangle of one heatmap cell.
pub fn cell_rect(cell: &CellRecord, cfg: &LayoutConfig) -> Rect {
    Rect::from_min_size(
        Pos2::new(cell.x, cell.y),
        Vec2::splat(cfg.cell_size),
    )
}

/// Hit-test a model-space point against the matrix grid.
///
/// Inverts the 1-based grid arithmetic of the cell layout; returns the
/// zero-based (row, col) of the cell under `p`, if any.
pub fn cell_at(p: Pos2, cfg: &LayoutConfig, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let col = ((p.x - cfg.cluster_space) / cfg.cell_size).floor() as i64 - 1;
    let row = (p.y / cfg.cell_size).floor() as i64 - 1;
    if row < 0 || col < 0 {
        return None;
    }
    let (row, col) = (row as usize, col as usize);
    if row < rows && col < cols {
        Some((row, col))
    } else {
        None
    }
}

/// Model-space anchor (left edge, vertical center) of a leaf's row label.
pub fn row_label_anchor(leaf: &LayoutNode) -> Pos2 {
    Pos2::new(leaf.y + LABEL_GAP, leaf.x)
}

/// Model-space anchor (bottom of the rotated text) of a column label,
/// centered over its matrix column.
pub fn col_label_anchor(col: usize, cfg: &LayoutConfig) -> Pos2 {
    Pos2::new(
        (col + 1) as f32 * cfg.cell_size + cfg.cluster_space + cfg.cell_size * 0.5,
        cfg.cell_size * 0.75,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_matrix;

    #[test]
    fn test_cell_at_inverts_the_grid() {
        let cfg = LayoutConfig::default();
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        for cell in layout_matrix(&matrix, &cfg) {
            let center = cell_rect(&cell, &cfg).center();
            assert_eq!(cell_at(center, &cfg, 3, 2), Some((cell.row, cell.col)));
        }
    }

    #[test]
    fn test_cell_at_rejects_out_of_grid_points() {
        let cfg = LayoutConfig::default();
        // Inside the cluster-space band, above the grid, right of the grid
        assert_eq!(cell_at(Pos2::new(10.0, 30.0), &cfg, 3, 2), None);
        assert_eq!(cell_at(Pos2::new(170.0, 3.0), &cfg, 3, 2), None);
        assert_eq!(cell_at(Pos2::new(500.0, 30.0), &cfg, 3, 2), None);
    }
}
