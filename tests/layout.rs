use phyloscope::layout::{
    CharWidthMeasurer, LABEL_GAP, LayoutConfig, elbow_paths, layout_dendrogram, layout_matrix,
    measure_row_labels,
};
use phyloscope::model::DendrogramNode;

fn three_leaf_tree() -> DendrogramNode {
    DendrogramNode::join(vec![
        DendrogramNode::join(vec![DendrogramNode::leaf(101), DendrogramNode::leaf(102)]),
        DendrogramNode::leaf(103),
    ])
}

#[test]
fn leaves_are_ordered_and_evenly_spaced() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);

    // Depth-first, left-to-right leaf order, top to bottom
    assert_eq!(layout.leaf_order, vec![101, 102, 103]);

    let leaf_xs: Vec<f32> = layout
        .nodes
        .iter()
        .filter(|n| n.is_leaf())
        .map(|n| n.x)
        .collect();
    assert_eq!(leaf_xs.len(), 3);
    // Uniform slots over the tree band: one cell of spacing, no gaps
    assert!((leaf_xs[1] - leaf_xs[0] - cfg.cell_size).abs() < 1e-4);
    assert!((leaf_xs[2] - leaf_xs[1] - cfg.cell_size).abs() < 1e-4);
    // First leaf centered in its slot, one cell into the band
    assert!((leaf_xs[0] - cfg.cell_size * 1.5).abs() < 1e-4);

    // All leaves align on the right edge of the band, root on the left
    for node in layout.nodes.iter().filter(|n| n.is_leaf()) {
        assert!((node.y - cfg.tree_width()).abs() < 1e-4);
    }
    assert_eq!(layout.nodes[0].y, 0.0);
}

#[test]
fn join_sits_between_first_and_last_child() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);

    // Arena order: root, inner join, 101, 102, 103
    let inner = &layout.nodes[1];
    assert!((inner.x - (layout.nodes[2].x + layout.nodes[3].x) / 2.0).abs() < 1e-4);
    let root = &layout.nodes[0];
    assert!((root.x - (inner.x + layout.nodes[4].x) / 2.0).abs() < 1e-4);
    // Inner join halfway between root and the leaf level
    assert!((inner.y - cfg.tree_width() * 0.5).abs() < 1e-4);
}

#[test]
fn empty_tree_produces_empty_layout() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&DendrogramNode::join(Vec::new()), 0, &cfg);
    assert!(layout.is_empty());
    assert!(layout.leaf_order.is_empty());
    assert!(layout.links().is_empty());
}

#[test]
fn matrix_layout_covers_every_cell_once() {
    let cfg = LayoutConfig::default();
    let matrix = vec![vec![-1.0, 80.0], vec![50.0, 0.0], vec![20.0, 100.0]];
    let cells = layout_matrix(&matrix, &cfg);

    assert_eq!(cells.len(), 6);
    for cell in &cells {
        assert!(cell.row < 3);
        assert!(cell.col < 2);
        // 1-based grid offset by the cluster-space band
        assert_eq!(
            cell.x,
            (cell.col + 1) as f32 * cfg.cell_size + cfg.cluster_space
        );
        assert_eq!(cell.y, (cell.row + 1) as f32 * cfg.cell_size);
    }
    // No duplicates
    let mut seen: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.col)).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 6);
}

#[test]
fn empty_matrix_produces_no_cells() {
    let cfg = LayoutConfig::default();
    assert!(layout_matrix(&[], &cfg).is_empty());
}

#[test]
fn leaf_elbows_extend_to_label_edge() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);

    let row_ids = vec![101, 102, 103];
    let row_labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let measurer = CharWidthMeasurer {
        char_width: 10.0,
        line_height: 12.0,
    };
    let labels = measure_row_labels(&row_ids, &row_labels, &measurer);

    let elbows = elbow_paths(&layout, &labels).expect("all labels measured");
    assert_eq!(elbows.len(), layout.links().len());

    // Every leaf connector reaches one character past the label gap
    let expected = cfg.tree_width() + LABEL_GAP + 10.0;
    for (link, elbow) in layout.links().iter().zip(&elbows) {
        let child = &layout.nodes[link.1];
        if child.is_leaf() {
            assert!((elbow.h1 - expected).abs() < 1e-4);
            // Horizontal run sits at the child's level, vertical at the parent's
            assert_eq!(elbow.v1, child.x);
            assert_eq!(elbow.h0, layout.nodes[link.0].y);
        } else {
            assert_eq!(elbow.h1, child.y);
        }
    }
}

#[test]
fn missing_row_label_is_a_layout_error() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);

    // 103 deliberately left unmeasured
    let row_ids = vec![101, 102];
    let row_labels = vec!["A".to_string(), "B".to_string()];
    let labels = measure_row_labels(&row_ids, &row_labels, &CharWidthMeasurer::default());

    let err = elbow_paths(&layout, &labels).unwrap_err();
    assert!(err.to_string().contains("103"), "got: {:#}", err);
}

#[test]
fn elbow_svg_form() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);
    let row_ids = vec![101, 102, 103];
    let row_labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let labels = measure_row_labels(
        &row_ids,
        &row_labels,
        &CharWidthMeasurer {
            char_width: 10.0,
            line_height: 12.0,
        },
    );
    let elbows = elbow_paths(&layout, &labels).unwrap();
    // Root to inner join: vertical run then horizontal run
    assert_eq!(elbows[0].to_svg(), "M0,33 V24 H112.5");
}

#[test]
fn tree_rows_align_with_matrix_rows() {
    let cfg = LayoutConfig::default();
    let layout = layout_dendrogram(&three_leaf_tree(), 3, &cfg);
    let matrix = vec![vec![1.0], vec![2.0], vec![3.0]];
    let cells = layout_matrix(&matrix, &cfg);

    // Leaf r and matrix row r share one vertical center in model space, so
    // the tree, the row labels and the grid can be drawn through a single
    // transform.
    for (r, id) in layout.leaf_order.iter().enumerate() {
        let leaf = &layout.nodes[layout.leaf_index(*id).expect("leaf present")];
        let cell = cells.iter().find(|c| c.row == r).expect("row has a cell");
        let cell_center = cell.y + cfg.cell_size * 0.5;
        assert!(
            (leaf.x - cell_center).abs() < 1e-4,
            "row {}: leaf center {} vs cell row center {}",
            r,
            leaf.x,
            cell_center
        );
    }
}
