use phyloscope::parser::{
    ServiceResponse, determine_panel_count, parse_catalog, parse_catalog_entry, parse_payload,
    parse_response, parse_tree,
};

/// A two-panel comparison: matrix_1 is 3×2, matrix_2 is 3×4, rows shared.
fn two_panel_response() -> &'static str {
    r#"{
        "matrix_1": [[-1, 80], [50, 0], [20, 100]],
        "colJSON_1": ["Phylome A", "Phylome B"],
        "colIDJSON_1": [1, 2],
        "matrix_2": [[10, 20, 30, 40], [0, 0, 0, 0], [-1, 5, 15, 25]],
        "colJSON_2": ["Phylome C", "Phylome D", "Phylome E", "Phylome F"],
        "colIDJSON_2": [3, 4, 5, 6],
        "rowLabelJSON": ["Homo sapiens", "Mus musculus", "Rattus norvegicus"],
        "rowLabelIDJSON": [9606, 10090, 10116],
        "dendrogram_tree": {
            "name": ["node"],
            "children": [
                {"name": ["node"], "children": [
                    {"name": [9606], "children": []},
                    {"name": [10090], "children": []}
                ]},
                {"name": [10116], "children": []}
            ]
        }
    }"#
}

#[test]
fn parse_two_panel_payload() {
    let value: serde_json::Value = serde_json::from_str(two_panel_response()).unwrap();
    assert_eq!(determine_panel_count(&value), 2);

    let payload = parse_payload(&value).expect("valid payload");
    assert_eq!(payload.panels.len(), 2);
    assert_eq!(payload.panels[0].row_count(), 3);
    assert_eq!(payload.panels[0].col_count(), 2);
    assert_eq!(payload.panels[1].col_count(), 4);
    assert_eq!(payload.panels[0].matrix[0][1], 80.0);
    assert_eq!(payload.panels[0].col_labels[1], "Phylome B");
    assert_eq!(payload.panels[1].col_ids, vec![3, 4, 5, 6]);
    assert_eq!(payload.row_ids, vec![9606, 10090, 10116]);
    assert_eq!(payload.tree.leaf_ids(), vec![9606, 10090, 10116]);
    assert_eq!(payload.row_label(10090), Some("Mus musculus"));

    // The id-to-row map preserves payload row order
    let index = payload.row_index_by_id();
    assert_eq!(index.get(&9606), Some(&0));
    assert_eq!(index.get(&10116), Some(&2));
    assert_eq!(index.get(&42), None);
}

#[test]
fn error_response_is_surfaced_verbatim() {
    let resp = parse_response(r#"{"error": "no phylomes found for taxid 42"}"#).unwrap();
    assert_eq!(
        resp,
        ServiceResponse::Error("no phylomes found for taxid 42".to_string())
    );
}

#[test]
fn payload_response_round_trips_through_parse_response() {
    let resp = parse_response(two_panel_response()).unwrap();
    match resp {
        ServiceResponse::Payload(p) => assert_eq!(p.panels.len(), 2),
        ServiceResponse::Error(msg) => panic!("unexpected error: {}", msg),
    }
}

#[test]
fn non_contiguous_panel_indices_fail() {
    let raw = r#"{
        "matrix_1": [[1]],
        "colJSON_1": ["A"], "colIDJSON_1": [1],
        "matrix_3": [[2]],
        "colJSON_3": ["B"], "colIDJSON_3": [2],
        "rowLabelJSON": ["X"], "rowLabelIDJSON": [7],
        "dendrogram_tree": {"name": [7], "children": []}
    }"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    // Two matrix_ keys but no matrix_2
    assert_eq!(determine_panel_count(&value), 2);
    assert!(parse_payload(&value).is_err());
}

#[test]
fn dendrogram_leaf_missing_from_rows_fails() {
    let raw = r#"{
        "matrix_1": [[1]],
        "colJSON_1": ["A"], "colIDJSON_1": [1],
        "rowLabelJSON": ["X"], "rowLabelIDJSON": [7],
        "dendrogram_tree": {"name": [999], "children": []}
    }"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    let err = parse_payload(&value).unwrap_err();
    assert!(err.to_string().contains("999"), "got: {:#}", err);
}

#[test]
fn ragged_matrix_row_fails() {
    let raw = r#"{
        "matrix_1": [[1, 2], [3]],
        "colJSON_1": ["A", "B"], "colIDJSON_1": [1, 2],
        "rowLabelJSON": ["X", "Y"], "rowLabelIDJSON": [7, 8],
        "dendrogram_tree": {"name": ["node"], "children": [
            {"name": [7], "children": []},
            {"name": [8], "children": []}
        ]}
    }"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert!(parse_payload(&value).is_err());
}

#[test]
fn duplicate_row_id_fails() {
    let raw = r#"{
        "matrix_1": [[1], [2]],
        "colJSON_1": ["A"], "colIDJSON_1": [1],
        "rowLabelJSON": ["X", "Y"], "rowLabelIDJSON": [7, 7],
        "dendrogram_tree": {"name": [7], "children": []}
    }"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert!(parse_payload(&value).is_err());
}

#[test]
fn parse_tree_leaf_and_join_shapes() {
    let leaf: serde_json::Value = serde_json::from_str(r#"{"name": [9606], "children": []}"#).unwrap();
    let node = parse_tree(&leaf).unwrap();
    assert!(node.is_leaf());
    assert_eq!(node.taxid, Some(9606));

    let join: serde_json::Value = serde_json::from_str(
        r#"{"name": ["node"], "children": [{"name": [1], "children": []}, {"name": [2], "children": []}]}"#,
    )
    .unwrap();
    let node = parse_tree(&join).unwrap();
    assert_eq!(node.taxid, None);
    assert_eq!(node.leaf_count(), 2);
    assert_eq!(node.first_leaf(), Some(1));
}

#[test]
fn catalog_entry_format() {
    let entry = parse_catalog_entry("Homo sapiens -> [9606]").expect("well-formed entry");
    assert_eq!(entry.label, "Homo sapiens");
    assert_eq!(entry.taxid, 9606);
    assert_eq!(entry.raw, "Homo sapiens -> [9606]");
}

#[test]
fn catalog_skips_malformed_lines() {
    let lines = vec![
        "Homo sapiens -> [9606]".to_string(),
        "no arrow here".to_string(),
        "Mus musculus -> [not a number]".to_string(),
        "Rattus norvegicus -> [10116]".to_string(),
    ];
    let catalog = parse_catalog(&lines);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].taxid, 9606);
    assert_eq!(catalog[1].taxid, 10116);
}
