use phyloscope::model::{ComparisonPayload, DendrogramNode, PanelData, PanelSet};

fn two_panel_payload() -> ComparisonPayload {
    ComparisonPayload {
        panels: vec![
            PanelData {
                matrix: vec![vec![-1.0, 80.0], vec![50.0, 0.0], vec![20.0, 100.0]],
                col_labels: vec!["Phylome A".to_string(), "Phylome B".to_string()],
                col_ids: vec![1, 2],
            },
            PanelData {
                matrix: vec![
                    vec![10.0, 20.0, 30.0, 40.0],
                    vec![0.0, 0.0, 0.0, 0.0],
                    vec![-1.0, 5.0, 15.0, 25.0],
                ],
                col_labels: vec![
                    "Phylome C".to_string(),
                    "Phylome D".to_string(),
                    "Phylome E".to_string(),
                    "Phylome F".to_string(),
                ],
                col_ids: vec![3, 4, 5, 6],
            },
        ],
        row_labels: vec![
            "Homo sapiens".to_string(),
            "Mus musculus".to_string(),
            "Rattus norvegicus".to_string(),
        ],
        row_ids: vec![9606, 10090, 10116],
        tree: DendrogramNode::join(vec![
            DendrogramNode::join(vec![
                DendrogramNode::leaf(9606),
                DendrogramNode::leaf(10090),
            ]),
            DendrogramNode::leaf(10116),
        ]),
    }
}

#[test]
fn first_panel_visible_by_default() {
    let payload = two_panel_payload();
    payload.validate().expect("fixture is well-formed");

    let panels = PanelSet::for_payload(&payload);
    assert_eq!(panels.len(), 2);
    assert_eq!(panels.visible(), Some(1));
    assert!(!panels.slots()[0].hidden);
    assert!(panels.slots()[1].hidden);
}

#[test]
fn provisioned_slots_start_hidden() {
    let panels = PanelSet::provision(3);
    assert_eq!(panels.len(), 3);
    assert_eq!(panels.visible(), None);
    let indices: Vec<u32> = panels.slots().iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn activation_shows_exactly_one_panel() {
    let mut panels = PanelSet::provision(3);
    panels.activate(2);
    assert_eq!(panels.visible(), Some(2));
    assert_eq!(panels.slots().iter().filter(|s| !s.hidden).count(), 1);

    panels.activate(3);
    assert_eq!(panels.visible(), Some(3));
    assert!(panels.slots()[1].hidden);
}

#[test]
fn zero_matrices_yield_an_empty_set() {
    let mut payload = two_panel_payload();
    payload.panels.clear();
    let panels = PanelSet::for_payload(&payload);
    assert!(panels.is_empty());
    assert_eq!(panels.visible(), None);
}
