#![cfg(feature = "egui")]

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};

use crate::highlight::HoverTarget;
use crate::layout::{self, Measurer};
use crate::model::display_label;

use super::geometry::{cell_at, cell_rect, col_label_anchor, row_label_anchor};
use super::render::{cell_fill, draw_elbow, draw_legend};
use super::state::ExplorerApp;
use super::text::{branch_tooltip, cell_tooltip, col_tooltip, highlight_query_job, row_tooltip};

pub fn update(app: &mut ExplorerApp, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    egui::TopBottomPanel::top("top").show(ctx, |ui| top_bar(app, ui));
    egui::CentralPanel::default().show(ctx, |ui| canvas(app, ui));
}

fn top_bar(app: &mut ExplorerApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Panels:").strong());
        for slot in app.panels.slots().to_vec() {
            if ui
                .selectable_label(!slot.hidden, format!("Panel {}", slot.index))
                .clicked()
            {
                app.activate_panel(slot.index);
            }
        }
        ui.separator();
        if app.highlight.pin_count() > 0 {
            ui.label(format!("{} pinned", app.highlight.pin_count()));
            if ui.small_button("Clear pins").clicked() {
                app.highlight.clear_pins();
            }
        }
    });

    ui.horizontal(|ui| {
        let resp = ui.add(
            egui::TextEdit::singleline(&mut app.filter_query)
                .hint_text("Filter species by name…"),
        );
        if resp.changed() {
            app.update_suggestions();
        }
        if resp.has_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                app.suggestions.move_down();
            }
            if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                app.suggestions.move_up();
            }
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                app.suggestions.close();
            }
            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                app.choose_active_suggestion();
            }
        }
        // The submit control stays disabled while a submission is in flight.
        let can_submit = !app.selection.is_empty() && !app.history.in_flight();
        if ui
            .add_enabled(can_submit, egui::Button::new("Refine"))
            .clicked()
        {
            app.submit_filter();
        }
    });

    if app.suggestions.is_open() {
        let matches = app.suggestions.matches().to_vec();
        let active = app.suggestions.active_index();
        let query = app.filter_query.clone();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(160.0)
                .show(ui, |ui| {
                    for (i, entry) in matches.iter().enumerate() {
                        let job = highlight_query_job(&entry.raw, &query);
                        if ui.selectable_label(i == active, job).clicked() {
                            app.add_to_selection(entry.clone());
                        }
                    }
                });
        });
    }

    if !app.selection.is_empty() {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Selected:").strong());
            for entry in app.selection.entries().to_vec() {
                if ui.button(format!("✕ {}", entry.label)).clicked() {
                    app.selection.remove(entry.taxid);
                }
            }
        });
    }

    if let Some(msg) = app.error_banner.clone() {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::RED, &msg);
            if ui.small_button("Dismiss").clicked() {
                app.error_banner = None;
            }
        });
    }
}

/// Measures label text with the actual UI font so elbow connectors line up
/// with the rendered row labels.
struct PainterMeasurer<'a> {
    painter: &'a egui::Painter,
    font: FontId,
}

impl Measurer for PainterMeasurer<'_> {
    fn measure(&self, text: &str) -> (f32, f32) {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), self.font.clone(), Color32::BLACK);
        let s = galley.size();
        (s.x, s.y)
    }
}

fn canvas(app: &mut ExplorerApp, ui: &mut egui::Ui) {
    let Some(panel) = app.active_panel().cloned() else {
        ui.colored_label(Color32::YELLOW, "No panels to render");
        return;
    };
    // Owned snapshots for the drawing code, to avoid immutable borrows of `app`
    let payload = app.payload.clone();
    let cfg = app.cfg;

    let tree = layout::layout_dendrogram(&payload.tree, payload.row_ids.len(), &cfg);
    let cells = layout::layout_matrix(&panel.matrix, &cfg);

    let label_font = FontId::monospace(11.0);
    let labels = {
        let measurer = PainterMeasurer {
            painter: ui.painter(),
            font: label_font.clone(),
        };
        layout::measure_row_labels(&payload.row_ids, &payload.row_labels, &measurer)
    };
    let elbows = match layout::elbow_paths(&tree, &labels) {
        Ok(elbows) => elbows,
        Err(err) => {
            ui.colored_label(Color32::RED, format!("Layout error: {}", err));
            return;
        }
    };

    let avail = ui.available_rect_before_wrap();
    let canvas_resp = ui.interact(avail, ui.id().with("canvas"), Sense::drag());
    if canvas_resp.dragged() {
        app.pan += canvas_resp.drag_delta();
    }
    // Headroom above the grid for the rotated column labels
    let margin = 20.0;
    let headroom = 90.0;
    let origin = Pos2::new(avail.left() + margin, avail.top() + margin + headroom);
    let pan = app.pan;
    let to_screen =
        move |p: Pos2| -> Pos2 { Pos2::new(p.x + origin.x + pan.x, p.y + origin.y + pan.y) };

    // Hover is transient; rebuild it from this frame's pointer position.
    app.highlight.clear_hover();

    // Interaction pass. Branches go first so cells and labels win overlapping
    // hover resolution.
    let links = tree.links();
    for (i, (p, c)) in links.iter().enumerate() {
        let elbow = &elbows[i];
        let a = to_screen(Pos2::new(elbow.h0, elbow.v0));
        let b = to_screen(Pos2::new(elbow.h1, elbow.v1));
        let pad = 2.0;
        let hit = Rect::from_min_max(
            Pos2::new(a.x.min(b.x) - pad, a.y.min(b.y) - pad),
            Pos2::new(a.x.max(b.x) + pad, a.y.max(b.y) + pad),
        );
        let resp = ui.interact(hit, ui.id().with(("branch", i)), Sense::hover());
        if resp.hovered() {
            app.highlight.set_hover(HoverTarget::Branch(*p));
            if let Some(species) = tree
                .first_leaf(*c)
                .and_then(|id| payload.row_label(id))
            {
                resp.on_hover_text(branch_tooltip(species));
            }
        }
    }

    // One hit-test over the whole grid instead of a widget per cell.
    let rows = payload.row_ids.len();
    let cols = panel.col_count();
    let grid_min = to_screen(Pos2::new(cfg.cluster_space + cfg.cell_size, cfg.cell_size));
    let grid_rect = Rect::from_min_size(
        grid_min,
        Vec2::new(cols as f32 * cfg.cell_size, rows as f32 * cfg.cell_size),
    );
    let grid_resp = ui.interact(grid_rect, ui.id().with("grid"), Sense::click());
    if let Some(pos) = grid_resp.hover_pos() {
        let model = Pos2::new(pos.x - origin.x - pan.x, pos.y - origin.y - pan.y);
        if let Some((row, col)) = cell_at(model, &cfg, rows, cols) {
            if grid_resp.clicked() {
                app.highlight.toggle_pin(payload.row_ids[row]);
            }
            app.highlight.set_hover(HoverTarget::Cell { row, col });
            grid_resp.on_hover_text(cell_tooltip(
                &payload.row_labels[row],
                &panel.col_labels[col],
                panel.matrix[row][col],
            ));
        }
    }

    let row_index = payload.row_index_by_id();
    let leaf_rows: Vec<(usize, usize)> = tree
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_leaf())
        .filter_map(|(i, n)| {
            let taxid = n.taxid?;
            let row = row_index.get(&taxid).copied()?;
            Some((i, row))
        })
        .collect();
    for &(node_idx, row) in &leaf_rows {
        let leaf = &tree.nodes[node_idx];
        let taxid = payload.row_ids[row];
        let width = labels.width(taxid).unwrap_or(0.0);
        let anchor = to_screen(row_label_anchor(leaf));
        let rect = Rect::from_min_size(
            Pos2::new(anchor.x, anchor.y - cfg.cell_size * 0.5),
            Vec2::new(width, cfg.cell_size),
        );
        let resp = ui.interact(rect, ui.id().with(("row_label", row)), Sense::click());
        if resp.clicked() {
            app.highlight.toggle_pin(taxid);
        }
        if resp.hovered() {
            app.highlight.set_hover(HoverTarget::RowLabel(row));
            resp.on_hover_text(row_tooltip(&payload.row_labels[row], taxid));
        }
    }

    for (c, label) in panel.col_labels.iter().enumerate() {
        let anchor = to_screen(col_label_anchor(c, &cfg));
        let rect = Rect::from_min_max(
            Pos2::new(anchor.x - cfg.cell_size * 0.5, anchor.y - headroom),
            Pos2::new(anchor.x + cfg.cell_size * 0.5, anchor.y),
        );
        let resp = ui.interact(rect, ui.id().with(("col_label", c)), Sense::hover());
        if resp.hovered() {
            app.highlight.set_hover(HoverTarget::ColLabel(c));
            resp.on_hover_text(col_tooltip(label, panel.col_ids[c]));
        }
    }

    // Paint pass, now that this frame's hover target is known.
    let painter = ui.painter();
    let tree_stroke = Stroke::new(1.0, Color32::from_gray(90));
    let hot_branch = Stroke::new(2.0, Color32::from_rgb(220, 120, 20));
    for (i, (p, _c)) in links.iter().enumerate() {
        let stroke = if app.highlight.hover() == Some(HoverTarget::Branch(*p)) {
            hot_branch
        } else {
            tree_stroke
        };
        draw_elbow(painter, &elbows[i], &to_screen, stroke);
    }

    let pin_stroke = Stroke::new(1.5, Color32::from_rgb(220, 20, 60));
    let hot_stroke = Stroke::new(1.0, Color32::from_rgb(220, 120, 20));
    for cell in &cells {
        let model_rect = cell_rect(cell, &cfg);
        let rect = Rect::from_min_max(to_screen(model_rect.min), to_screen(model_rect.max));
        painter.rect_filled(rect, 0.0, cell_fill(cell.value));
        let pinned = app.highlight.is_pinned(payload.row_ids[cell.row]);
        let hot = app.highlight.row_is_hot(cell.row) || app.highlight.col_is_hot(cell.col);
        if pinned {
            painter.rect_stroke(rect, 0.0, pin_stroke, egui::StrokeKind::Inside);
        } else if hot {
            painter.rect_stroke(rect, 0.0, hot_stroke, egui::StrokeKind::Inside);
        }
    }

    for &(node_idx, row) in &leaf_rows {
        let leaf = &tree.nodes[node_idx];
        let taxid = payload.row_ids[row];
        let color = if app.highlight.is_pinned(taxid) {
            Color32::from_rgb(220, 20, 60)
        } else if app.highlight.row_is_hot(row) {
            Color32::from_rgb(220, 120, 20)
        } else {
            Color32::from_gray(60)
        };
        painter.text(
            to_screen(row_label_anchor(leaf)),
            Align2::LEFT_CENTER,
            display_label(&payload.row_labels[row]),
            label_font.clone(),
            color,
        );
    }

    for (c, label) in panel.col_labels.iter().enumerate() {
        let color = if app.highlight.col_is_hot(c) {
            Color32::from_rgb(220, 120, 20)
        } else {
            Color32::from_gray(60)
        };
        let galley = painter.layout_no_wrap(label.clone(), label_font.clone(), color);
        let pos = to_screen(col_label_anchor(c, &cfg));
        // Rotate the column label to run upward from its anchor
        let text_shape = egui::epaint::TextShape {
            pos,
            galley,
            fallback_color: Color32::TRANSPARENT,
            opacity_factor: 1.0,
            underline: Stroke::NONE,
            override_text_color: Some(color),
            angle: -std::f32::consts::FRAC_PI_2,
        };
        painter.add(egui::Shape::Text(text_shape));
    }

    let legend_y = (payload.row_ids.len() + 2) as f32 * cfg.cell_size + 12.0;
    draw_legend(
        painter,
        to_screen(Pos2::new(cfg.cluster_space, legend_y)),
        cfg.cell_size,
    );
}
