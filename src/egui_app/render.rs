#![cfg(feature = "egui")]

use eframe::egui::{self, Align2, Color32, Pos2, Rect, Stroke, Vec2};

use crate::color::{self, ABSENT_COLOR, HEX_COLOR_SCALE, MAX_COLOR, SEED_COLOR};
use crate::layout::ElbowPath;

/// Convert a `#rrggbb` hex color into a Color32, falling back to gray for
/// malformed input.
pub fn color32_from_hex(hex: &str) -> Color32 {
    match color::parse_hex(hex) {
        Some((r, g, b)) => Color32::from_rgb(r, g, b),
        None => Color32::GRAY,
    }
}

/// The fill color of a cell for a given matrix value.
pub fn cell_fill(value: f64) -> Color32 {
    color32_from_hex(color::cell_color(value, &HEX_COLOR_SCALE))
}

/// Draw one dendrogram connector as its two screen-space segments
/// (vertical run at the parent level, then horizontal run to the child).
pub fn draw_elbow(
    painter: &egui::Painter,
    elbow: &ElbowPath,
    to_screen: &dyn Fn(Pos2) -> Pos2,
    stroke: Stroke,
) {
    let a = to_screen(Pos2::new(elbow.h0, elbow.v0));
    let b = to_screen(Pos2::new(elbow.h0, elbow.v1));
    let c = to_screen(Pos2::new(elbow.h1, elbow.v1));
    painter.line_segment([a, b], stroke);
    painter.line_segment([b, c], stroke);
}

/// Draw the color legend strip: the green percentage scale followed by the
/// three sentinel swatches.
pub fn draw_legend(painter: &egui::Painter, origin: Pos2, swatch: f32) {
    let entries: Vec<(&str, String)> = HEX_COLOR_SCALE
        .iter()
        .enumerate()
        .map(|(i, hex)| (*hex, format!("{}–{}%", i * 10, (i + 1) * 10)))
        .chain([
            (MAX_COLOR, "100%".to_string()),
            (ABSENT_COLOR, "absent".to_string()),
            (SEED_COLOR, "seed".to_string()),
        ])
        .collect();
    let font = egui::FontId::proportional(9.0);
    for (i, (hex, label)) in entries.iter().enumerate() {
        let min = Pos2::new(origin.x + i as f32 * swatch * 2.2, origin.y);
        let rect = Rect::from_min_size(min, Vec2::splat(swatch));
        painter.rect_filled(rect, 1.0, color32_from_hex(hex));
        painter.text(
            Pos2::new(rect.center().x, rect.bottom() + 2.0),
            Align2::CENTER_TOP,
            label,
            font.clone(),
            Color32::DARK_GRAY,
        );
    }
}
