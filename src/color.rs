/// Green hex scale used for co-occurrence percentages, light to dark.
pub const HEX_COLOR_SCALE: [&str; 10] = [
    "#caf38c", "#aded4b", "#92d133", "#71c430", "#68b12f", "#609e2e", "#568f29", "#457d18",
    "#3b7d07", "#295904",
];

/// Fixed color for a 100% co-occurrence value.
pub const MAX_COLOR: &str = "#000000";

/// Fixed color for the seed-species sentinel (negative matrix values).
pub const SEED_COLOR: &str = "#dc143c";

/// Fixed color for species absent from a phylome (zero matrix values).
pub const ABSENT_COLOR: &str = "#e8e8e8";

/// Quantize a positive percentage value onto the palette.
///
/// A value of exactly 100 maps to [`MAX_COLOR`]; everything else maps to
/// `palette[floor((value/100) / (1/len))]`. The index is clamped to the last
/// palette entry since the service does not guarantee values stay below 100.
/// Negative and zero values are the caller's business (see [`cell_color`]).
pub fn color_for_value<'a>(value: f64, palette: &[&'a str]) -> &'a str {
    if value == 100.0 {
        return MAX_COLOR;
    }
    let ratio_step = 1.0 / palette.len() as f64;
    let scale_index = ((value / 100.0) / ratio_step).floor() as usize;
    palette[scale_index.min(palette.len() - 1)]
}

/// Full cell color dispatch including the seed and absent sentinels.
pub fn cell_color<'a>(value: f64, palette: &[&'a str]) -> &'a str {
    if value < 0.0 {
        SEED_COLOR
    } else if value == 0.0 {
        ABSENT_COLOR
    } else {
        color_for_value(value, palette)
    }
}

/// Parse a `#rrggbb` hex color into its RGB components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
