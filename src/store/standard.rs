use serde::Deserialize;

use super::palette::{Palette, PaletteKind};
use crate::color::Color;

pub const STANDARD_COLORS_PALETTE_ID: &str = "standard-html-colors";
pub const STANDARD_COLORS_PALETTE_NAME: &str = "Standard HTML Colors";

const STANDARD_COLORS_JSON: &str = include_str!("../../assets/standard-html-colors.json");

#[derive(Debug, Deserialize)]
struct NamedColor {
    hex: String,
    name: String,
}

/// The bundled named-color set as a read-only palette.
pub fn standard_palette() -> Palette {
    let mut palette = Palette::with_id(
        STANDARD_COLORS_PALETTE_ID,
        STANDARD_COLORS_PALETTE_NAME,
        PaletteKind::System,
    );
    let entries: Vec<NamedColor> = match serde_json::from_str(STANDARD_COLORS_JSON) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(%err, "invalid bundled standard colors");
            return palette;
        }
    };
    for entry in entries {
        match Color::from_hex(&entry.hex) {
            Ok(color) => palette.push(color, &entry.name),
            Err(err) => tracing::warn!(name = %entry.name, %err, "skipping standard color"),
        }
    }
    palette
}
