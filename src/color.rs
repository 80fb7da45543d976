use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Scope;

// ---------------------------------------------------------------------------
// HSL → Color32
// ---------------------------------------------------------------------------

/// Convert an HSL triple (hue in degrees) to an egui colour.
pub fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Fill colours for local and global marks. Switching palettes only changes
/// presentation, never the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPalette {
    #[default]
    Standard,
    /// Blue/orange pair that stays distinct under common colour-vision deficiencies.
    ColorBlind,
}

impl ChartPalette {
    pub fn toggled(self) -> Self {
        match self {
            ChartPalette::Standard => ChartPalette::ColorBlind,
            ChartPalette::ColorBlind => ChartPalette::Standard,
        }
    }

    pub fn color(self, scope: Scope) -> Color32 {
        match (self, scope) {
            (ChartPalette::Standard, Scope::Local) => hsl_color(4.0, 0.7, 0.55),
            (ChartPalette::Standard, Scope::Global) => hsl_color(0.0, 0.0, 0.62),
            (ChartPalette::ColorBlind, Scope::Local) => hsl_color(205.0, 0.7, 0.45),
            (ChartPalette::ColorBlind, Scope::Global) => hsl_color(32.0, 0.9, 0.6),
        }
    }
}
