use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Channel colours: column name → Color32
// ---------------------------------------------------------------------------

/// Stable colour per numeric column, assigned in table order so a channel
/// keeps its colour as others are toggled on and off.
#[derive(Debug, Clone, Default)]
pub struct ChannelColors {
    mapping: BTreeMap<String, Color32>,
}

impl ChannelColors {
    pub fn new(columns: &[String]) -> Self {
        let mapping = columns
            .iter()
            .cloned()
            .zip(generate_palette(columns.len()))
            .collect();
        ChannelColors { mapping }
    }

    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping
            .get(column)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_channel_falls_back() {
        let colors = ChannelColors::new(&["thrust".to_string()]);
        assert_ne!(colors.color_for("thrust"), Color32::LIGHT_BLUE);
        assert_eq!(colors.color_for("other"), Color32::LIGHT_BLUE);
    }
}
