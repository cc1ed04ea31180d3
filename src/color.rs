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
// Category value → Color32
// ---------------------------------------------------------------------------

/// Assigns each category value of a chart a distinct colour.
///
/// Values are coloured in the order given, so the most frequent slice of a
/// donut always starts the hue wheel.
#[derive(Debug, Clone)]
pub struct CategoryPalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryPalette {
    pub fn new<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        let mapping = values
            .iter()
            .zip(generate_palette(values.len()))
            .map(|(v, c)| (v.to_string(), c))
            .collect();

        CategoryPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        assert_ne!(p[0], p[3]);
    }

    #[test]
    fn unknown_values_fall_back_to_gray() {
        let palette = CategoryPalette::new(["gas", "diesel"]);
        assert_ne!(palette.color_for("gas"), palette.color_for("diesel"));
        assert_eq!(palette.color_for("electric"), Color32::GRAY);
    }
}
