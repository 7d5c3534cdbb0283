use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Bounds;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Blue (low) → red (high) ramp for a value inside `bounds`.
pub fn rating_color(value: f64, bounds: Bounds) -> Color32 {
    let span = bounds.max - bounds.min;
    let t = if span > 0.0 {
        ((value - bounds.min) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    hsl_to_color32(240.0 * (1.0 - t as f32), 0.8, 0.5)
}

// ---------------------------------------------------------------------------
// Food type → Color32
// ---------------------------------------------------------------------------

/// Stable colour per food type so charts agree with each other across filters.
#[derive(Debug, Clone)]
pub struct FoodPalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl Default for FoodPalette {
    fn default() -> Self {
        FoodPalette {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl FoodPalette {
    /// Build the palette from every food type in the dataset.
    pub fn new<'a>(food_types: impl Iterator<Item = &'a str>) -> Self {
        let unique: std::collections::BTreeSet<&str> =
            food_types.filter(|f| !f.is_empty()).collect();
        let mapping = unique
            .iter()
            .zip(generate_palette(unique.len()))
            .map(|(f, c)| (f.to_string(), c))
            .collect();

        FoodPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, food_type: &str) -> Color32 {
        self.mapping
            .get(food_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_and_stable() {
        let p = FoodPalette::new(["Thai", "Indian", "Thai", ""].into_iter());
        assert_ne!(p.color_for("Thai"), p.color_for("Indian"));
        assert_eq!(p.color_for("Pizza"), Color32::GRAY);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn rating_ramp_ends() {
        let b = Bounds::new(1.0, 5.0);
        assert_eq!(rating_color(5.0, b), rating_color(9.0, b));
        assert_ne!(rating_color(1.0, b), rating_color(5.0, b));
    }
}
