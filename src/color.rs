use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.68);
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
// Group colours: chart key → Color32
// ---------------------------------------------------------------------------

/// Assigns each distinct group key of a chart its own colour, in order of
/// first appearance, so a key keeps its colour across the pie slice, legend
/// and sunburst ring.
#[derive(Debug, Clone)]
pub struct GroupPalette {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl GroupPalette {
    pub fn new<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let mut ordered: Vec<&CellValue> = Vec::new();
        for k in keys {
            if !ordered.contains(&k) {
                ordered.push(k);
            }
        }
        let mapping = ordered
            .iter()
            .zip(generate_palette(ordered.len()))
            .map(|(v, c)| ((*v).clone(), c))
            .collect();

        GroupPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
