use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Category colours: predicted label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a prediction column to visually distinct,
/// stable colours (evenly spaced hues in label order).
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<CellValue, Color32>,
    fallback: Color32,
}

impl CategoryColors {
    /// Build a colour map for the given label set.
    pub fn new(labels: &BTreeSet<CellValue>) -> Self {
        let n = labels.len().max(1);
        let mapping = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let hue = (i as f32 / n as f32) * 360.0;
                let rgb: Srgb = Hsl::new(hue, 0.7, 0.5).into_color();
                let color = Color32::from_rgb(
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                );
                (label.clone(), color)
            })
            .collect();

        CategoryColors {
            mapping,
            fallback: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &CellValue) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(self.fallback)
    }
}
