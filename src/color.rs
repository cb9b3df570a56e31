use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Fill used by the radar polygon and by bars whose metric is unknown.
pub const ACCENT: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);

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
            let hsl = Hsl::new(hue, 0.55, 0.6);
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
// Metric name → Color32
// ---------------------------------------------------------------------------

/// One colour per metric, fixed for the lifetime of a dataset so a bar keeps
/// its colour when the selection changes.
#[derive(Debug, Clone, Default)]
pub struct MetricColors {
    mapping: BTreeMap<String, Color32>,
}

impl MetricColors {
    /// Assign colours in the order the metrics first appear.
    pub fn new(metric_names: &[String]) -> Self {
        let palette = generate_palette(metric_names.len());
        let mapping = metric_names
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        MetricColors { mapping }
    }

    pub fn color_for(&self, metric: &str) -> Color32 {
        self.mapping.get(metric).copied().unwrap_or(ACCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn metric_colours_are_stable() {
        let names = vec!["winRate".to_string(), "sharpe".to_string()];
        let colors = MetricColors::new(&names);
        assert_eq!(colors.color_for("winRate"), colors.color_for("winRate"));
        assert_ne!(colors.color_for("winRate"), colors.color_for("sharpe"));
        assert_eq!(colors.color_for("unknown"), ACCENT);
    }
}
