use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::ACCENT;
use crate::data::filter::MetricPoint;

const RINGS: usize = 4;
const LABEL_RADIUS: f64 = 1.18;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Radial domain: from `min(0, smallest value)` to the largest value.
pub fn radial_domain(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let hi = values.iter().copied().fold(lo, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

/// Direction of spoke `i` of `n`: the first points straight up, the rest
/// follow clockwise.
pub fn spoke(i: usize, n: usize) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    [angle.cos(), angle.sin()]
}

/// One vertex per value on a unit-radius chart.
pub fn radar_vertices(values: &[f64]) -> Vec<[f64; 2]> {
    let (lo, hi) = radial_domain(values);
    let n = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let r = (v - lo) / (hi - lo);
            let [dx, dy] = spoke(i, n);
            [dx * r, dy * r]
        })
        .collect()
}

fn ring(radius: f64, n: usize) -> PlotPoints<'static> {
    (0..=n)
        .map(|i| {
            let [dx, dy] = spoke(i % n, n);
            [dx * radius, dy * radius]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Radar chart: one spoke per metric, shaded polygon through the values.
pub fn metrics_radar(ui: &mut Ui, points: &[MetricPoint], height: f32) {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let n = values.len();
    let (lo, hi) = radial_domain(&values);
    let grid = Stroke::new(1.0, Color32::from_gray(140));

    Plot::new("metrics_radar")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            if n == 0 {
                return;
            }

            // Polar grid; fewer than three spokes get round rings.
            let sides = if n >= 3 { n } else { 48 };
            for k in 1..=RINGS {
                let radius = k as f64 / RINGS as f64;
                plot_ui.line(Line::new(ring(radius, sides)).stroke(grid));
            }
            for (i, point) in points.iter().enumerate() {
                let [dx, dy] = spoke(i, n);
                plot_ui.line(Line::new(PlotPoints::from(vec![[0.0, 0.0], [dx, dy]])).stroke(grid));
                plot_ui.text(Text::new(
                    PlotPoint::new(dx * LABEL_RADIUS, dy * LABEL_RADIUS),
                    point.name.as_str(),
                ));
            }
            plot_ui.text(
                Text::new(PlotPoint::new(0.08, 1.04), format!("{hi:.2}"))
                    .color(Color32::GRAY),
            );
            if lo < 0.0 {
                plot_ui.text(
                    Text::new(PlotPoint::new(0.08, 0.04), format!("{lo:.2}"))
                        .color(Color32::GRAY),
                );
            }

            let fill = Color32::from_rgba_unmultiplied(ACCENT.r(), ACCENT.g(), ACCENT.b(), 153);
            plot_ui.polygon(
                Polygon::new(PlotPoints::from(radar_vertices(&values)))
                    .name("Value")
                    .fill_color(fill)
                    .stroke(Stroke::new(1.5, ACCENT)),
            );
        });
}
