use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color::MetricColors;
use crate::data::filter::MetricPoint;

// ---------------------------------------------------------------------------
// Horizontal bar chart
// ---------------------------------------------------------------------------

/// Vertical slot of bar `i` out of `n`, so the first metric sits on top.
pub fn bar_slot(i: usize, n: usize) -> f64 {
    (n - 1 - i) as f64
}

/// Category-axis label for a grid mark; blank between slots.
pub fn slot_label(names: &[&str], y: f64) -> String {
    let n = names.len();
    let rounded = y.round();
    if (y - rounded).abs() > 1e-6 || rounded < 0.0 || rounded >= n as f64 {
        return String::new();
    }
    let i = n - 1 - rounded as usize;
    names[i].to_string()
}

/// One horizontal bar per metric point, labelled on the vertical axis.
pub fn metrics_bar_chart(ui: &mut Ui, points: &[MetricPoint], colors: &MetricColors, height: f32) {
    let n = points.len();
    let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(bar_slot(i, n), p.value)
                .name(&p.name)
                .fill(colors.color_for(&p.name))
        })
        .collect();

    Plot::new("metrics_bar")
        .height(height)
        .y_axis_min_width(120.0)
        .y_axis_formatter(move |mark, _range| slot_label(&names, mark.value))
        .include_x(0.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            if !bars.is_empty() {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7).name("value"));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_metric_is_on_top() {
        assert_eq!(bar_slot(0, 3), 2.0);
        assert_eq!(bar_slot(2, 3), 0.0);
    }

    #[test]
    fn labels_only_on_whole_slots() {
        let names = ["winRate", "sharpe", "mdd"];
        assert_eq!(slot_label(&names, 2.0), "winRate");
        assert_eq!(slot_label(&names, 0.0), "mdd");
        assert_eq!(slot_label(&names, 0.5), "");
        assert_eq!(slot_label(&names, 3.0), "");
        assert_eq!(slot_label(&names, -1.0), "");
        assert_eq!(slot_label(&[], 0.0), "");
    }
}
