use eframe::egui::{Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::MetricPoint;

/// Four decimals, as in the source workbook's report view.
pub fn format_value(value: f64) -> String {
    format!("{value:.4}")
}

/// Two-column table of the visible metric points.
pub fn metrics_table(ui: &mut Ui, points: &[MetricPoint]) {
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(eframe::egui::Align::Center))
        .column(Column::auto().at_least(200.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Metric");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|body| {
            body.rows(20.0, points.len(), |mut row| {
                let point = &points[row.index()];
                row.col(|ui| {
                    ui.label(point.name.as_str());
                });
                row.col(|ui| {
                    ui.monospace(format_value(point.value));
                });
            });
        });
}
