use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Category, ConditionKey, PositionType};
use crate::state::{Action, AppState};

const POSITION_SELECTED: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const CONDITION_SELECTED: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);

// ---------------------------------------------------------------------------
// Left side panel – selection buttons
// ---------------------------------------------------------------------------

/// Render the position and condition button groups. Returns the actions for
/// any buttons clicked this frame; the caller applies them.
pub fn selection_panel(ui: &mut Ui, state: &AppState) -> Vec<Action> {
    let mut actions = Vec::new();
    let selection = &state.selection;

    ui.heading("Selection");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Position Type");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for &position in PositionType::ALL {
                    let selected = selection.position == position;
                    if choice_button(ui, selected, position.label(), POSITION_SELECTED).clicked()
                        && !selected
                    {
                        actions.push(Action::SelectPosition(position));
                    }
                }
            });
            ui.add_space(8.0);

            for key in ConditionKey::ALL {
                ui.strong(key.column());
                let current = selection.conditions.get(key);
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for choice in key.choices() {
                        let selected = current == choice;
                        if choice_button(ui, selected, choice.label(), CONDITION_SELECTED)
                            .clicked()
                            && !selected
                        {
                            actions.push(Action::SelectCondition(choice));
                        }
                    }
                });
                ui.add_space(8.0);
            }
        });

    actions
}

fn choice_button(ui: &mut Ui, selected: bool, label: &str, accent: Color32) -> egui::Response {
    let button = if selected {
        egui::Button::new(RichText::new(label).color(Color32::WHITE)).fill(accent)
    } else {
        egui::Button::new(label)
    };
    ui.add(button)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.is_loading() {
            ui.spinner();
            ui.label("Loading…");
        } else {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "no data".to_string());
            ui.label(format!(
                "{source}: {} rows, {} shown",
                state.dataset.len(),
                state.visible.len()
            ));
            if state.dataset.skipped > 0 {
                ui.label(
                    RichText::new(format!("{} rows skipped", state.dataset.skipped))
                        .color(Color32::GRAY),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open position metrics")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let ctx = ctx.clone();
        state.begin_load(path, move || ctx.request_repaint());
    }
}
