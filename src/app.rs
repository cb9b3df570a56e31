use eframe::egui::{self, Ui};

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot, radar, table};

const CHART_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Create the app and start loading the configured dataset.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut state = AppState::default();
        let ctx = cc.egui_ctx.clone();
        state.begin_load(config.data_path, move || ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection buttons ----
        let actions = egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| panels::selection_panel(ui, &self.state))
            .inner;
        for action in actions {
            self.state.apply(action);
        }

        // ---- Central panel: charts + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Position Analysis Dashboard");
    ui.add_space(4.0);

    if state.visible.is_empty() {
        let msg = if state.is_loading() {
            "Loading data…"
        } else if state.dataset.is_empty() {
            "No data loaded  (File → Open…)"
        } else {
            "No metrics for this selection"
        };
        ui.label(msg);
    }

    ui.columns(2, |cols| {
        cols[0].strong("Metrics Distribution");
        plot::metrics_bar_chart(&mut cols[0], &state.visible, &state.metric_colors, CHART_HEIGHT);
        cols[1].strong("Metrics Radar");
        radar::metrics_radar(&mut cols[1], &state.visible, CHART_HEIGHT);
    });

    ui.add_space(8.0);
    ui.strong("Detailed Metrics");
    ui.separator();
    table::metrics_table(ui, &state.visible);
}
