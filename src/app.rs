use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: filters + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading("U.S. Vehicle Market Dashboard");
                    });
                    ui.add_space(8.0);

                    panels::filter_bar(ui, &mut self.state);
                    ui.add_space(8.0);
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };

    ui.heading("📊 Charts");
    ui.separator();

    if let Some(warning) = session.view.warning() {
        charts::empty_notice(ui, &warning.to_string());
    }

    table::data_overview(ui, &session.view);
    ui.add_space(8.0);

    charts::category_row(ui, &session.charts.breakdowns);
    ui.separator();

    ui.columns(2, |cols| {
        charts::histogram_panel(&mut cols[0], state);
        charts::scatter_panel(&mut cols[1], state);
    });
    ui.separator();

    if let Some(session) = &state.session {
        charts::trend_panel(ui, &session.charts.trend);
    }
}
