use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filter row – date range, manufacturer, model year
// ---------------------------------------------------------------------------

/// Render the three cascading filter controls.
pub fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy out what the widgets edit so state can be mutated afterwards.
    let mut start = session.date_range.start;
    let mut end = session.date_range.end;
    let manufacturers = session.options.manufacturers.clone();
    let model_years = session.options.model_years.clone();
    let current_manufacturer = session.options.selection.manufacturer.clone();
    let current_year = session.options.selection.model_year;

    let mut chosen_manufacturer: Option<String> = None;
    let mut chosen_year: Option<i32> = None;

    ui.columns(3, |cols| {
        cols[0].strong("Select Date Range");
        cols[0].horizontal(|ui: &mut Ui| {
            ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
            ui.label("to");
            ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
        });

        cols[1].strong("Select Manufacturer");
        egui::ComboBox::from_id_salt("manufacturer")
            .selected_text(current_manufacturer.as_deref().unwrap_or("none available"))
            .show_ui(&mut cols[1], |ui: &mut Ui| {
                for m in &manufacturers {
                    let selected = current_manufacturer.as_deref() == Some(m.as_str());
                    if ui.selectable_label(selected, m.as_str()).clicked() {
                        chosen_manufacturer = Some(m.clone());
                    }
                }
            });

        cols[2].strong("Select Model Year");
        let year_text = current_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "none available".to_string());
        egui::ComboBox::from_id_salt("model_year")
            .selected_text(year_text)
            .show_ui(&mut cols[2], |ui: &mut Ui| {
                for &y in &model_years {
                    if ui.selectable_label(current_year == Some(y), y.to_string()).clicked() {
                        chosen_year = Some(y);
                    }
                }
            });
    });

    let range = DateRange::new(start, end);
    if range != session.date_range {
        if range.is_inverted() {
            log::debug!("Inverted date range {start} > {end}");
        }
        state.set_date_range(range);
    }
    if let Some(m) = chosen_manufacturer {
        state.select_manufacturer(&m);
    }
    if let Some(y) = chosen_year {
        state.select_model_year(y);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            let source = session
                .dataset
                .source()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} listings loaded ({} incomplete dropped), {} visible",
                session.dataset.len(),
                session.dataset.dropped_rows(),
                session.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match state.open(&path) {
            Ok(()) => log::info!("Switched to dataset {}", path.display()),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
