use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{year_options, LocationKind, Metric, Sex};
use crate::state::{AppState, SelectionPatch};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the selectors. Each change goes through `update_selection`.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, now: Instant) {
    ui.heading("Selection");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let selection = state.selection.clone();
    let mut patch: Option<SelectionPatch> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Country / region, grouped like the source table ----
            ui.strong("Region or Country");
            let current = selection.country.clone().unwrap_or_else(|| "Select…".to_string());
            egui::ComboBox::from_id_salt("select_country")
                .selected_text(&current)
                .height(400.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for (kind, heading) in [
                        (LocationKind::Region, "Regions"),
                        (LocationKind::Country, "Countries"),
                    ] {
                        ui.label(RichText::new(heading).strong());
                        for location in dataset.locations(kind) {
                            let selected =
                                selection.country.as_deref() == Some(location.name.as_str());
                            if ui
                                .selectable_label(selected, &location.name)
                                .on_hover_text(format!("location id {}", location.id))
                                .clicked()
                            {
                                patch = Some(SelectionPatch::country(location.name.clone()));
                            }
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- Year ----
            ui.strong("Year");
            egui::ComboBox::from_id_salt("select_year")
                .selected_text(selection.year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in year_options() {
                        if ui
                            .selectable_label(selection.year == year, year.to_string())
                            .clicked()
                        {
                            patch = Some(SelectionPatch::year(year));
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- Sex ----
            ui.strong("Sex");
            let current = selection.effective_sex().to_string();
            egui::ComboBox::from_id_salt("select_sex")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    for sex in Sex::ALL {
                        if ui
                            .selectable_label(selection.effective_sex() == sex, sex.to_string())
                            .clicked()
                        {
                            patch = Some(SelectionPatch::sex(sex));
                        }
                    }
                });
            ui.add_space(6.0);

            // ---- BMI classification ----
            ui.strong("Classification");
            egui::ComboBox::from_id_salt("select_bmi")
                .selected_text(selection.bmi.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for bmi in Metric::ALL {
                        if ui
                            .selectable_label(selection.bmi == bmi, bmi.to_string())
                            .clicked()
                        {
                            patch = Some(SelectionPatch::bmi(bmi));
                        }
                    }
                });
        });

    // Last change this frame wins.
    if let Some(patch) = patch {
        state.update_selection(patch, now);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, now: Instant) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, now);
                ui.close_menu();
            }
        });

        ui.separator();

        let label = if state.playback.is_playing() { "Stop" } else { "Play" };
        if ui
            .add_enabled(state.dataset.is_some(), egui::Button::new(label))
            .clicked()
        {
            state.toggle_playback(now);
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows, {} locations, year {}",
                ds.len(),
                ds.location_count(),
                state.selection.year
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

pub fn open_file_dialog(state: &mut AppState, now: Instant) {
    let file = rfd::FileDialog::new()
        .set_title("Open prevalence data")
        .add_filter("CSV", &["csv", "CSV"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows covering {} locations from {}",
                    dataset.len(),
                    dataset.location_count(),
                    path.display()
                );
                state.set_dataset(dataset, now);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.fail_load(format!("Error: {e}"));
            }
        }
    }
}
