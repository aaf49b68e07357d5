use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, PredictionMode};

// ---------------------------------------------------------------------------
// Top bar – dataset metrics and status
// ---------------------------------------------------------------------------

/// Render the top metrics / status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Superstore — Segment & Sales Prediction");
        ui.separator();

        match &state.raw {
            Some(table) => {
                ui.label(format!("{} rows", table.len()));
                ui.label(format!("{} columns", table.n_cols()));
            }
            None => {
                ui.label("no dataset loaded");
            }
        }

        ui.separator();
        ui.label(state.mode.label());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – sources, mode, actions
// ---------------------------------------------------------------------------

/// Render the left sources-and-mode panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sources");
    ui.separator();

    ui.label("Dataset (.csv / .parquet)");
    path_row(ui, &mut state.dataset_path, &["csv", "parquet", "pq"]);
    if ui.button("Load dataset").clicked() {
        state.load_dataset();
    }

    ui.separator();
    ui.strong("Model artifacts (.json)");
    ui.label("Segment classifier");
    path_row(ui, &mut state.segment_model_path, &["json"]);
    ui.label("Sales regressor");
    path_row(ui, &mut state.sales_model_path, &["json"]);

    ui.separator();
    ui.strong("Mode");
    let mut mode = state.mode;
    ui.radio_value(&mut mode, PredictionMode::ClassifySegment, "Classify Segment");
    ui.radio_value(&mut mode, PredictionMode::PredictSales, "Predict Sales");
    state.set_mode(mode);

    ui.separator();
    let run = egui::Button::new(RichText::new("Run Prediction").strong());
    if ui.add_enabled(state.enriched.is_some(), run).clicked() {
        state.run_prediction();
    }
    if state.enriched.is_none() {
        ui.small("Load a dataset to enable prediction.");
    }
}

/// One editable path with a file-picker button.
fn path_row(ui: &mut Ui, path: &mut String, extensions: &[&str]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.text_edit_singleline(path);
        if ui.small_button("Browse…").clicked() {
            let picked = rfd::FileDialog::new()
                .set_title("Select file")
                .add_filter("Supported files", extensions)
                .pick_file();
            if let Some(p) = picked {
                *path = p.display().to_string();
            }
        }
    });
}
