use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, Grid, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::enrich::{ORDER_DATE, ORDER_MONTH, ORDER_YEAR, SHIP_DATE, SHIP_DAYS};
use crate::data::export::export_filename;
use crate::data::model::{ColumnSummary, RowTable};
use crate::data::select::select_inputs;
use crate::state::{AppState, PredictionMode, PredictionResult, ResultsTab};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the central panel: dataset preview, feature engineering view,
/// model input columns, and the prediction result tabs.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(raw) = state.raw.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to get started  (Sources → Load dataset)");
        });
        return;
    };

    // Mutations are deferred until the immutable walk below is done.
    let mut next_tab = state.active_tab;
    let mut pending_export: Option<PathBuf> = None;

    ScrollArea::vertical()
        .id_salt("central_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dataset_section(ui, &raw);

            if let Some(enriched) = &state.enriched {
                features_section(ui, enriched);
                model_inputs_section(ui, state, enriched);
            }

            if let Some(result) = &state.result {
                results_section(ui, result, &mut next_tab, &mut pending_export);
            }
        });

    state.active_tab = next_tab;
    if let Some(path) = pending_export {
        state.export_result(&path);
    }
}

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

const RAW_PREVIEW_ROWS: usize = 15;
const ENRICHED_PREVIEW_ROWS: usize = 20;
const RESULT_PREVIEW_ROWS: usize = 50;

fn dataset_section(ui: &mut Ui, raw: &RowTable) {
    egui::CollapsingHeader::new(RichText::new("Dataset preview").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.small(format!(
                "First {} of {} rows, before feature engineering.",
                RAW_PREVIEW_ROWS.min(raw.len()),
                raw.len()
            ));
            row_table(ui, raw, RAW_PREVIEW_ROWS, "raw_preview");
        });
}

// ---------------------------------------------------------------------------
// Feature engineering view
// ---------------------------------------------------------------------------

fn features_section(ui: &mut Ui, enriched: &RowTable) {
    ui.add_space(8.0);
    ui.heading("Feature engineering");
    ui.small("Derived from the date columns: OrderYear, OrderMonth, ShipDays.");

    let preview = enriched.project(&[ORDER_DATE, SHIP_DATE, ORDER_YEAR, ORDER_MONTH, SHIP_DAYS]);
    row_table(ui, &preview, ENRICHED_PREVIEW_ROWS, "enriched_preview");

    if let Some(summary) = enriched.numeric_summary(SHIP_DAYS) {
        ui.add_space(4.0);
        ui.strong("ShipDays summary");
        summary_grid(ui, "ship_days_summary", &summary);
    }
}

fn model_inputs_section(ui: &mut Ui, state: &AppState, enriched: &RowTable) {
    egui::CollapsingHeader::new("Model input columns")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            match state.cache.artifact(Path::new(state.model_path())) {
                Ok(artifact) => {
                    let input = select_inputs(enriched, &artifact.drop_cols, &artifact.target_col);
                    ui.label(format!(
                        "{} columns feed the {} model:",
                        input.n_cols(),
                        artifact.predictor.kind()
                    ));
                    ui.label(input.columns().join(", "));
                }
                Err(e) => {
                    ui.colored_label(Color32::RED, format!("Failed to load model: {e}"));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Result tabs
// ---------------------------------------------------------------------------

fn results_section(
    ui: &mut Ui,
    result: &PredictionResult,
    active_tab: &mut ResultsTab,
    pending_export: &mut Option<PathBuf>,
) {
    ui.add_space(8.0);
    ui.separator();
    ui.heading(match result.mode {
        PredictionMode::ClassifySegment => "Segment predictions",
        PredictionMode::PredictSales => "Sales predictions",
    });

    ui.horizontal(|ui: &mut Ui| {
        for (tab, label) in [
            (ResultsTab::Overview, "Overview"),
            (ResultsTab::Table, "Result table"),
            (ResultsTab::Export, "Export"),
        ] {
            if ui.selectable_label(*active_tab == tab, label).clicked() {
                *active_tab = tab;
            }
        }
    });
    ui.add_space(4.0);

    match *active_tab {
        ResultsTab::Overview => match result.mode {
            PredictionMode::ClassifySegment => segment_overview(ui, result),
            PredictionMode::PredictSales => sales_overview(ui, result),
        },
        ResultsTab::Table => {
            ui.small(format!(
                "First {} of {} rows.",
                RESULT_PREVIEW_ROWS.min(result.table.len()),
                result.table.len()
            ));
            row_table(ui, &result.table, RESULT_PREVIEW_ROWS, "result_table");
        }
        ResultsTab::Export => export_tab(ui, result, pending_export),
    }
}

/// Predicted-label distribution: counts plus a coloured bar chart.
fn segment_overview(ui: &mut Ui, result: &PredictionResult) {
    let counts = result.table.value_counts(&result.column);

    Grid::new("segment_counts")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Predicted segment");
            ui.strong("Rows");
            ui.end_row();
            for (label, count) in &counts {
                ui.label(label.to_string());
                ui.label(count.to_string());
                ui.end_row();
            }
        });

    let charts: Vec<BarChart> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            let color = result
                .colors
                .as_ref()
                .map(|c| c.color_for(label))
                .unwrap_or(Color32::LIGHT_BLUE);
            BarChart::new(vec![Bar::new(i as f64, *count as f64).fill(color)])
                .name(label.to_string())
                .color(color)
        })
        .collect();

    Plot::new("segment_distribution")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("Rows")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Predicted-value statistics plus a histogram.
fn sales_overview(ui: &mut Ui, result: &PredictionResult) {
    let Some(summary) = result.table.numeric_summary(&result.column) else {
        ui.label("No numeric predictions to summarise.");
        return;
    };
    summary_grid(ui, "sales_summary", &summary);

    let values: Vec<f64> = result
        .table
        .column(&result.column)
        .into_iter()
        .flatten()
        .filter_map(|c| c.as_f64())
        .collect();
    let bars = histogram_bars(&values, 20);
    if bars.is_empty() {
        return;
    }

    Plot::new("sales_histogram")
        .height(220.0)
        .x_axis_label(result.column.clone())
        .y_axis_label("Rows")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(&result.column)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

fn export_tab(ui: &mut Ui, result: &PredictionResult, pending_export: &mut Option<PathBuf>) {
    let filename = export_filename(&result.target);
    ui.label(format!(
        "Download the full result table ({} rows) as CSV.",
        result.table.len()
    ));
    ui.monospace(&filename);

    if ui.button("Save as CSV…").clicked() {
        let picked = rfd::FileDialog::new()
            .set_title("Export predictions")
            .set_file_name(&filename)
            .add_filter("CSV", &["csv"])
            .save_file();
        if let Some(path) = picked {
            *pending_export = Some(path);
        }
    }
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// First `limit` rows of `table` as a striped grid.
fn row_table(ui: &mut Ui, table: &RowTable, limit: usize, id: &str) {
    let n_rows = table.len().min(limit);

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal()
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().at_least(70.0), table.n_cols())
                    .header(20.0, |mut header| {
                        for col in table.columns() {
                            header.col(|ui: &mut Ui| {
                                ui.strong(col);
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in &table.rows()[..n_rows] {
                            body.row(18.0, |mut table_row| {
                                for cell in row {
                                    table_row.col(|ui: &mut Ui| {
                                        ui.label(cell.to_string());
                                    });
                                }
                            });
                        }
                    });
            });
    });
}

fn summary_grid(ui: &mut Ui, id: &str, summary: &ColumnSummary) {
    Grid::new(id).striped(true).show(ui, |ui: &mut Ui| {
        ui.strong("count");
        ui.strong("mean");
        ui.strong("std");
        ui.strong("min");
        ui.strong("median");
        ui.strong("max");
        ui.end_row();

        ui.label(summary.count.to_string());
        ui.label(format!("{:.2}", summary.mean));
        ui.label(format!("{:.2}", summary.std));
        ui.label(format!("{:.2}", summary.min));
        ui.label(format!("{:.2}", summary.median));
        ui.label(format!("{:.2}", summary.max));
        ui.end_row();
    });
}

/// Evenly bucketed histogram bars over `values`.
fn histogram_bars(values: &[f64], n_bins: usize) -> Vec<Bar> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![Bar::new(min, values.len() as f64)];
    }

    let width = range / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| {
            let center = min + (i as f64 + 0.5) * width;
            Bar::new(center, count as f64).width(width * 0.95)
        })
        .collect()
}
