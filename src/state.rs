use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use crate::cache::SessionCache;
use crate::color::CategoryColors;
use crate::data::enrich::enrich;
use crate::data::export;
use crate::data::model::RowTable;
use crate::predict::runner::run_prediction;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which pretrained model a prediction request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMode {
    ClassifySegment,
    PredictSales,
}

impl PredictionMode {
    pub fn label(self) -> &'static str {
        match self {
            PredictionMode::ClassifySegment => "Classify Segment",
            PredictionMode::PredictSales => "Predict Sales",
        }
    }
}

/// Which result tab is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsTab {
    #[default]
    Overview,
    Table,
    Export,
}

/// One finished prediction, ready for browsing and export.
pub struct PredictionResult {
    /// Raw table plus the appended prediction column.
    pub table: RowTable,
    /// Name of the prediction column ("Predicted <target>").
    pub column: String,
    /// The target the model was trained for (drives the export filename).
    pub target: String,
    pub mode: PredictionMode,
    /// Label colours for classification results.
    pub colors: Option<CategoryColors>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dataset source path (text-editable, no upload).
    pub dataset_path: String,
    /// Artifact path for the segment classifier.
    pub segment_model_path: String,
    /// Artifact path for the sales regressor.
    pub sales_model_path: String,

    pub mode: PredictionMode,

    /// Session-scoped source cache (datasets and artifacts by path).
    pub cache: SessionCache,

    /// Loaded dataset (None until the user loads a file).
    pub raw: Option<Arc<RowTable>>,
    /// Feature-engineered copy of the dataset.
    pub enriched: Option<RowTable>,
    /// Last successful prediction.
    pub result: Option<PredictionResult>,

    pub active_tab: ResultsTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset_path: "demo/sample_superstore.csv".to_string(),
            segment_model_path: "demo/segment_voting.json".to_string(),
            sales_model_path: "demo/sales_rf.json".to_string(),
            mode: PredictionMode::ClassifySegment,
            cache: SessionCache::default(),
            raw: None,
            enriched: None,
            result: None,
            active_tab: ResultsTab::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Artifact path for the active mode.
    pub fn model_path(&self) -> &str {
        match self.mode {
            PredictionMode::ClassifySegment => &self.segment_model_path,
            PredictionMode::PredictSales => &self.sales_model_path,
        }
    }

    /// Switch modes; the previous mode's result no longer applies.
    pub fn set_mode(&mut self, mode: PredictionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.result = None;
            self.status_message = None;
        }
    }

    /// Load (or re-use) the dataset at `dataset_path`, then enrich it.
    /// A new dataset invalidates the enriched table and any prediction.
    pub fn load_dataset(&mut self) {
        self.status_message = None;
        self.enriched = None;
        self.result = None;

        match self.cache.dataset(Path::new(&self.dataset_path)) {
            Ok(table) => {
                info!(
                    "dataset ready: {} rows, {} columns",
                    table.len(),
                    table.n_cols()
                );
                self.raw = Some(table);
                self.enrich_loaded();
            }
            Err(e) => {
                error!("dataset load failed: {e}");
                self.raw = None;
                self.status_message = Some(format!("Failed to load dataset: {e}"));
            }
        }
    }

    /// Derive the enriched table from the loaded dataset. An enrichment
    /// failure halts the pipeline for this dataset but keeps the raw
    /// preview usable.
    fn enrich_loaded(&mut self) {
        let Some(raw) = &self.raw else { return };
        match enrich(raw) {
            Ok(table) => self.enriched = Some(table),
            Err(e) => {
                error!("feature engineering failed: {e}");
                self.status_message = Some(format!("Feature engineering failed: {e}"));
            }
        }
    }

    /// Run one prediction request to completion (load model if not cached →
    /// select → predict → store result). Every failure becomes a status
    /// message; a failed run never replaces the previous result.
    pub fn run_prediction(&mut self) {
        self.status_message = None;

        let Some(raw) = self.raw.clone() else {
            self.status_message = Some("Load a dataset first.".to_string());
            return;
        };
        let Some(enriched) = &self.enriched else {
            self.status_message =
                Some("Feature engineering failed; fix the dataset and reload.".to_string());
            return;
        };

        let artifact = match self.cache.artifact(Path::new(self.model_path())) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("model load failed: {e}");
                self.status_message = Some(format!("Failed to load model: {e}"));
                return;
            }
        };

        match run_prediction(&raw, enriched, &artifact) {
            Ok(table) => {
                let column = artifact.predicted_column();
                let colors = (self.mode == PredictionMode::ClassifySegment)
                    .then(|| CategoryColors::new(&table.unique_values(&column)));
                self.result = Some(PredictionResult {
                    table,
                    column,
                    target: artifact.target_col.clone(),
                    mode: self.mode,
                    colors,
                });
                self.active_tab = ResultsTab::Overview;
            }
            Err(e) => {
                error!("prediction failed: {e}");
                self.status_message = Some(format!("Prediction failed: {e}"));
            }
        }
    }

    /// Write the current result to `path` as CSV.
    pub fn export_result(&mut self, path: &Path) {
        let Some(result) = &self.result else { return };
        match export::write_csv(&result.table, path) {
            Ok(()) => self.status_message = None,
            Err(e) => {
                error!("export failed: {e:#}");
                self.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}
