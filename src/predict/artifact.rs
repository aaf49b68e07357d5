use std::collections::BTreeSet;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::error::ModelLoadError;
use super::model::{Predictor, PredictorSpec};

// ---------------------------------------------------------------------------
// Model artifact: a pretrained predictor plus its input-shaping metadata
// ---------------------------------------------------------------------------

/// The artifact bundle as stored on disk.  All three fields are required.
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    model: PredictorSpec,
    drop_cols: BTreeSet<String>,
    target_col: String,
}

/// An immutable pretrained model with its declared input shape: the columns
/// to strip before prediction and the column the model was trained to
/// predict (which must never appear in its own input).
pub struct ModelArtifact {
    pub predictor: Box<dyn Predictor>,
    pub drop_cols: BTreeSet<String>,
    pub target_col: String,
}

impl ModelArtifact {
    /// Column name the predictions land in.
    pub fn predicted_column(&self) -> String {
        format!("Predicted {}", self.target_col)
    }
}

/// Read and deserialize an artifact bundle from disk.
pub fn load_artifact(path: &Path) -> Result<ModelArtifact, ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ArtifactFile =
        serde_json::from_str(&text).map_err(|source| ModelLoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        "loaded {} model targeting {:?} from {}",
        match &file.model {
            PredictorSpec::Constant { .. } => "constant",
            PredictorSpec::Linear { .. } => "linear",
            PredictorSpec::TreeEnsemble { .. } => "tree ensemble",
        },
        file.target_col,
        path.display()
    );

    Ok(ModelArtifact {
        predictor: file.model.into_predictor(),
        drop_cols: file.drop_cols,
        target_col: file.target_col,
    })
}
