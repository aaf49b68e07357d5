/// Prediction layer: pretrained model artifacts and the request pipeline.
///
/// Architecture:
/// ```text
///   artifact .json ──▶ artifact::load_artifact ──▶ ModelArtifact
///                                                      │
///   enriched RowTable ──▶ runner::run_prediction ◀─────┘
///                                │
///                                ▼
///              raw table + "Predicted <target>" column
/// ```
pub mod artifact;
pub mod error;
pub mod model;
pub mod runner;
