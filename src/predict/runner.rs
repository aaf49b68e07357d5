use log::info;

use crate::data::model::RowTable;
use crate::data::select::select_inputs;

use super::artifact::ModelArtifact;
use super::error::PredictionError;

// ---------------------------------------------------------------------------
// Prediction orchestration: selection → predict → result assembly
// ---------------------------------------------------------------------------

/// Run one prediction request to completion.
///
/// Builds the model input from the enriched table, invokes the predictor,
/// checks that it produced exactly one scalar per row, and appends the
/// predictions to a copy of the *raw* table as `"Predicted <target>"`.
/// Failures surface immediately; there are no retries and no partial
/// results.
pub fn run_prediction(
    raw: &RowTable,
    enriched: &RowTable,
    artifact: &ModelArtifact,
) -> Result<RowTable, PredictionError> {
    let input = select_inputs(enriched, &artifact.drop_cols, &artifact.target_col);
    let predictions = artifact.predictor.predict(&input)?;

    if predictions.len() != input.len() {
        return Err(PredictionError::ShapeMismatch {
            expected: input.len(),
            actual: predictions.len(),
        });
    }

    let mut output = raw.clone();
    output.append_column(artifact.predicted_column(), predictions);

    info!(
        "predicted {:?} for {} rows from {} input columns",
        artifact.target_col,
        output.len(),
        input.n_cols()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::data::model::CellValue;
    use crate::predict::model::Predictor;

    use super::*;

    /// Test double returning a fixed vector regardless of input.
    struct FixedPredictor(Vec<CellValue>);

    impl Predictor for FixedPredictor {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn predict(&self, _input: &RowTable) -> Result<Vec<CellValue>, PredictionError> {
            Ok(self.0.clone())
        }
    }

    fn tables() -> (RowTable, RowTable) {
        let mut raw = RowTable::new(vec!["Row ID".into(), "Sales".into()]);
        raw.push_row(vec![CellValue::Integer(1), CellValue::Float(10.0)]);
        raw.push_row(vec![CellValue::Integer(2), CellValue::Float(20.0)]);
        raw.push_row(vec![CellValue::Integer(3), CellValue::Float(30.0)]);

        let mut enriched = raw.clone();
        enriched.append_column(
            "ShipDays",
            vec![
                CellValue::Integer(4),
                CellValue::Integer(2),
                CellValue::Integer(6),
            ],
        );
        (raw, enriched)
    }

    #[test]
    fn appends_predictions_to_the_raw_table() {
        let (raw, enriched) = tables();
        let artifact = ModelArtifact {
            predictor: Box::new(FixedPredictor(vec![
                CellValue::Float(0.0),
                CellValue::Float(1.0),
                CellValue::Float(2.0),
            ])),
            drop_cols: BTreeSet::from(["Row ID".to_string()]),
            target_col: "Sales".to_string(),
        };

        let out = run_prediction(&raw, &enriched, &artifact).unwrap();
        assert_eq!(out.columns(), &["Row ID", "Sales", "Predicted Sales"]);
        let predicted: Vec<_> = out.column("Predicted Sales").unwrap().cloned().collect();
        assert_eq!(
            predicted,
            vec![
                CellValue::Float(0.0),
                CellValue::Float(1.0),
                CellValue::Float(2.0)
            ]
        );
    }

    #[test]
    fn wrong_prediction_count_is_a_shape_mismatch() {
        let (raw, enriched) = tables();
        let artifact = ModelArtifact {
            predictor: Box::new(FixedPredictor(vec![CellValue::Float(0.0)])),
            drop_cols: BTreeSet::new(),
            target_col: "Sales".to_string(),
        };

        let err = run_prediction(&raw, &enriched, &artifact).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ShapeMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }
}
