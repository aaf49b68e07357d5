use std::collections::BTreeMap;

use serde::Deserialize;

use crate::data::model::{CellValue, RowTable};

use super::error::PredictionError;

// ---------------------------------------------------------------------------
// Predictor – the capability every pretrained model satisfies
// ---------------------------------------------------------------------------

/// A pretrained model: one scalar per input row, in row order. The concrete
/// format behind the interface (forest, linear model, stub) is opaque to
/// callers.
pub trait Predictor: Send + Sync {
    /// Human-readable model family, for the UI.
    fn kind(&self) -> &'static str;

    fn predict(&self, input: &RowTable) -> Result<Vec<CellValue>, PredictionError>;
}

// ---------------------------------------------------------------------------
// On-disk predictor descriptions
// ---------------------------------------------------------------------------

/// A prediction scalar as it appears in artifact JSON: a number or a class
/// label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Label(String),
}

impl ScalarValue {
    fn to_cell(&self) -> CellValue {
        match self {
            ScalarValue::Number(n) => CellValue::Float(*n),
            ScalarValue::Label(s) => CellValue::String(s.clone()),
        }
    }
}

/// One node of a serialized decision tree. A node is either a split on a
/// numeric feature column or a leaf carrying the prediction scalar.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: String,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: ScalarValue,
    },
}

/// How a tree ensemble combines its member predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    /// Average the numeric leaves (random-forest regression).
    Mean,
    /// Most-voted leaf label, ties broken by label order (voting classifier).
    Majority,
}

/// The `model` field of an artifact bundle, tagged by model family.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictorSpec {
    /// Fixed scalar for every row. Mostly a stub/test double.
    Constant { value: ScalarValue },

    /// Intercept plus weighted sum over named numeric feature columns.
    Linear {
        intercept: f64,
        weights: BTreeMap<String, f64>,
    },

    /// Ensemble of decision trees over named numeric feature columns.
    TreeEnsemble {
        trees: Vec<TreeNode>,
        aggregate: Aggregate,
    },
}

impl PredictorSpec {
    /// Instantiate the evaluator this spec describes.
    pub fn into_predictor(self) -> Box<dyn Predictor> {
        match self {
            PredictorSpec::Constant { value } => Box::new(ConstantModel { value }),
            PredictorSpec::Linear { intercept, weights } => {
                Box::new(LinearModel { intercept, weights })
            }
            PredictorSpec::TreeEnsemble { trees, aggregate } => {
                Box::new(TreeEnsembleModel { trees, aggregate })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluators
// ---------------------------------------------------------------------------

struct ConstantModel {
    value: ScalarValue,
}

impl Predictor for ConstantModel {
    fn kind(&self) -> &'static str {
        "constant"
    }

    fn predict(&self, input: &RowTable) -> Result<Vec<CellValue>, PredictionError> {
        Ok(vec![self.value.to_cell(); input.len()])
    }
}

struct LinearModel {
    intercept: f64,
    weights: BTreeMap<String, f64>,
}

impl Predictor for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, input: &RowTable) -> Result<Vec<CellValue>, PredictionError> {
        // Resolve weight columns once; a weight naming an absent column is a
        // model/input mismatch, not a missing value.
        let mut terms = Vec::with_capacity(self.weights.len());
        for (name, weight) in &self.weights {
            let idx = input.column_index(name).ok_or_else(|| {
                PredictionError::Predictor(format!("weight column {name:?} absent from input"))
            })?;
            terms.push((idx, *weight));
        }

        Ok(input
            .rows()
            .iter()
            .map(|row| {
                // Missing numerics contribute nothing to the sum.
                let sum: f64 = terms
                    .iter()
                    .map(|&(idx, w)| row[idx].as_f64().unwrap_or(0.0) * w)
                    .sum();
                CellValue::Float(self.intercept + sum)
            })
            .collect())
    }
}

struct TreeEnsembleModel {
    trees: Vec<TreeNode>,
    aggregate: Aggregate,
}

impl TreeEnsembleModel {
    fn eval_tree<'a>(
        node: &'a TreeNode,
        input: &RowTable,
        row: usize,
    ) -> Result<&'a ScalarValue, PredictionError> {
        match node {
            TreeNode::Leaf { value } => Ok(value),
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let idx = input.column_index(feature).ok_or_else(|| {
                    PredictionError::Predictor(format!(
                        "split feature {feature:?} absent from input"
                    ))
                })?;
                // Missing / non-numeric cells compare as NaN and route right.
                let value = input.rows()[row][idx].as_f64().unwrap_or(f64::NAN);
                if value <= *threshold {
                    Self::eval_tree(left, input, row)
                } else {
                    Self::eval_tree(right, input, row)
                }
            }
        }
    }

    fn predict_row(&self, input: &RowTable, row: usize) -> Result<CellValue, PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::Predictor("ensemble has no trees".into()));
        }

        match self.aggregate {
            Aggregate::Mean => {
                let mut sum = 0.0;
                for tree in &self.trees {
                    let leaf = Self::eval_tree(tree, input, row)?;
                    match leaf {
                        ScalarValue::Number(n) => sum += n,
                        ScalarValue::Label(l) => {
                            return Err(PredictionError::Predictor(format!(
                                "non-numeric leaf {l:?} under mean aggregation"
                            )));
                        }
                    }
                }
                Ok(CellValue::Float(sum / self.trees.len() as f64))
            }
            Aggregate::Majority => {
                let mut votes: BTreeMap<CellValue, usize> = BTreeMap::new();
                for tree in &self.trees {
                    let leaf = Self::eval_tree(tree, input, row)?.to_cell();
                    *votes.entry(leaf).or_default() += 1;
                }
                // Strictly-greater keeps the first (smallest) label on ties.
                let mut best: Option<(&CellValue, usize)> = None;
                for (cell, &n) in &votes {
                    if best.map_or(true, |(_, bn)| n > bn) {
                        best = Some((cell, n));
                    }
                }
                match best {
                    Some((cell, _)) => Ok(cell.clone()),
                    None => Err(PredictionError::Predictor("ensemble has no trees".into())),
                }
            }
        }
    }
}

impl Predictor for TreeEnsembleModel {
    fn kind(&self) -> &'static str {
        "tree ensemble"
    }

    fn predict(&self, input: &RowTable) -> Result<Vec<CellValue>, PredictionError> {
        (0..input.len())
            .map(|row| self.predict_row(input, row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RowTable {
        let mut t = RowTable::new(vec!["ShipDays".into(), "Quantity".into()]);
        t.push_row(vec![CellValue::Integer(2), CellValue::Integer(1)]);
        t.push_row(vec![CellValue::Float(6.0), CellValue::Integer(3)]);
        t.push_row(vec![CellValue::Null, CellValue::Integer(5)]);
        t
    }

    fn spec(json: &str) -> Box<dyn Predictor> {
        serde_json::from_str::<PredictorSpec>(json)
            .unwrap()
            .into_predictor()
    }

    #[test]
    fn constant_repeats_per_row() {
        let model = spec(r#"{ "kind": "constant", "value": "Consumer" }"#);
        let out = model.predict(&input()).unwrap();
        assert_eq!(out, vec![CellValue::String("Consumer".into()); 3]);
    }

    #[test]
    fn linear_combines_numeric_features() {
        let model = spec(
            r#"{ "kind": "linear", "intercept": 1.0,
                 "weights": { "ShipDays": 2.0, "Quantity": 10.0 } }"#,
        );
        let out = model.predict(&input()).unwrap();
        // Null ShipDays contributes 0 in the last row.
        assert_eq!(
            out,
            vec![
                CellValue::Float(15.0),
                CellValue::Float(43.0),
                CellValue::Float(51.0)
            ]
        );
    }

    #[test]
    fn linear_missing_weight_column_fails() {
        let model = spec(r#"{ "kind": "linear", "intercept": 0.0, "weights": { "Ghost": 1.0 } }"#);
        let err = model.predict(&input()).unwrap_err();
        assert!(matches!(err, PredictionError::Predictor(_)));
    }

    #[test]
    fn tree_routes_missing_values_right() {
        let model = spec(
            r#"{ "kind": "tree_ensemble", "aggregate": "majority", "trees": [
                   { "feature": "ShipDays", "threshold": 4.0,
                     "left":  { "value": "Fast" },
                     "right": { "value": "Slow" } } ] }"#,
        );
        let out = model.predict(&input()).unwrap();
        assert_eq!(
            out,
            vec![
                CellValue::String("Fast".into()),
                CellValue::String("Slow".into()),
                CellValue::String("Slow".into())
            ]
        );
    }

    #[test]
    fn majority_vote_breaks_ties_by_label_order() {
        let model = spec(
            r#"{ "kind": "tree_ensemble", "aggregate": "majority", "trees": [
                   { "value": "Corporate" },
                   { "value": "Consumer" } ] }"#,
        );
        let out = model.predict(&input()).unwrap();
        assert_eq!(out[0], CellValue::String("Consumer".into()));
    }

    #[test]
    fn mean_averages_leaf_numbers() {
        let model = spec(
            r#"{ "kind": "tree_ensemble", "aggregate": "mean", "trees": [
                   { "value": 10.0 },
                   { "feature": "Quantity", "threshold": 2.0,
                     "left":  { "value": 0.0 },
                     "right": { "value": 20.0 } } ] }"#,
        );
        let out = model.predict(&input()).unwrap();
        assert_eq!(
            out,
            vec![
                CellValue::Float(5.0),
                CellValue::Float(15.0),
                CellValue::Float(15.0)
            ]
        );
    }

    #[test]
    fn mean_rejects_label_leaves_and_empty_ensembles() {
        let labeled = spec(
            r#"{ "kind": "tree_ensemble", "aggregate": "mean",
                 "trees": [ { "value": "Consumer" } ] }"#,
        );
        assert!(labeled.predict(&input()).is_err());

        let empty = spec(r#"{ "kind": "tree_ensemble", "aggregate": "mean", "trees": [] }"#);
        assert!(empty.predict(&input()).is_err());
    }
}
