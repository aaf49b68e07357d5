use std::collections::BTreeSet;

use super::model::RowTable;

// ---------------------------------------------------------------------------
// Feature selection: strip the columns a model must not see
// ---------------------------------------------------------------------------

/// Derive the exact input column set a model expects: every column named in
/// `drop_cols` is removed, then the target column itself. Names that are not
/// present in the table are ignored. Surviving columns keep the enriched
/// table's order.
///
/// This is a pure function with no hidden state: the UI calls it once to
/// display the input columns and once right before prediction, and both
/// calls must agree exactly.
pub fn select_inputs(
    enriched: &RowTable,
    drop_cols: &BTreeSet<String>,
    target_col: &str,
) -> RowTable {
    let mut remove = drop_cols.clone();
    remove.insert(target_col.to_string());
    enriched.without_columns(&remove)
}

#[cfg(test)]
mod tests {
    use crate::data::model::CellValue;

    use super::*;

    fn segments() -> RowTable {
        let mut t = RowTable::new(vec![
            "Row ID".into(),
            "Segment".into(),
            "Sales".into(),
            "ShipDays".into(),
        ]);
        t.push_row(vec![
            CellValue::Integer(1),
            CellValue::String("Consumer".into()),
            CellValue::Float(10.0),
            CellValue::Integer(4),
        ]);
        t
    }

    #[test]
    fn drops_configured_and_target_columns() {
        let drop: BTreeSet<String> = ["Row ID".to_string()].into();
        let input = select_inputs(&segments(), &drop, "Segment");
        assert_eq!(input.columns(), &["Sales", "ShipDays"]);
    }

    #[test]
    fn absent_names_are_silently_ignored() {
        let drop: BTreeSet<String> = ["Row ID".to_string(), "Ghost".to_string()].into();
        let input = select_inputs(&segments(), &drop, "AlsoGhost");
        assert_eq!(input.columns(), &["Segment", "Sales", "ShipDays"]);
    }

    #[test]
    fn empty_drop_set_removes_exactly_the_target() {
        let input = select_inputs(&segments(), &BTreeSet::new(), "Segment");
        assert_eq!(input.columns(), &["Row ID", "Sales", "ShipDays"]);
    }

    #[test]
    fn selection_is_idempotent() {
        let drop: BTreeSet<String> = ["Row ID".to_string()].into();
        let first = select_inputs(&segments(), &drop, "Segment");
        let second = select_inputs(&segments(), &drop, "Segment");
        assert_eq!(first.columns(), second.columns());
        assert_eq!(first.rows(), second.rows());
    }
}
