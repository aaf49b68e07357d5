use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a sales CSV carries.
/// Unique-value sets downstream use `BTreeMap` / `BTreeSet`, so `CellValue`
/// must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    /// Missing marker: unparsable or empty source value.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
                Date(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{d}"),
            // Missing cells render (and export) as an empty field.
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric model features.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether this is the missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RowTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// A tabular dataset: ordered column names plus rows of cells.
///
/// Column order is significant (it is the file order, and every transform
/// preserves it). Invariant: each row holds exactly one cell per column.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RowTable {
    /// Empty table with the given column order.
    pub fn new(columns: Vec<String>) -> Self {
        RowTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one row. The caller aligns cells with the column order.
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in load order.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate one column's cells in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Append a new column. `cells` must hold one value per existing row.
    pub fn append_column(&mut self, name: impl Into<String>, cells: Vec<CellValue>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Copy of the table without the named columns; surviving columns keep
    /// their relative order. Names that do not exist are ignored.
    pub fn without_columns(&self, remove: &BTreeSet<String>) -> RowTable {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !remove.contains(*c))
            .map(|(i, _)| i)
            .collect();

        RowTable {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Copy of the table keeping only the listed columns, in list order.
    /// Names that do not exist are skipped.
    pub fn project(&self, names: &[&str]) -> RowTable {
        let keep: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        RowTable {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Sorted set of distinct values in one column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        match self.column(name) {
            Some(cells) => cells.cloned().collect(),
            None => BTreeSet::new(),
        }
    }

    /// Distinct values of one column with their row counts, most frequent
    /// first (ties in value order).
    pub fn value_counts(&self, name: &str) -> Vec<(CellValue, usize)> {
        let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
        if let Some(cells) = self.column(name) {
            for cell in cells {
                *counts.entry(cell.clone()).or_default() += 1;
            }
        }
        let mut out: Vec<(CellValue, usize)> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Descriptive statistics over the numeric cells of one column.
    /// `None` when the column is absent or holds no numeric values.
    pub fn numeric_summary(&self, name: &str) -> Option<ColumnSummary> {
        let values: Vec<f64> = self.column(name)?.filter_map(CellValue::as_f64).collect();
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut sorted = values;
        let med = median(&mut sorted);

        Some(ColumnSummary {
            count,
            mean,
            std,
            min,
            median: med,
            max,
        })
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Median of a non-empty slice; even counts average the two middle values.
/// Sorts in place.
pub(crate) fn median(values: &mut [f64]) -> f64 {
    debug_assert!(!values.is_empty());
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RowTable {
        let mut t = RowTable::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push_row(vec![
            CellValue::Integer(1),
            CellValue::String("x".into()),
            CellValue::Float(0.5),
        ]);
        t.push_row(vec![
            CellValue::Integer(2),
            CellValue::String("x".into()),
            CellValue::Null,
        ]);
        t.push_row(vec![
            CellValue::Integer(3),
            CellValue::String("y".into()),
            CellValue::Float(1.5),
        ]);
        t
    }

    #[test]
    fn append_column_keeps_order() {
        let mut t = table();
        t.append_column("d", vec![CellValue::Null, CellValue::Null, CellValue::Null]);
        assert_eq!(t.columns(), &["a", "b", "c", "d"]);
        assert_eq!(t.rows()[0].len(), 4);
    }

    #[test]
    fn without_columns_preserves_relative_order() {
        let t = table();
        let remove: BTreeSet<String> = ["b".to_string(), "missing".to_string()].into();
        let out = t.without_columns(&remove);
        assert_eq!(out.columns(), &["a", "c"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out.rows()[2][0], CellValue::Integer(3));
    }

    #[test]
    fn project_skips_absent_names() {
        let t = table();
        let out = t.project(&["c", "nope", "a"]);
        assert_eq!(out.columns(), &["c", "a"]);
        assert_eq!(out.rows()[0][1], CellValue::Integer(1));
    }

    #[test]
    fn value_counts_sorted_by_frequency() {
        let t = table();
        let counts = t.value_counts("b");
        assert_eq!(counts[0], (CellValue::String("x".into()), 2));
        assert_eq!(counts[1], (CellValue::String("y".into()), 1));
    }

    #[test]
    fn numeric_summary_skips_non_numeric() {
        let t = table();
        let s = t.numeric_summary("c").unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.min, 0.5);
        assert_eq!(s.max, 1.5);
        assert_eq!(s.median, 1.0);
        assert!(t.numeric_summary("b").is_none());
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&mut [5.0, 2.0]), 3.5);
        assert_eq!(median(&mut [9.0, 1.0, 4.0]), 4.0);
    }
}
