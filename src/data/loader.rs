use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DatasetLoadError;
use super::model::{CellValue, RowTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – delimited text with a header row; decoded as UTF-8 with an
///   automatic Latin-1 fallback (the Superstore exports in the wild are
///   Latin-1)
/// * `.parquet` – flat scalar columns, one record per row
pub fn load_dataset(path: &Path) -> Result<RowTable, DatasetLoadError> {
    if !path.exists() {
        return Err(DatasetLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DatasetLoadError::UnsupportedExtension(other.to_string())),
    };

    info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row. Cell types
/// are guessed per value; empty fields become missing cells.
fn load_csv(path: &Path) -> Result<RowTable, DatasetLoadError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_text(&bytes);

    let parse_err = |message: String| DatasetLoadError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_err(format!("header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RowTable::new(headers);
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| parse_err(format!("row {row_no}: {e}")))?;
        table.push_row(record.iter().map(guess_cell).collect());
    }

    Ok(table)
}

/// Decode file bytes as UTF-8 when valid, otherwise as Latin-1.  Latin-1
/// maps every byte to the code point of the same value, so the fallback
/// cannot fail.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Guess a cell's type from its text.
fn guess_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if let Some(d) = parse_date(s) {
        return CellValue::Date(d);
    }
    CellValue::String(s.to_string())
}

/// Date shapes seen in Superstore exports.  US month-first is tried before
/// day-first because that is what the canonical dataset ships with.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.  Column order follows the
/// file schema; every cell is a scalar (strings, ints, floats, dates).
fn load_parquet(path: &Path) -> Result<RowTable, DatasetLoadError> {
    let parse_err = |message: String| DatasetLoadError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| parse_err(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| parse_err(format!("building parquet reader: {e}")))?;

    let mut table: Option<RowTable> = None;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| parse_err(format!("reading record batch: {e}")))?;
        let schema = batch.schema();

        let table = table.get_or_insert_with(|| {
            RowTable::new(schema.fields().iter().map(|f| f.name().clone()).collect())
        });

        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| extract_cell(batch.column(col), row))
                .collect();
            table.push_row(cells);
        }
    }

    // A parquet file with zero row groups still carries a schema; treat the
    // fully empty file as unparsable rather than guessing columns.
    table.ok_or_else(|| parse_err("file contains no record batches".to_string()))
}

/// Extract a single scalar from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            guess_cell(arr.value(row))
        }
        DataType::LargeUtf8 => {
            let arr = col.as_any().downcast_ref::<LargeStringArray>().unwrap();
            guess_cell(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::String(arr.value(row).to_string())
        }
        DataType::Date32 => {
            let arr = col.as_any().downcast_ref::<Date32Array>().unwrap();
            let days = arr.value(row) as i64;
            NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days)))
                .map(CellValue::Date)
                .unwrap_or(CellValue::Null)
        }
        other => CellValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn guess_cell_types() {
        assert_eq!(guess_cell(""), CellValue::Null);
        assert_eq!(guess_cell("  "), CellValue::Null);
        assert_eq!(guess_cell("42"), CellValue::Integer(42));
        assert_eq!(guess_cell("3.5"), CellValue::Float(3.5));
        assert_eq!(
            guess_cell("2023-01-05"),
            CellValue::Date(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
        assert_eq!(guess_cell("Consumer"), CellValue::String("Consumer".into()));
    }

    #[test]
    fn parse_date_formats() {
        let d = NaiveDate::from_ymd_opt(2016, 11, 8).unwrap();
        assert_eq!(parse_date("2016-11-08"), Some(d));
        assert_eq!(parse_date("11/08/2016"), Some(d));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        // 0xE9 is é in Latin-1 and invalid as a standalone UTF-8 byte.
        let bytes = b"Caf\xe9";
        assert_eq!(decode_text(bytes), "Café");
        assert_eq!(decode_text("Café".as_bytes()), "Café");
    }

    #[test]
    fn load_csv_with_latin1_cells() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(b"City,Sales\nQu\xe9bec,12.5\n").unwrap();

        let table = load_dataset(file.path()).unwrap();
        assert_eq!(table.columns(), &["City", "Sales"]);
        assert_eq!(table.rows()[0][0], CellValue::String("Québec".into()));
        assert_eq!(table.rows()[0][1], CellValue::Float(12.5));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_dataset(Path::new("/no/such/dataset.csv")).unwrap_err();
        assert!(matches!(err, DatasetLoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DatasetLoadError::UnsupportedExtension(e) if e == "xlsx"));
    }
}
