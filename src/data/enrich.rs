use chrono::{Datelike, NaiveDate};
use log::info;

use super::error::{DataQualityError, EnrichError, SchemaError};
use super::loader::parse_date;
use super::model::{median, CellValue, RowTable};

// ---------------------------------------------------------------------------
// Feature engineering: temporal features derived from the order/ship dates
// ---------------------------------------------------------------------------

/// Column holding the order timestamp.
pub const ORDER_DATE: &str = "Order Date";
/// Column holding the ship timestamp.
pub const SHIP_DATE: &str = "Ship Date";

/// Derived: calendar year of the order.
pub const ORDER_YEAR: &str = "OrderYear";
/// Derived: calendar month of the order.
pub const ORDER_MONTH: &str = "OrderMonth";
/// Derived: whole days between order and shipment.
pub const SHIP_DAYS: &str = "ShipDays";

/// Append `OrderYear`, `OrderMonth` and `ShipDays` to a copy of `raw`.
///
/// Cells that fail to parse as dates count as missing; no row is dropped.
/// Missing `ShipDays` are filled with the median of the parsable ones,
/// recomputed from this table on every call. Existing columns and cells are
/// never touched, only the three derived columns are appended (in that
/// order).
pub fn enrich(raw: &RowTable) -> Result<RowTable, EnrichError> {
    let (order_idx, ship_idx) = match (raw.column_index(ORDER_DATE), raw.column_index(SHIP_DATE)) {
        (Some(o), Some(s)) => (o, s),
        (o, s) => {
            let mut missing = Vec::new();
            if o.is_none() {
                missing.push(ORDER_DATE.to_string());
            }
            if s.is_none() {
                missing.push(SHIP_DATE.to_string());
            }
            return Err(SchemaError { missing }.into());
        }
    };

    let order_dates: Vec<Option<NaiveDate>> = raw
        .rows()
        .iter()
        .map(|row| coerce_date(&row[order_idx]))
        .collect();
    let ship_dates: Vec<Option<NaiveDate>> = raw
        .rows()
        .iter()
        .map(|row| coerce_date(&row[ship_idx]))
        .collect();

    let order_year: Vec<CellValue> = order_dates
        .iter()
        .map(|d| match d {
            Some(d) => CellValue::Integer(d.year() as i64),
            None => CellValue::Null,
        })
        .collect();
    let order_month: Vec<CellValue> = order_dates
        .iter()
        .map(|d| match d {
            Some(d) => CellValue::Integer(d.month() as i64),
            None => CellValue::Null,
        })
        .collect();

    let ship_days: Vec<Option<i64>> = order_dates
        .iter()
        .zip(&ship_dates)
        .map(|pair| match pair {
            (Some(order), Some(ship)) => Some((*ship - *order).num_days()),
            _ => None,
        })
        .collect();

    let n_missing = ship_days.iter().filter(|d| d.is_none()).count();
    let ship_days_cells: Vec<CellValue> = if n_missing > 0 {
        let mut known: Vec<f64> = ship_days.iter().flatten().map(|&d| d as f64).collect();
        if known.is_empty() {
            return Err(DataQualityError {
                column: SHIP_DAYS.to_string(),
            }
            .into());
        }
        let fill = median(&mut known);
        info!("filling {n_missing} missing {SHIP_DAYS} values with median {fill}");
        ship_days
            .into_iter()
            .map(|d| match d {
                Some(d) => CellValue::Integer(d),
                None => CellValue::Float(fill),
            })
            .collect()
    } else {
        ship_days
            .into_iter()
            // every element is Some here
            .flatten()
            .map(CellValue::Integer)
            .collect()
    };

    let mut enriched = raw.clone();
    enriched.append_column(ORDER_YEAR, order_year);
    enriched.append_column(ORDER_MONTH, order_month);
    enriched.append_column(SHIP_DAYS, ship_days_cells);
    Ok(enriched)
}

/// Interpret a cell as a calendar date; anything unparsable is missing.
fn coerce_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::String(s) => parse_date(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CellValue {
        CellValue::Date(parse_date(s).unwrap())
    }

    /// Three orders: 5-day shipment, 2-day shipment, one missing ship date.
    fn sample() -> RowTable {
        let mut t = RowTable::new(vec![
            "Row ID".into(),
            ORDER_DATE.into(),
            SHIP_DATE.into(),
            "Sales".into(),
        ]);
        t.push_row(vec![
            CellValue::Integer(1),
            date("2023-01-05"),
            date("2023-01-10"),
            CellValue::Float(100.0),
        ]);
        t.push_row(vec![
            CellValue::Integer(2),
            date("2023-02-01"),
            date("2023-02-03"),
            CellValue::Float(250.0),
        ]);
        t.push_row(vec![
            CellValue::Integer(3),
            date("2023-03-15"),
            CellValue::Null,
            CellValue::Float(80.0),
        ]);
        t
    }

    #[test]
    fn appends_three_columns_in_order() {
        let raw = sample();
        let enriched = enrich(&raw).unwrap();

        assert_eq!(enriched.len(), raw.len());
        assert_eq!(
            enriched.columns(),
            &["Row ID", ORDER_DATE, SHIP_DATE, "Sales", ORDER_YEAR, ORDER_MONTH, SHIP_DAYS]
        );
        // Existing cells are untouched, including the raw date columns.
        for (raw_row, out_row) in raw.rows().iter().zip(enriched.rows()) {
            assert_eq!(raw_row.as_slice(), &out_row[..raw_row.len()]);
        }
    }

    #[test]
    fn derives_year_month_and_ship_days() {
        let enriched = enrich(&sample()).unwrap();

        let years: Vec<_> = enriched.column(ORDER_YEAR).unwrap().cloned().collect();
        let months: Vec<_> = enriched.column(ORDER_MONTH).unwrap().cloned().collect();
        assert_eq!(years, vec![CellValue::Integer(2023); 3]);
        assert_eq!(
            months,
            vec![
                CellValue::Integer(1),
                CellValue::Integer(2),
                CellValue::Integer(3)
            ]
        );
    }

    #[test]
    fn missing_ship_days_filled_with_median() {
        let enriched = enrich(&sample()).unwrap();

        let days: Vec<_> = enriched.column(SHIP_DAYS).unwrap().cloned().collect();
        // median(5, 2) = 3.5
        assert_eq!(
            days,
            vec![
                CellValue::Integer(5),
                CellValue::Integer(2),
                CellValue::Float(3.5)
            ]
        );
    }

    #[test]
    fn unparsable_text_dates_coerce_to_missing() {
        let mut t = RowTable::new(vec![ORDER_DATE.into(), SHIP_DATE.into()]);
        t.push_row(vec![
            CellValue::String("01/05/2023".into()),
            CellValue::String("01/10/2023".into()),
        ]);
        t.push_row(vec![
            CellValue::String("garbage".into()),
            CellValue::String("01/12/2023".into()),
        ]);

        let enriched = enrich(&t).unwrap();
        let days: Vec<_> = enriched.column(SHIP_DAYS).unwrap().cloned().collect();
        // Row 1 computes 5 days; row 2 falls back to the median of {5}.
        assert_eq!(days, vec![CellValue::Integer(5), CellValue::Float(5.0)]);
        let years: Vec<_> = enriched.column(ORDER_YEAR).unwrap().cloned().collect();
        assert_eq!(years[1], CellValue::Null);
    }

    #[test]
    fn missing_columns_fail_with_schema_error() {
        let mut t = RowTable::new(vec![ORDER_DATE.into(), "Sales".into()]);
        t.push_row(vec![date("2023-01-05"), CellValue::Float(1.0)]);

        let err = enrich(&t).unwrap_err();
        match err {
            EnrichError::Schema(schema) => {
                assert_eq!(schema.missing, vec![SHIP_DATE.to_string()]);
                assert!(schema.to_string().contains("Ship Date"));
            }
            other => panic!("expected SchemaError, got {other}"),
        }
    }

    #[test]
    fn all_ship_days_missing_is_a_data_quality_error() {
        let mut t = RowTable::new(vec![ORDER_DATE.into(), SHIP_DATE.into()]);
        t.push_row(vec![date("2023-01-05"), CellValue::Null]);
        t.push_row(vec![CellValue::Null, date("2023-01-10")]);

        let err = enrich(&t).unwrap_err();
        assert!(matches!(err, EnrichError::Quality(_)));
    }
}
