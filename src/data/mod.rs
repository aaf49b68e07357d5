/// Data layer: core types, loading, feature engineering, and selection.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RowTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  enrich   │  append OrderYear / OrderMonth / ShipDays
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  strip drop_cols + target → model input table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  prediction table → .csv download
///   └──────────┘
/// ```
pub mod enrich;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod select;
