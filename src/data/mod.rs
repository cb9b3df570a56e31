/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header + cells → validated RowRecords
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ MetricsDataset  │  Vec<RowRecord> in file order
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection → matching rows → (metric, value) points
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
