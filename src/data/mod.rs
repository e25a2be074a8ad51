/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, column index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  state / range / column predicates → selected rows
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
