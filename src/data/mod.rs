/// Data layer: core types, loading, filtering, and export.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → rows of typed cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  trim headers, resolve canonical columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record> + facet indexes, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → view indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  serialize a view back to CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
