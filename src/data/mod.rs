/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / term rows, department columns
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ aggregate, insights │  (Year, Term) summary, threshold findings
///   └─────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  recompute(selection) → ViewModel for tables and charts
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod view;
