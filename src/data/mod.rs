/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  vehicles_us.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset   (cached per source in DatasetCache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Listing>, immutable, shared as Arc
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range ∧ manufacturer ∧ model year → FilteredView
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
