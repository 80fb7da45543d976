/// Data layer: row types, loading, aggregation and scales.
///
/// Architecture:
/// ```text
///   IHME prevalence .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PrevalenceDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ PrevalenceDataset │  Vec<PrevalenceRecord>, location index, max mean
///   └───────────────────┘
///        │  + Selection
///        ▼
///   ┌──────────┐
///   │  filter   │  six subsets: local/global × all/children/adults
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  scale    │  magnitude domain, bar categories
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod scale;
