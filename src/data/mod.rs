/// Data layer: core types, loading, filtering and derived views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode (UTF-8 → Latin-1) + parse → FilmDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ FilmDataset  │  Vec<FilmRecord>, distinct genres / languages
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  genre + language selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  describe, top-N, per-date groupings, histogram
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod stats;
