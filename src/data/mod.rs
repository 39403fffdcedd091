/// Data layer: raw columns, loading, and the fit input.
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
///   │ Dataset   │  named numeric columns, one length
///   └──────────┘
///        │  chosen records + column selection
///        ▼
///   ┌──────────┐
///   │ FitData   │  x, xerr, y, yerr
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
