/// Data layer: table model, loading, column mapping and time windows.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns, numeric / time-in-seconds access
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  time / pressure / weight selection (auto-detected)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ window    │  [start, end] masks, window means, index ranges
///   └──────────┘
/// ```

pub mod columns;
pub mod downsample;
pub mod loader;
pub mod model;
pub mod time;
pub mod window;
