/// Data layer: core types, loading, normalization, filtering, and metrics.
///
/// Architecture:
/// ```text
///  inventory .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + flatten nested objects → raw records
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  lower-case columns, coerce vcpu / ram / daily_cost
///   └────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ InventoryTable  │  Vec<InventoryRecord>, column list (immutable)
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → retained row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  daily_cost_inr, totals, top-N, grouped sums
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
