//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → raw table → normalized RestaurantDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────────┐
//!   │ RestaurantDataset │  Vec<Restaurant>, schema, global bounds
//!   └───────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec predicates → filtered indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  engine   │  option sets, KPIs, map data, histograms, top-N
//!   └──────────┘
//! ```

pub mod engine;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
