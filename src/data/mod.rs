//! Data layer: record types, loading, linking and filtering.
//!
//! Architecture:
//! ```text
//!  neos.csv        cad.json
//!     │               │
//!     ▼               ▼
//!   ┌───────────────────┐
//!   │      loader       │  parse files → Vec<NearEarthObject>, Vec<CloseApproach>
//!   └───────────────────┘
//!            │
//!            ▼
//!   ┌───────────────────┐
//!   │    NeoDatabase    │  link approaches ↔ objects, designation/name indexes
//!   └───────────────────┘
//!            │
//!            ▼
//!   ┌───────────────────┐
//!   │      filter       │  AND of approach predicates → lazy query results
//!   └───────────────────┘
//! ```

pub mod database;
pub mod filter;
pub mod loader;
pub mod model;
