// src/specs/mod.rs
//! # Source "specs"
//!
//! One module per remote source. Each module knows *where the ground truth lives*
//! (endpoint, query parameters, response shape) and *what to write when it is
//! missing* (the documented default strings). The generic walking, enrichment
//! and projection live in `engine`.
//!
//! ## What does **not** live here
//! - Memoization and snapshots (`collect`, `store`).
//! - GUI concerns, filtering or export formatting.
//!
//! ## Typical call chain
//! ```text
//! GUI / CLI → collect::* → specs::<source>::load()
//!                        ↘ engine::{fetch_all_pages, enrich_all, project}
//! ```

pub mod camara;
pub mod geojson;
pub mod github;
pub mod senado;
