// src/engine/mod.rs
//! Source-agnostic pipeline shared by every page:
//! `fetch_all_pages` → `enrich_all` → `project`.
//! Page-specific knowledge (URLs, keys, defaults) lives in `specs`.

mod engine;
mod table;
mod types;

pub use engine::{enrich_all, fetch_all_pages, project, record_id, PageWalk};
pub use table::{Column, Table, Value};
pub use types::{ColumnKind, ColumnSpec, Enricher, ListingSpec, Projection, Record};
