// src/engine/types.rs
use crate::core::net::Transport;

/// One flattened API item; enrichment merges more keys into it.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Paginated listing endpoint.
#[derive(Clone, Debug)]
pub struct ListingSpec {
    pub url: String,
    pub page_param: &'static str,  // e.g., "pagina"
    pub size_param: &'static str,  // e.g., "itens"
    pub page_size: u32,
    pub items_key: &'static str,   // array holding the page items, e.g., "dados"
    pub bearer: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Float,
    DateTime,
    Date,
    Flag,
}

/// Source key → display label, with the coercion applied on projection.
#[derive(Clone, Copy, Debug)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self { key, label, kind }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub columns: &'static [ColumnSpec],
    /// Display label of the sort column.
    pub sort_by: Option<&'static str>,
    pub descending: bool,
}

/// Per-item follow-up request. Implementations never fail: a missing or
/// broken sub-resource is written into the record as a documented default.
/// Returns false when the request itself failed.
pub trait Enricher {
    fn name(&self) -> &'static str;
    fn enrich(&self, transport: &dyn Transport, id: &str, record: &mut Record) -> bool;
}
