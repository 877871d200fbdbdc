// src/engine/engine.rs
use serde_json::Value as Json;

use super::table::{Column, Table, Value};
use super::types::{Enricher, ListingSpec, Projection, Record};
use crate::core::net::{Request, Transport};
use crate::progress::Progress;

/// Result of walking a paginated listing.
#[derive(Clone, Debug, Default)]
pub struct PageWalk {
    pub items: Vec<Record>,
    /// Requests actually issued, including the terminating empty page.
    pub requests: usize,
    /// False when the walk stopped on an error instead of an empty page.
    pub complete: bool,
}

/// Request page 1, 2, … until a page has no items. A failed request or an
/// unreadable body stops the walk; items gathered so far are kept.
pub fn fetch_all_pages(
    transport: &dyn Transport,
    spec: &ListingSpec,
    query: &[(String, String)],
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> PageWalk {
    let mut walk = PageWalk::default();
    let mut page: u32 = 1;

    loop {
        let mut req = Request::get(&spec.url).bearer(spec.bearer.as_deref());
        req.query.extend(query.iter().cloned());
        req = req
            .query(spec.size_param, spec.page_size)
            .query(spec.page_param, page);

        walk.requests += 1;
        let items = match transport.get(&req).and_then(|r| r.require_ok(&req)) {
            Ok(resp) => match page_items(&resp.body, spec.items_key) {
                Some(items) => items,
                None => {
                    loge!("Listing: unreadable page {page} from {}", spec.url);
                    break;
                }
            },
            Err(e) => {
                loge!("Listing: request for page {page} failed: {e}");
                break;
            }
        };

        if items.is_empty() {
            walk.complete = true;
            break;
        }

        logd!("Listing: page {page} → {} item(s)", items.len());
        walk.items.extend(items);
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&format!("página {page}"));
        }
        page += 1;
    }

    logf!(
        "Listing: {} item(s) in {} request(s) from {}{}",
        walk.items.len(), walk.requests, spec.url,
        if walk.complete { "" } else { " (partial)" }
    );
    walk
}

fn page_items(body: &str, items_key: &str) -> Option<Vec<Record>> {
    let doc: Json = serde_json::from_str(body).ok()?;
    let arr = doc.get(items_key)?.as_array()?;
    Some(arr.iter().filter_map(|v| v.as_object().cloned()).collect())
}

/// Identifier of a record under `id_key`, rendered as text. Empty ids count as absent.
pub fn record_id(record: &Record, id_key: &str) -> Option<String> {
    match record.get(id_key)? {
        Json::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Run every enricher against every record that has an id. Sequential,
/// no rate limiting; a failing sub-resource never stops the loop.
pub fn enrich_all(
    transport: &dyn Transport,
    records: &mut [Record],
    id_key: &str,
    enrichers: &[&dyn Enricher],
    mut progress: Option<&mut (dyn Progress + '_)>,
) {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(records.len());
    }

    for record in records.iter_mut() {
        let Some(id) = record_id(record, id_key) else {
            logd!("Enrich: record without {id_key:?}, skipped");
            continue;
        };
        let mut all_ok = true;
        for enricher in enrichers {
            if !enricher.enrich(transport, &id, record) {
                loge!("Enrich: {} failed for {id}", enricher.name());
                all_ok = false;
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            if all_ok { p.item_done(&id) } else { p.item_failed(&id) }
        }
    }
}

/// Select, rename, coerce and sort. Empty input gives a schema-less table.
pub fn project(records: &[Record], projection: &Projection) -> Table {
    if records.is_empty() {
        logf!("Projection: no records to project");
        return Table::empty();
    }

    let columns: Vec<Column> = projection.columns.iter()
        .map(|c| Column { key: s!(c.key), label: s!(c.label), kind: c.kind })
        .collect();

    let rows = records.iter()
        .map(|rec| {
            projection.columns.iter()
                .map(|c| Value::coerce(rec.get(c.key), c.kind))
                .collect()
        })
        .collect();

    let mut table = Table { columns, rows };
    if let Some(label) = projection.sort_by {
        table.sort_by(label, projection.descending);
    }
    table
}
