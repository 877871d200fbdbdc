// tests/support/mod.rs
//
// Scripted transport: routes keyed by URL (and optionally by `pagina`),
// every request recorded. Unrouted requests answer 404.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use monitor_legislativo::core::{Request, Response, Transport};
use monitor_legislativo::progress::Progress;
use monitor_legislativo::Result;

struct Route {
    url: String,
    page: Option<String>,
    status: u16,
    body: String,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route { url: url.into(), page: None, status, body: body.into() });
        self
    }

    pub fn on_page(mut self, url: &str, page: u32, status: u16, body: &str) -> Self {
        self.routes.push(Route { url: url.into(), page: Some(page.to_string()), status, body: body.into() });
        self
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|r| r.url == url).count()
    }
}

impl Transport for FakeTransport {
    fn get(&self, req: &Request) -> Result<Response> {
        self.calls.lock().unwrap().push(req.clone());
        let hit = self.routes.iter().find(|r| {
            r.url == req.url && r.page.as_deref().is_none_or(|p| req.param("pagina") == Some(p))
        });
        Ok(match hit {
            Some(r) => Response::new(r.status, r.body.clone()),
            None => Response::new(404, ""),
        })
    }
}

/// Lets a test keep a handle on the fake after boxing it.
pub struct Shared(pub Arc<FakeTransport>);

impl Transport for Shared {
    fn get(&self, req: &Request) -> Result<Response> {
        self.0.get(req)
    }
}

#[derive(Default)]
pub struct CountingProgress {
    pub begun: Vec<usize>,
    pub done: Vec<String>,
    pub failed: Vec<String>,
    pub finished: usize,
}

impl Progress for CountingProgress {
    fn begin(&mut self, total: usize) { self.begun.push(total); }
    fn item_done(&mut self, label: &str) { self.done.push(label.to_string()); }
    fn item_failed(&mut self, label: &str) { self.failed.push(label.to_string()); }
    fn finish(&mut self) { self.finished += 1; }
}

/// `{"dados":[{"id":1}, …]}` with `n` items.
pub fn page_of(n: usize, first_id: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"id":{},"siglaTipo":"PL","numero":{},"ano":2024}}"#, first_id + i, i + 1))
        .collect();
    format!(r#"{{"dados":[{}]}}"#, items.join(","))
}
