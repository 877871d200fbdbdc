// src/gui/actions/fetch.rs
use std::sync::Arc;

use crate::{
    gui::app::{App, Message},
    gui::progress::GuiProgress,
    specs::github,
};

/// Run the current page's fetch on a worker thread. One fetch at a time;
/// the result comes back through the app's channel.
pub fn fetch(app: &mut App, force: bool) {
    if let Some(kind) = app.running {
        app.status(format!("Aguarde: consulta de {} em andamento", kind.label()));
        return;
    }

    let page = app.current_page();
    let kind = page.kind();
    if force {
        app.sources.refresh();
    }
    logf!("Fetch: Begin page={:?} force={}", kind, force);

    let sources = Arc::clone(&app.sources);
    let opts = app.state.options.sources.clone();
    let tx = app.sender();
    let ctx = app.egui_ctx.clone();
    let mut prog = GuiProgress::new(app.status.clone(), ctx.clone());

    app.running = Some(kind);
    app.status(format!("Consultando {}…", kind.label()));

    std::thread::spawn(move || {
        let result = page.fetch(&sources, &opts, Some(&mut prog));
        if tx.send(Message::Fetched { kind, result, at: github::now_brasilia() }).is_err() {
            loge!("Fetch: UI gone before {:?} finished", kind);
        }
        ctx.request_repaint();
    });
}
