// src/gui/app.rs
use std::{
    collections::HashMap,
    error::Error,
    sync::{mpsc, Arc, Mutex},
    time::Duration,
};

use eframe::egui;

use crate::{
    choropleth::{self, Choropleth},
    collect::Sources,
    config::{
        options::{AppOptions, PageKind::{self, *}},
        state::{AppState, GuiState},
        Settings,
    },
    emendas::EmendaRecord,
    engine::Table,
    filter::FilterState,
    specs::{geojson::FeatureCollection, github},
    store::{self, DataSet},
};

use super::{
    components,
    pages::{Fetched, Page},
    router,
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    let settings = Settings::load_default().unwrap_or_else(|e| {
        loge!("Settings: {e}; using defaults");
        Settings::default()
    });
    let sources = Sources::http(Duration::from_secs(settings.http_timeout_secs))?;
    let state = AppState {
        options: AppOptions::from_settings(&settings),
        gui: GuiState::default(),
    };

    eframe::run_native(
        "Monitor legislativo RS",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc.egui_ctx.clone(), state, Arc::new(sources))))),
    )?;
    Ok(())
}

/// Worker → UI thread.
pub enum Message {
    Fetched { kind: PageKind, result: Fetched, at: String },
    LastCommit(Option<String>),
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,
    pub sources: Arc<Sources>,
    pub egui_ctx: egui::Context,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // per-page canonical data
    pub tables: HashMap<PageKind, Table>,
    pub snapshots: HashMap<PageKind, DataSet>,
    pub filters: HashMap<PageKind, FilterState>,
    pub notices: HashMap<PageKind, String>,

    // map inputs and the model built from them
    pub map_records: Option<Arc<Vec<EmendaRecord>>>,
    pub polygons: Option<Arc<FeatureCollection>>,
    pub map: Option<Choropleth>,

    // what the table currently shows (filtered)
    pub view: DataSet,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: Option<PageKind>,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,

    pub last_fetch: Option<String>,
    pub last_commit: Option<String>,
}

impl App {
    pub fn new(egui_ctx: egui::Context, state: AppState, sources: Arc<Sources>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut status = s!("Pronto");

        let mut snapshots = HashMap::new();
        for p in router::all_pages() {
            let k = p.kind();
            match store::load_dataset(&k) {
                Ok(ds) if ds.rows.is_empty() => logd!("Cache: {:?} is empty, skipping", k),
                Ok(ds) if p.validate_cache(&ds) => {
                    logf!("Cache: Loaded {:?} (rows={}, headers={})", k, ds.row_count(), ds.header_count());
                    snapshots.insert(k, ds);
                    status = s!("Dados locais carregados");
                }
                Ok(_) => loge!("Cache: Invalid shape for {:?}, ignoring", k),
                Err(e) => logd!("Cache: Missing {:?} ({})", k, e),
            }
        }

        let mut export = state.options.export.clone();
        export.set_default_stem_for_page(Camara);
        let out_path_text = export.out_path().to_string_lossy().into_owned();

        let mut app = Self {
            state,
            sources,
            egui_ctx,
            out_path_text,
            out_path_dirty: false,
            tables: HashMap::new(),
            snapshots,
            filters: HashMap::new(),
            notices: HashMap::new(),
            map_records: None,
            polygons: None,
            map: None,
            view: DataSet::default(),
            status: Arc::new(Mutex::new(status)),
            running: None,
            tx,
            rx,
            last_fetch: None,
            last_commit: None,
        };
        app.state.options.export = export;
        app.spawn_last_commit();
        app.rebuild_view();
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn current_index(&self) -> usize { self.state.gui.current_page_index }

    #[inline]
    pub fn set_current_index(&mut self, idx: usize) { self.state.gui.current_page_index = idx; }

    #[inline]
    pub fn current_page_kind(&self) -> PageKind { self.current_page().kind() }

    #[inline]
    pub fn current_page(&self) -> &'static dyn Page {
        let pages = router::all_pages();
        pages[self.current_index().min(pages.len() - 1)]
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = msg.into();
    }

    pub fn status_text(&self) -> String {
        self.status.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn sender(&self) -> mpsc::Sender<Message> {
        self.tx.clone()
    }

    pub fn filter_enabled(&self, kind: PageKind) -> bool {
        match kind {
            Camara => self.state.gui.filter_camara,
            Senado => self.state.gui.filter_senado,
            _ => false,
        }
    }

    pub fn filter_enabled_mut(&mut self, kind: PageKind) -> Option<&mut bool> {
        match kind {
            Camara => Some(&mut self.state.gui.filter_camara),
            Senado => Some(&mut self.state.gui.filter_senado),
            _ => None,
        }
    }

    /// Rows of the current page before filtering.
    pub fn fetched_rows(&self) -> usize {
        let kind = self.current_page_kind();
        match self.tables.get(&kind) {
            Some(table) => table.len(),
            None => self.snapshots.get(&kind).map_or(self.view.row_count(), DataSet::row_count),
        }
    }

    /// Mirror the export path into the text field unless the user edited it.
    pub fn sync_out_path_text(&mut self) {
        if !self.out_path_dirty {
            self.out_path_text = self.state.options.export.out_path().to_string_lossy().into_owned();
        }
    }

    fn spawn_last_commit(&self) {
        if self.state.options.sources.github_repo.is_none() {
            return;
        }
        let sources = Arc::clone(&self.sources);
        let opts = self.state.options.sources.clone();
        let tx = self.sender();
        let ctx = self.egui_ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(Message::LastCommit(sources.last_commit(&opts)));
            ctx.request_repaint();
        });
    }

    /// Rebuild the on-screen table for the current page from canonical data.
    pub fn rebuild_view(&mut self) {
        let kind = self.current_page_kind();
        self.view = match kind {
            Mapa => self.map.as_ref()
                .map(|m| m.frame_to_dataset(self.state.gui.map_frame))
                .unwrap_or_default(),
            _ => match self.tables.get(&kind) {
                Some(table) if self.current_page().filterable() => {
                    let enabled = self.filter_enabled(kind);
                    self.filters.entry(kind).or_default().apply(table, enabled, None).to_dataset()
                }
                Some(table) => table.to_dataset(),
                None => self.snapshots.get(&kind).cloned().unwrap_or_default(),
            },
        };
    }

    /// Rebuild the choropleth after a metric/clip change or new inputs.
    pub fn rebuild_map(&mut self) {
        let Some(records) = self.map_records.as_ref() else { return };
        let map = choropleth::build(
            records,
            self.state.gui.map_metric,
            self.polygons.as_deref(),
            self.state.gui.map_clip,
        );
        if self.state.gui.map_frame >= map.frames.len() {
            self.state.gui.map_frame = map.frames.len().saturating_sub(1);
        }
        self.map = Some(map);
        if self.current_page_kind() == Mapa {
            self.rebuild_view();
        }
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Message::Fetched { kind, result, at } => self.accept(kind, result, at),
                Message::LastCommit(date) => {
                    logd!("UI: last commit → {:?}", date);
                    self.last_commit = date;
                }
            }
        }
    }

    fn accept(&mut self, kind: PageKind, result: Fetched, at: String) {
        if self.running == Some(kind) {
            self.running = None;
        }
        match result {
            Fetched::Table(table) => {
                logf!("Fetch: OK page={:?}, rows={}", kind, table.len());
                let ds = table.to_dataset();
                match store::save_dataset(&kind, &ds) {
                    Ok(p) => logf!("Cache: Saved {:?} → {}", kind, p.display()),
                    Err(e) => loge!("Cache: Save failed {:?}: {}", kind, e),
                }
                // new data → new distinct values for the filter
                if let Some(f) = self.filters.get_mut(&kind) {
                    f.reset();
                }
                self.notices.remove(&kind);
                self.snapshots.insert(kind, ds);
                self.tables.insert(kind, table);
                self.last_fetch = Some(at);
            }
            Fetched::MissingTable(msg) => {
                logf!("Fetch: no table for {:?}", kind);
                self.tables.remove(&kind);
                self.notices.insert(kind, msg.clone());
                self.status(msg);
            }
            Fetched::Map { records, polygons } => {
                if polygons.is_none() {
                    self.notices.insert(kind, s!("Polígonos indisponíveis; a tabela de regiões segue sem correspondência."));
                } else {
                    self.notices.remove(&kind);
                }
                self.map_records = Some(records);
                self.polygons = polygons;
                self.last_fetch = Some(at);
                self.rebuild_map();
            }
            Fetched::Failed(msg) => {
                loge!("Fetch: Error page={:?}: {}", kind, msg);
                self.status(format!("Erro: {msg}"));
            }
        }
        if kind == self.current_page_kind() {
            self.rebuild_view();
        }
    }

    /// "Última atualização" line under the tables.
    pub fn footer_text(&self) -> String {
        let fetched = self.last_fetch.clone().unwrap_or_else(github::now_brasilia);
        let mut text = format!(
            "A consulta às proposições legislativas é atualizada automaticamente de acordo com as APIs \
             da Câmara dos Deputados e do Senado Federal. A última atualização foi em {fetched}."
        );
        if let Some(commit) = &self.last_commit {
            text.push_str(&format!(
                " A consulta aos valores das emendas individuais é atualizada diariamente. A última consulta foi em {commit}."
            ));
        }
        text
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        if self.running.is_some() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(self.status_text()).strong());
            });
            ui.label(egui::RichText::new(self.footer_text()).small().weak());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::tabs::draw(ui, self);

            ui.separator();

            let page = self.current_page();
            page.draw_controls(ui, self);
            if let Some(notice) = self.notices.get(&page.kind()) {
                ui.colored_label(egui::Color32::from_rgb(0xDC, 0x61, 0x49), notice);
            }

            ui.separator();

            components::export_bar::draw(ui, self);

            ui.separator();

            if page.kind() == Mapa {
                components::map_view::draw(ui, self);
            } else {
                components::data_table::draw(ui, self);
            }
        });
    }
}
