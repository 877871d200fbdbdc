// src/gui/pages/mod.rs
use std::sync::Arc;

use eframe::egui;

use crate::{
    collect::Sources,
    config::options::{PageKind, SourceOptions},
    emendas::EmendaRecord,
    engine::Table,
    gui::app::App,
    progress::Progress,
    specs::geojson::FeatureCollection,
    store::DataSet,
};

pub mod camara;
pub mod emendas;
pub mod mapa;
pub mod senado;

/// What a page's worker sends back to the UI thread.
pub enum Fetched {
    Table(Table),
    /// The source answered nothing usable; the page shows a notice instead.
    MissingTable(String),
    Map {
        records: Arc<Vec<EmendaRecord>>,
        polygons: Option<Arc<FeatureCollection>>,
    },
    Failed(String),
}

pub trait Page: Send + Sync + 'static {
    fn kind(&self) -> PageKind;

    fn title(&self) -> &'static str {
        self.kind().label()
    }

    /// Column labels of the page's table, when fixed.
    fn columns(&self) -> Option<Vec<&'static str>> {
        None
    }

    /// Display indices drawn centered (numbers, dates).
    fn numeric_columns(&self) -> &'static [usize] {
        &[]
    }

    /// Has the Tipo/Situação filter.
    fn filterable(&self) -> bool {
        false
    }

    /// Runs on the worker thread.
    fn fetch(
        &self,
        sources: &Sources,
        opts: &SourceOptions,
        progress: Option<&mut dyn Progress>,
    ) -> Fetched;

    /// Page-specific controls above the table.
    fn draw_controls(&self, _ui: &mut egui::Ui, _app: &mut App) {}

    /// A snapshot is usable when its header matches the page's columns.
    fn validate_cache(&self, ds: &DataSet) -> bool {
        match (self.columns(), ds.headers.as_ref()) {
            (Some(expected), Some(h)) => h.len() == expected.len() && h.iter().zip(&expected).all(|(a, b)| a == b),
            (None, Some(h)) => !h.is_empty(),
            (_, None) => false,
        }
    }
}
