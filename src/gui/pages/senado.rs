// src/gui/pages/senado.rs
use eframe::egui;

use crate::{
    collect::Sources,
    config::options::{PageKind, SourceOptions},
    gui::{app::App, components::filter_panel},
    progress::Progress,
    specs::senado::PROJECTION,
};

use super::{Fetched, Page};

pub struct SenadoPage;
pub static PAGE: SenadoPage = SenadoPage;

impl Page for SenadoPage {
    fn kind(&self) -> PageKind { PageKind::Senado }

    fn columns(&self) -> Option<Vec<&'static str>> {
        Some(PROJECTION.columns.iter().map(|c| c.label).collect())
    }

    // Número, Ano, Data
    fn numeric_columns(&self) -> &'static [usize] { &[1, 2, 6] }

    fn filterable(&self) -> bool { true }

    fn fetch(&self, sources: &Sources, opts: &SourceOptions, progress: Option<&mut dyn Progress>) -> Fetched {
        match sources.senado(opts, progress) {
            Some(table) => Fetched::Table(table),
            None => Fetched::MissingTable(s!("O Senado não respondeu à consulta; tente novamente mais tarde.")),
        }
    }

    fn draw_controls(&self, ui: &mut egui::Ui, app: &mut App) {
        let q = &app.state.options.sources.senado;
        ui.label(format!("Matérias de {} com a palavra-chave \"{}\"", q.year, q.keyword));
        filter_panel::draw(ui, app, PageKind::Senado);
    }
}
