// src/gui/pages/camara.rs
use eframe::egui;

use crate::{
    collect::Sources,
    config::options::{PageKind, SourceOptions},
    gui::{app::App, components::filter_panel},
    progress::Progress,
    specs::camara::PROJECTION,
};

use super::{Fetched, Page};

pub struct CamaraPage;
pub static PAGE: CamaraPage = CamaraPage;

impl Page for CamaraPage {
    fn kind(&self) -> PageKind { PageKind::Camara }

    fn columns(&self) -> Option<Vec<&'static str>> {
        Some(PROJECTION.columns.iter().map(|c| c.label).collect())
    }

    // Número, Ano, Data e Hora
    fn numeric_columns(&self) -> &'static [usize] { &[1, 2, 5] }

    fn filterable(&self) -> bool { true }

    fn fetch(&self, sources: &Sources, opts: &SourceOptions, progress: Option<&mut dyn Progress>) -> Fetched {
        match sources.camara(opts, progress) {
            None => Fetched::Failed(s!("A Câmara não respondeu à consulta; tente novamente mais tarde.")),
            Some(table) if table.columns.is_empty() => {
                Fetched::MissingTable(s!("Nenhuma proposição encontrada na Câmara para o período."))
            }
            Some(table) => Fetched::Table(table),
        }
    }

    fn draw_controls(&self, ui: &mut egui::Ui, app: &mut App) {
        let q = &app.state.options.sources.camara;
        let end = q.end.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_else(|| s!("hoje"));
        ui.label(format!(
            "Proposições apresentadas de {} a {}, palavras-chave: {}",
            q.start.format("%d/%m/%Y"), end, q.keywords.join(", ")
        ));
        filter_panel::draw(ui, app, PageKind::Camara);
    }
}
