// src/gui/pages/emendas.rs
use eframe::egui;

use crate::{
    collect::Sources,
    config::options::{PageKind, SourceOptions},
    emendas,
    gui::app::App,
    progress::Progress,
};

use super::{Fetched, Page};

pub struct EmendasPage;
pub static PAGE: EmendasPage = EmendasPage;

const COLUMNS: [&str; 6] = ["Código", "Município", "Data", "Movimentação líquida", "Movimentação acumulada", "Saldo"];

impl Page for EmendasPage {
    fn kind(&self) -> PageKind { PageKind::Emendas }

    fn columns(&self) -> Option<Vec<&'static str>> {
        Some(COLUMNS.to_vec())
    }

    fn numeric_columns(&self) -> &'static [usize] { &[0, 2, 3, 4, 5] }

    fn fetch(&self, sources: &Sources, opts: &SourceOptions, mut progress: Option<&mut dyn Progress>) -> Fetched {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Lendo {}…", opts.emendas_csv.display()));
        }
        let fetched = match sources.emendas(opts) {
            Ok(records) => Fetched::Table(emendas::to_table(&records)),
            Err(e) => Fetched::Failed(format!("Emendas: {e}")),
        };
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        fetched
    }

    fn draw_controls(&self, ui: &mut egui::Ui, app: &mut App) {
        ui.label(format!(
            "Emendas individuais repassadas aos municípios do RS (arquivo: {})",
            app.state.options.sources.emendas_csv.display()
        ));
    }
}
