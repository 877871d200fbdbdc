// src/gui/pages/mapa.rs
use eframe::egui;

use crate::{
    collect::Sources,
    config::options::{PageKind, SourceOptions},
    gui::{app::App, components::map_view},
    progress::Progress,
};

use super::{Fetched, Page};

pub struct MapaPage;
pub static PAGE: MapaPage = MapaPage;

impl Page for MapaPage {
    fn kind(&self) -> PageKind { PageKind::Mapa }

    fn numeric_columns(&self) -> &'static [usize] { &[0, 1, 3] }

    fn fetch(&self, sources: &Sources, opts: &SourceOptions, mut progress: Option<&mut dyn Progress>) -> Fetched {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Carregando emendas e polígonos…");
        }
        let records = match sources.emendas(opts) {
            Ok(r) => r,
            Err(e) => return Fetched::Failed(format!("Mapa: {e}")),
        };
        let polygons = match sources.geojson(&opts.geojson_url) {
            Ok(fc) => Some(fc),
            Err(e) => {
                loge!("Mapa: GeoJSON unavailable: {e}");
                None
            }
        };
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        Fetched::Map { records, polygons }
    }

    fn draw_controls(&self, ui: &mut egui::Ui, app: &mut App) {
        map_view::draw_controls(ui, app);
    }

    // The map has no snapshot on disk.
    fn validate_cache(&self, _ds: &crate::store::DataSet) -> bool { false }
}
