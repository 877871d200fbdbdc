// src/config/state.rs
use super::options::AppOptions;
use crate::choropleth::Metric;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Active tab index into router::PAGES
    pub current_page_index: usize,

    /// "Filtrar o resultado" toggles, one per proposition page
    pub filter_camara: bool,
    pub filter_senado: bool,

    /// Map page
    pub map_metric: Metric,
    pub map_clip: bool,
    pub map_frame: usize,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1200,
            window_h: 760,
            current_page_index: 0,
            filter_camara: false,
            filter_senado: false,
            map_metric: Metric::MovimentacaoLiquida,
            map_clip: true,
            map_frame: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
