// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::consts::*;
use super::settings::Settings;
use crate::emendas::EmendasLayout;
use crate::specs::camara::CamaraQuery;
use crate::specs::senado::SenadoQuery;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Camara,
    Senado,
    Emendas,
    Mapa,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [PageKind::Camara, PageKind::Senado, PageKind::Emendas, PageKind::Mapa];

    pub fn label(&self) -> &'static str {
        match self {
            PageKind::Camara => "Câmara",
            PageKind::Senado => "Senado",
            PageKind::Emendas => "Emendas",
            PageKind::Mapa => "Mapa",
        }
    }

    /// File stem used for snapshots and default export names.
    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Camara => "camara",
            PageKind::Senado => "senado",
            PageKind::Emendas => "emendas",
            PageKind::Mapa => "mapa",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    pub camara: CamaraQuery,
    pub senado: SenadoQuery,
    pub emendas_csv: PathBuf,
    pub emendas_layout: EmendasLayout,
    pub geojson_url: String,
    pub camara_token: Option<String>,
    pub github_repo: Option<String>,
    pub github_path: Option<String>,
}

impl SourceOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            camara: settings.camara_query(),
            senado: settings.senado_query(),
            emendas_csv: settings.emendas_csv.clone(),
            emendas_layout: settings.emendas_layout(),
            geojson_url: settings.geojson_url.clone(),
            camara_token: settings.camara_token.clone(),
            github_repo: settings.github_repo.clone(),
            github_path: settings.github_path.clone(),
        }
    }
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>.<ext>`; the extension always follows the format.
    pub fn out_path(&self) -> PathBuf {
        let stem = self.out_path.file_stem.to_string_lossy();
        self.out_path.dir.join(join!(&stem, ".", self.format.ext()))
    }

    /// Parse GUI/CLI text into dir + stem. Ignores pasted extension; format controls it.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }

    /// Point the default file name at the given page.
    pub fn set_default_stem_for_page(&mut self, kind: PageKind) {
        self.out_path.file_stem = OsString::from(kind.slug());
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub sources: SourceOptions,
    pub export: ExportOptions,
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sources: SourceOptions::from_settings(settings),
            export: ExportOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_follows_format() {
        let mut export = ExportOptions::default();
        export.set_path("saida/props.txt");
        assert!(export.out_path().ends_with("props.csv"));
        export.format = ExportFormat::Tsv;
        assert!(export.out_path().ends_with("props.tsv"));
        assert_eq!(export.delim(), '\t');
    }

    #[test]
    fn default_stem_tracks_page() {
        let mut export = ExportOptions::default();
        export.set_default_stem_for_page(PageKind::Senado);
        assert!(export.out_path().ends_with("senado.csv"));
    }
}
