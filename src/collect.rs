// src/collect.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::choropleth::{self, Choropleth, Metric};
use crate::config::consts::{CAMARA_API, FETCH_TTL_SECS, SENADO_API};
use crate::config::options::{PageKind, SourceOptions};
use crate::core::{HttpClient, Memo, Transport};
use crate::emendas::{self, EmendaRecord, EmendasLayout};
use crate::engine::Table;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::specs::camara::{Camara, CamaraLoad, CamaraQuery};
use crate::specs::geojson::{self, FeatureCollection};
use crate::specs::github;
use crate::specs::senado::{Senado, SenadoQuery};
use crate::store::DataSet;

type CamaraKey = (CamaraQuery, Option<String>);
type EmendasKey = (PathBuf, EmendasLayout);

/// Every data source behind one transport, each memoized by its arguments:
/// API fetches for an hour, local files and polygons for the process lifetime.
pub struct Sources {
    transport: Box<dyn Transport>,
    camara_base: String,
    senado_base: String,
    camara_memo: Memo<CamaraKey, Table>,
    senado_memo: Memo<SenadoQuery, Table>,
    commit_memo: Memo<(String, String), Option<String>>,
    emendas_memo: Memo<EmendasKey, Arc<Vec<EmendaRecord>>>,
    geojson_memo: Memo<String, Arc<FeatureCollection>>,
}

impl Sources {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_bases(transport, CAMARA_API, SENADO_API)
    }

    pub fn with_bases(transport: Box<dyn Transport>, camara_base: &str, senado_base: &str) -> Self {
        let ttl = Duration::from_secs(FETCH_TTL_SECS);
        Self {
            transport,
            camara_base: s!(camara_base),
            senado_base: s!(senado_base),
            camara_memo: Memo::with_ttl(ttl),
            senado_memo: Memo::with_ttl(ttl),
            commit_memo: Memo::with_ttl(ttl),
            emendas_memo: Memo::forever(),
            geojson_memo: Memo::forever(),
        }
    }

    /// Real network, with the given request timeout.
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Box::new(HttpClient::new(timeout)?)))
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// `None` when the listing failed before any proposition arrived. A
    /// listing cut short by an error is returned as is but not memoized.
    pub fn camara(&self, opts: &SourceOptions, progress: Option<&mut dyn Progress>) -> Option<Table> {
        let key = (opts.camara.clone(), opts.camara_token.clone());
        if let Some(hit) = self.camara_memo.get(&key) {
            logd!("Collect: câmara served from memo");
            return Some(hit);
        }
        let camara = Camara::new(&self.camara_base, opts.camara_token.clone());
        let CamaraLoad { table, complete } = camara.load(self.transport(), &opts.camara, progress);
        if complete {
            self.camara_memo.insert(key, table.clone());
            return Some(table);
        }
        if table.is_empty() {
            loge!("Collect: câmara listing failed on the first page");
            return None;
        }
        logw!("Collect: câmara listing is partial ({} row(s)), not memoized", table.len());
        Some(table)
    }

    /// `None` when the Senate listing failed; failures are not memoized.
    pub fn senado(&self, opts: &SourceOptions, progress: Option<&mut dyn Progress>) -> Option<Table> {
        if let Some(hit) = self.senado_memo.get(&opts.senado) {
            logd!("Collect: senado served from memo");
            return Some(hit);
        }
        let table = Senado::new(&self.senado_base).load(self.transport(), &opts.senado, progress)?;
        self.senado_memo.insert(opts.senado.clone(), table.clone());
        Some(table)
    }

    pub fn emendas(&self, opts: &SourceOptions) -> Result<Arc<Vec<EmendaRecord>>> {
        let key = (opts.emendas_csv.clone(), opts.emendas_layout.clone());
        self.emendas_memo.get_or_try_insert_with(&key, || {
            emendas::load_emendas(&key.0, &key.1).map(Arc::new)
        })
    }

    pub fn geojson(&self, url: &str) -> Result<Arc<FeatureCollection>> {
        self.geojson_memo.get_or_try_insert_with(&s!(url), || {
            geojson::fetch_geojson(self.transport(), url).map(Arc::new)
        })
    }

    /// Missing polygons only degrade the map; the error is logged.
    pub fn mapa(&self, opts: &SourceOptions, metric: Metric, clip: bool) -> Result<Choropleth> {
        let records = self.emendas(opts)?;
        let polygons = match self.geojson(&opts.geojson_url) {
            Ok(fc) => Some(fc),
            Err(e) => {
                loge!("Collect: GeoJSON unavailable: {e}");
                None
            }
        };
        Ok(choropleth::build(&records, metric, polygons.as_deref(), clip))
    }

    /// Newest commit date of the configured data file, when one is configured.
    pub fn last_commit(&self, opts: &SourceOptions) -> Option<String> {
        let (repo, path) = (opts.github_repo.clone()?, opts.github_path.clone()?);
        let key = (repo, path);
        let found = self.commit_memo.get_or_try_insert_with(&key, || {
            github::last_commit(self.transport(), &key.0, &key.1)
        });
        match found {
            Ok(date) => date,
            Err(e) => {
                loge!("Collect: last commit lookup failed: {e}");
                None
            }
        }
    }

    /// Drop memoized API results so the next call goes to the network.
    pub fn refresh(&self) {
        self.camara_memo.clear();
        self.senado_memo.clear();
        self.commit_memo.clear();
    }

    /// Top-level: dispatch on page kind and collect display data (no IO besides fetching).
    pub fn run(
        &self,
        kind: PageKind,
        opts: &SourceOptions,
        progress: Option<&mut dyn Progress>,
    ) -> Result<DataSet> {
        match kind {
            PageKind::Camara => self.camara(opts, progress)
                .map(|t| t.to_dataset())
                .ok_or_else(|| Error::Other(s!("Câmara: consulta indisponível"))),
            PageKind::Senado => self.senado(opts, progress)
                .map(|t| t.to_dataset())
                .ok_or_else(|| Error::Other(s!("Senado: consulta indisponível"))),
            PageKind::Emendas => Ok(emendas::to_table(&self.emendas(opts)?).to_dataset()),
            PageKind::Mapa => Ok(self.mapa(opts, Metric::MovimentacaoLiquida, true)?.to_dataset()),
        }
    }
}
