// src/specs/camara.rs
//! Chamber of Deputies open-data API (`/api/v2/proposicoes`).
//!
//! Listing: paginated JSON, `dados` array, walked until an empty page.
//! Per item: one status request (`/tramitacoes` or the detail resource) and
//! one authorship request (`/autores`). Every sub-resource failure is folded
//! into a default string; nothing here returns an error.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::config::consts::{CAMARA_API, PAGE_SIZE};
use crate::core::net::{Request, Transport};
use crate::core::sanitize::contains_folded;
use crate::engine::{
    enrich_all, fetch_all_pages, project, ColumnKind, ColumnSpec, Enricher, ListingSpec, PageWalk,
    Projection, Record, Table,
};
use crate::progress::Progress;

pub const SEM_DATA: &str = "Sem data";
pub const SEM_TRAMITACAO: &str = "Sem tramitação";
pub const SEM_TRAMITACOES: &str = "Sem tramitações";
pub const SEM_SITUACAO: &str = "Sem situação";
pub const ERRO_TRAMITACAO: &str = "Erro na tramitação";
pub const SEM_AUTORES: &str = "Sem autores";
pub const SEM_NOME_AUTOR: &str = "Sem nome do autor";
pub const ERRO_AUTOR: &str = "Erro ao obter dados";

pub const COL_TIPO: &str = "Tipo";
pub const COL_SITUACAO: &str = "Situação";

pub static PROJECTION: Projection = Projection {
    columns: &[
        ColumnSpec::new("siglaTipo", COL_TIPO, ColumnKind::Text),
        ColumnSpec::new("numero", "Número", ColumnKind::Int),
        ColumnSpec::new("ano", "Ano", ColumnKind::Int),
        ColumnSpec::new("autor", "Autor", ColumnKind::Text),
        ColumnSpec::new("ementa", "Ementa", ColumnKind::Text),
        ColumnSpec::new("dataHora", "Data e Hora", ColumnKind::DateTime),
        ColumnSpec::new("descricaoTramitacao", "Tramitação", ColumnKind::Text),
        ColumnSpec::new("descricaoSituacao", COL_SITUACAO, ColumnKind::Text),
        ColumnSpec::new("remetidaOutraCasa", "Enviada ao Senado", ColumnKind::Flag),
    ],
    sort_by: Some("Data e Hora"),
    descending: true,
};

/// Which sub-resource supplies the status fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusSource {
    /// Last entry of `/proposicoes/{id}/tramitacoes`.
    Tramitacoes,
    /// `statusProposicao` of `/proposicoes/{id}`.
    Detalhes,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CamaraQuery {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub keywords: Vec<String>,
    pub year: Option<i32>,
    pub status: StatusSource,
}

impl CamaraQuery {
    /// Listing parameters, without the pagination pair.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut out = vec![(s!("dataApresentacaoInicio"), self.start.format("%Y-%m-%d").to_string())];
        if let Some(end) = self.end {
            out.push((s!("dataApresentacaoFim"), end.format("%Y-%m-%d").to_string()));
        }
        out.push((s!("ordenarPor"), s!("id")));
        for kw in &self.keywords {
            out.push((s!("keywords"), kw.clone()));
        }
        if let Some(year) = self.year {
            out.push((s!("ano"), year.to_string()));
        }
        out
    }
}

/// What `Camara::load` produced. `complete` is false when the listing stopped
/// on an error; `table` then holds only the pages that arrived before it.
#[derive(Clone, Debug)]
pub struct CamaraLoad {
    pub table: Table,
    pub complete: bool,
}

/// Status triple merged into each record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub data_hora: String,
    pub tramitacao: String,
    pub situacao: String,
}

impl Status {
    fn failed() -> Self {
        Self { data_hora: s!(SEM_DATA), tramitacao: s!(ERRO_TRAMITACAO), situacao: s!(ERRO_TRAMITACAO) }
    }

    fn merge_into(self, record: &mut Record) {
        record.insert(s!("dataHora"), Json::String(self.data_hora));
        record.insert(s!("descricaoTramitacao"), Json::String(self.tramitacao));
        record.insert(s!("descricaoSituacao"), Json::String(self.situacao));
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    dados: T,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StatusFields {
    data_hora: Option<String>,
    descricao_tramitacao: Option<String>,
    descricao_situacao: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Detalhes {
    status_proposicao: Option<StatusFields>,
}

#[derive(Deserialize)]
struct Autor {
    nome: Option<String>,
}

pub struct Camara {
    base: String,
    token: Option<String>,
}

impl Default for Camara {
    fn default() -> Self {
        Self::new(CAMARA_API, None)
    }
}

impl Camara {
    pub fn new(base: &str, token: Option<String>) -> Self {
        Self { base: base.trim_end_matches('/').to_string(), token }
    }

    fn url(&self, path: &str) -> String {
        join!(&self.base, path)
    }

    fn request(&self, path: &str) -> Request {
        Request::get(self.url(path))
            .bearer(self.token.as_deref())
            .accept("application/json")
    }

    pub fn listing(&self) -> ListingSpec {
        ListingSpec {
            url: self.url("/proposicoes"),
            page_param: "pagina",
            size_param: "itens",
            page_size: PAGE_SIZE,
            items_key: "dados",
            bearer: self.token.clone(),
        }
    }

    pub fn fetch_proposicoes(
        &self,
        transport: &dyn Transport,
        query: &CamaraQuery,
        progress: Option<&mut (dyn Progress + '_)>,
    ) -> PageWalk {
        fetch_all_pages(transport, &self.listing(), &query.params(), progress)
    }

    /// Status from the last procedural step.
    pub fn fetch_tramitacoes(&self, transport: &dyn Transport, id: &str) -> Option<Status> {
        let req = self.request(&format!("/proposicoes/{id}/tramitacoes"));
        let steps: Vec<StatusFields> = match get_dados(transport, &req) {
            Ok(v) => v,
            Err(e) => {
                loge!("Câmara: tramitações de {id}: {e}");
                return None;
            }
        };
        Some(match steps.into_iter().last() {
            Some(last) => Status {
                data_hora: last.data_hora.unwrap_or_else(|| s!(SEM_DATA)),
                tramitacao: last.descricao_tramitacao.unwrap_or_else(|| s!(SEM_TRAMITACAO)),
                situacao: last.descricao_situacao.unwrap_or_else(|| s!(SEM_SITUACAO)),
            },
            None => Status {
                data_hora: s!(SEM_DATA),
                tramitacao: s!(SEM_TRAMITACAO),
                situacao: s!(SEM_TRAMITACOES),
            },
        })
    }

    /// Status from the detail resource's `statusProposicao`.
    pub fn fetch_detalhes(&self, transport: &dyn Transport, id: &str) -> Option<Status> {
        let req = self.request(&format!("/proposicoes/{id}"));
        let det: Detalhes = match get_dados(transport, &req) {
            Ok(v) => v,
            Err(e) => {
                loge!("Câmara: detalhes de {id}: {e}");
                return None;
            }
        };
        let st = det.status_proposicao.unwrap_or_default();
        Some(Status {
            data_hora: st.data_hora.unwrap_or_else(|| s!(SEM_DATA)),
            tramitacao: st.descricao_tramitacao.unwrap_or_else(|| s!(SEM_TRAMITACAO)),
            situacao: st.descricao_situacao.unwrap_or_else(|| s!(SEM_SITUACAO)),
        })
    }

    /// Name of the first listed author; `Err` carries the fallback text.
    pub fn fetch_autor(&self, transport: &dyn Transport, id: &str) -> Result<String, String> {
        let req = self.request(&format!("/proposicoes/{id}/autores"));
        match get_dados::<Vec<Autor>>(transport, &req) {
            Ok(autores) => Ok(match autores.into_iter().next() {
                Some(first) => first.nome.unwrap_or_else(|| s!(SEM_NOME_AUTOR)),
                None => s!(SEM_AUTORES),
            }),
            Err(e) => {
                loge!("Câmara: autores de {id}: {e}");
                Err(s!(ERRO_AUTOR))
            }
        }
    }

    /// Full pipeline: list, enrich, flag, project.
    pub fn load(
        &self,
        transport: &dyn Transport,
        query: &CamaraQuery,
        mut progress: Option<&mut dyn Progress>,
    ) -> CamaraLoad {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Buscando proposições na Câmara…");
        }
        let walk = self.fetch_proposicoes(transport, query, progress.as_deref_mut());
        let complete = walk.complete;
        let mut records = walk.items;
        if records.is_empty() {
            logf!("Câmara: nenhuma proposição carregada");
            if let Some(p) = progress.as_deref_mut() {
                p.finish();
            }
            return CamaraLoad { table: Table::empty(), complete };
        }

        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Detalhando {} proposições…", records.len()));
        }
        let status = StatusEnricher { camara: self, source: query.status };
        let author = AuthorEnricher { camara: self };
        let enrichers: [&dyn Enricher; 2] = [&status, &author];
        enrich_all(transport, &mut records, "id", &enrichers, progress.as_deref_mut());

        for rec in records.iter_mut() {
            mark_sent_to_senate(rec);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        CamaraLoad { table: project(&records, &PROJECTION), complete }
    }
}

fn get_dados<T: serde::de::DeserializeOwned>(transport: &dyn Transport, req: &Request) -> crate::Result<T> {
    let resp = transport.get(req)?.require_ok(req)?;
    Ok(resp.json::<Envelope<T>>()?.dados)
}

/// Flag propositions whose current step points at the Federal Senate.
fn mark_sent_to_senate(record: &mut Record) {
    let mentions = ["descricaoTramitacao", "descricaoSituacao"].iter().any(|k| {
        record.get(*k)
            .and_then(Json::as_str)
            .is_some_and(|s| contains_folded(s, "Senado Federal"))
    });
    record.insert(s!("remetidaOutraCasa"), Json::Bool(mentions));
}

struct StatusEnricher<'a> {
    camara: &'a Camara,
    source: StatusSource,
}

impl Enricher for StatusEnricher<'_> {
    fn name(&self) -> &'static str {
        match self.source {
            StatusSource::Tramitacoes => "tramitações",
            StatusSource::Detalhes => "detalhes",
        }
    }

    fn enrich(&self, transport: &dyn Transport, id: &str, record: &mut Record) -> bool {
        let fetched = match self.source {
            StatusSource::Tramitacoes => self.camara.fetch_tramitacoes(transport, id),
            StatusSource::Detalhes => self.camara.fetch_detalhes(transport, id),
        };
        let ok = fetched.is_some();
        fetched.unwrap_or_else(Status::failed).merge_into(record);
        ok
    }
}

struct AuthorEnricher<'a> {
    camara: &'a Camara,
}

impl Enricher for AuthorEnricher<'_> {
    fn name(&self) -> &'static str {
        "autores"
    }

    fn enrich(&self, transport: &dyn Transport, id: &str, record: &mut Record) -> bool {
        let (ok, nome) = match self.camara.fetch_autor(transport, id) {
            Ok(nome) => (true, nome),
            Err(fallback) => (false, fallback),
        };
        record.insert(s!("autor"), Json::String(nome));
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_repeats_keywords_and_skips_open_end() {
        let q = CamaraQuery {
            start: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            end: None,
            keywords: vec![s!("Rio Grande do Sul"), s!("enchente")],
            year: Some(2024),
            status: StatusSource::Tramitacoes,
        };
        let params = q.params();
        assert_eq!(params[0], (s!("dataApresentacaoInicio"), s!("2024-05-05")));
        assert!(!params.iter().any(|(k, _)| k == "dataApresentacaoFim"));
        assert_eq!(params.iter().filter(|(k, _)| k == "keywords").count(), 2);
        assert!(params.contains(&(s!("ano"), s!("2024"))));
    }

    #[test]
    fn senate_mention_sets_flag() {
        let mut rec = Record::new();
        rec.insert(s!("descricaoTramitacao"), Json::String(s!("Remessa ao Senado Federal por meio de Ofício")));
        mark_sent_to_senate(&mut rec);
        assert_eq!(rec["remetidaOutraCasa"], Json::Bool(true));

        let mut rec = Record::new();
        rec.insert(s!("descricaoSituacao"), Json::String(s!("Aguardando Parecer")));
        mark_sent_to_senate(&mut rec);
        assert_eq!(rec["remetidaOutraCasa"], Json::Bool(false));
    }
}
