// src/specs/senado.rs
//! Federal Senate open-data API (XML).
//!
//! One listing request per query, a tree walk over `Materia` elements, then
//! one `situacaoatual` request per item. The listing failing is the only
//! case that yields no table at all.

use roxmltree::{Document, Node};
use serde_json::Value as Json;

use crate::config::consts::SENADO_API;
use crate::core::net::{Request, Transport};
use crate::core::sanitize::{contains_folded, normalize_ws};
use crate::engine::{
    enrich_all, project, ColumnKind, ColumnSpec, Enricher, Projection, Record, Table,
};
use crate::error::Result;
use crate::progress::Progress;
use crate::specs::camara::{COL_SITUACAO, COL_TIPO};

pub const SEM_SITUACAO: &str = "Sem situação";
pub const ERRO_SITUACAO: &str = "Erro na situação";

/// Child elements copied from each `Materia`.
pub const MATERIA_FIELDS: &[&str] = &["Codigo", "Sigla", "Numero", "Ano", "Ementa", "Autor", "Data"];

pub static PROJECTION: Projection = Projection {
    columns: &[
        ColumnSpec::new("Sigla", COL_TIPO, ColumnKind::Text),
        ColumnSpec::new("Numero", "Número", ColumnKind::Int),
        ColumnSpec::new("Ano", "Ano", ColumnKind::Int),
        ColumnSpec::new("Autor", "Autor", ColumnKind::Text),
        ColumnSpec::new("Partido", "Partido", ColumnKind::Text),
        ColumnSpec::new("Ementa", "Ementa", ColumnKind::Text),
        ColumnSpec::new("Data", "Data", ColumnKind::Date),
        ColumnSpec::new("Situacao", COL_SITUACAO, ColumnKind::Text),
        ColumnSpec::new("origemCamara", "Vinda da Câmara", ColumnKind::Flag),
    ],
    sort_by: Some("Data"),
    descending: true,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SenadoQuery {
    pub year: i32,
    pub keyword: String,
}

pub struct Senado {
    base: String,
}

impl Default for Senado {
    fn default() -> Self {
        Self::new(SENADO_API)
    }
}

impl Senado {
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    fn request(&self, path: &str) -> Request {
        Request::get(join!(&self.base, path)).accept("application/xml")
    }

    /// Listing request and tree walk. Errors here mean "no table".
    pub fn fetch_materias(&self, transport: &dyn Transport, query: &SenadoQuery) -> Result<Vec<Record>> {
        let req = self.request("/materia/pesquisa/lista")
            .query("ano", query.year)
            .query("palavraChave", &query.keyword);
        let resp = transport.get(&req)?.require_ok(&req)?;
        let records = parse_materias(&resp.body)?;
        logf!("Senado: {} matéria(s) for {}", records.len(), req.describe());
        Ok(records)
    }

    /// Current status text of one item. `Err` carries the fallback text.
    pub fn fetch_situacao(&self, transport: &dyn Transport, codigo: &str) -> std::result::Result<String, String> {
        let req = self.request(&format!("/materia/situacaoatual/{codigo}"));
        let body = transport.get(&req)
            .and_then(|r| r.require_ok(&req))
            .map(|r| r.body);
        let found = body.and_then(|b| {
            let doc = Document::parse(&b)?;
            Ok(first_text(doc.root(), "DescricaoSituacao"))
        });
        match found {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Ok(s!(SEM_SITUACAO)),
            Err(e) => {
                loge!("Senado: situação de {codigo}: {e}");
                Err(s!(ERRO_SITUACAO))
            }
        }
    }

    /// Full pipeline. `None` when the listing itself failed.
    pub fn load(
        &self,
        transport: &dyn Transport,
        query: &SenadoQuery,
        mut progress: Option<&mut dyn Progress>,
    ) -> Option<Table> {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Buscando matérias no Senado…");
        }
        let mut records = match self.fetch_materias(transport, query) {
            Ok(r) => r,
            Err(e) => {
                loge!("Senado: listing failed: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Falha ao consultar o Senado: {e}"));
                    p.finish();
                }
                return None;
            }
        };

        for rec in records.iter_mut() {
            derive_author_fields(rec);
        }
        let situacao = SituacaoEnricher { senado: self };
        let enrichers: [&dyn Enricher; 1] = [&situacao];
        enrich_all(transport, &mut records, "Codigo", &enrichers, progress.as_deref_mut());

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        Some(project(&records, &PROJECTION))
    }
}

/// Every `Materia` element, wherever it sits in the document.
pub fn parse_materias(xml: &str) -> Result<Vec<Record>> {
    let doc = Document::parse(xml)?;
    let out = doc.descendants()
        .filter(|n| n.has_tag_name("Materia"))
        .map(|materia| {
            let mut rec = Record::new();
            for field in MATERIA_FIELDS {
                let text = child_text(materia, field).unwrap_or_default();
                rec.insert(s!(*field), Json::String(text));
            }
            rec
        })
        .collect();
    Ok(out)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(name))
        .map(|c| normalize_ws(c.text().unwrap_or_default()))
}

fn first_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.descendants()
        .find(|c| c.has_tag_name(name))
        .map(|c| normalize_ws(c.text().unwrap_or_default()))
        .filter(|t| !t.is_empty())
}

/// `"Senador Paulo Paim (PT/RS)"` → `"PT"`.
pub fn party_of(author: &str) -> Option<String> {
    let open = author.rfind('(')?;
    let inner = author[open + 1..].strip_suffix(')')?;
    let (party, _uf) = inner.split_once('/')?;
    let party = party.trim();
    (!party.is_empty()).then(|| s!(party))
}

fn derive_author_fields(record: &mut Record) {
    let author = record.get("Autor").and_then(Json::as_str).unwrap_or_default();
    let partido = party_of(author).unwrap_or_default();
    let from_camara = contains_folded(author, "Câmara dos Deputados");
    record.insert(s!("Partido"), Json::String(partido));
    record.insert(s!("origemCamara"), Json::Bool(from_camara));
}

struct SituacaoEnricher<'a> {
    senado: &'a Senado,
}

impl Enricher for SituacaoEnricher<'_> {
    fn name(&self) -> &'static str {
        "situação"
    }

    fn enrich(&self, transport: &dyn Transport, id: &str, record: &mut Record) -> bool {
        let (ok, text) = match self.senado.fetch_situacao(transport, id) {
            Ok(t) => (true, t),
            Err(t) => (false, t),
        };
        record.insert(s!("Situacao"), Json::String(text));
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PesquisaBasicaMateria>
  <Materias>
    <Materia>
      <Codigo>163421</Codigo>
      <Sigla>PL</Sigla>
      <Numero>1877</Numero>
      <Ano>2024</Ano>
      <Ementa>Dispõe sobre
        medidas emergenciais</Ementa>
      <Autor>Senador Paulo Paim (PT/RS)</Autor>
      <Data>2024-05-07</Data>
    </Materia>
    <Materia>
      <Codigo>163500</Codigo>
      <Sigla>PLP</Sigla>
      <Autor>Câmara dos Deputados</Autor>
    </Materia>
  </Materias>
</PesquisaBasicaMateria>"#;

    #[test]
    fn walks_materias_with_empty_defaults() {
        let recs = parse_materias(LISTA).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["Ementa"], Json::String(s!("Dispõe sobre medidas emergenciais")));
        assert_eq!(recs[1]["Numero"], Json::String(s!()));
        assert_eq!(recs[1]["Data"], Json::String(s!()));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_materias("<Materia><Codigo>1</Materia>").is_err());
    }

    #[test]
    fn party_comes_from_suffix() {
        assert_eq!(party_of("Senador Paulo Paim (PT/RS)").as_deref(), Some("PT"));
        assert_eq!(party_of("Senador Hamilton Mourão (REPUBLICANOS/RS)").as_deref(), Some("REPUBLICANOS"));
        assert_eq!(party_of("Câmara dos Deputados"), None);
        assert_eq!(party_of("Comissão (CAE)"), None);
    }

    #[test]
    fn author_from_chamber_is_flagged() {
        let recs = parse_materias(LISTA).unwrap();
        let mut second = recs[1].clone();
        derive_author_fields(&mut second);
        assert_eq!(second["origemCamara"], Json::Bool(true));
        assert_eq!(second["Partido"], Json::String(s!()));
    }
}
