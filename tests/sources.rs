// tests/sources.rs
mod support;

use std::fs;
use std::sync::Arc;

use monitor_legislativo::choropleth::Metric;
use monitor_legislativo::collect::Sources;
use monitor_legislativo::config::options::{PageKind, SourceOptions};
use support::{FakeTransport, Shared};

const CAMARA: &str = "http://camara.test/api/v2";
const SENADO: &str = "http://senado.test/dadosabertos";
const GEO: &str = "http://geo.test/rs.json";

fn sources(fake: &Arc<FakeTransport>) -> Sources {
    Sources::with_bases(Box::new(Shared(Arc::clone(fake))), CAMARA, SENADO)
}

fn options() -> SourceOptions {
    let mut opts = SourceOptions::default();
    opts.camara_token = None;
    opts.geojson_url = GEO.into();
    opts.github_repo = None;
    opts
}

#[test]
fn camara_is_memoized_until_refresh() {
    let listing = format!("{CAMARA}/proposicoes");
    let fake = Arc::new(FakeTransport::new().on_page(&listing, 1, 200, r#"{"dados":[]}"#));
    let src = sources(&fake);
    let opts = options();

    assert!(src.camara(&opts, None).unwrap().is_empty());
    assert!(src.camara(&opts, None).unwrap().is_empty());
    assert_eq!(fake.count(&listing), 1);

    let mut other = opts.clone();
    other.camara.keywords.push("enchente".into());
    src.camara(&other, None);
    assert_eq!(fake.count(&listing), 2);

    src.refresh();
    src.camara(&opts, None);
    assert_eq!(fake.count(&listing), 3);
}

#[test]
fn failed_camara_listing_is_not_memoized() {
    let listing = format!("{CAMARA}/proposicoes");
    let fake = Arc::new(FakeTransport::new().on_page(&listing, 1, 503, ""));
    let src = sources(&fake);
    let opts = options();

    assert!(src.camara(&opts, None).is_none());
    assert!(src.camara(&opts, None).is_none());
    assert!(src.run(PageKind::Camara, &opts, None).is_err());
    assert_eq!(fake.count(&listing), 3);
}

#[test]
fn partial_camara_listing_is_shown_but_fetched_again() {
    let listing = format!("{CAMARA}/proposicoes");
    let fake = Arc::new(FakeTransport::new()
        .on_page(&listing, 1, 200, r#"{"dados":[{"siglaTipo":"PL","numero":1,"ano":2024}]}"#)
        .on_page(&listing, 2, 503, ""));
    let src = sources(&fake);
    let opts = options();

    assert_eq!(src.camara(&opts, None).unwrap().len(), 1);
    assert_eq!(src.camara(&opts, None).unwrap().len(), 1);
    assert_eq!(fake.count(&listing), 4);
}

#[test]
fn failed_senado_is_not_memoized() {
    let listing = format!("{SENADO}/materia/pesquisa/lista");
    let fake = Arc::new(FakeTransport::new().on(&listing, 503, ""));
    let src = sources(&fake);
    let opts = options();

    assert!(src.senado(&opts, None).is_none());
    assert!(src.run(PageKind::Senado, &opts, None).is_err());
    assert_eq!(fake.count(&listing), 2);
}

#[test]
fn local_files_stay_memoized_after_removal() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("Emendas_RS_cod.csv");
    fs::write(&csv, "code_muni,municipio,data_emissao,moviment_liquida\n4314902,PORTO ALEGRE,05/05/2024,100.5\n").unwrap();

    let fake = Arc::new(FakeTransport::new().on(GEO, 200,
        r#"{"features":[{"properties":{"id":"4314902","name":"Porto Alegre"},"geometry":null}]}"#));
    let src = sources(&fake);
    let mut opts = options();
    opts.emendas_csv = csv.clone();

    assert_eq!(src.emendas(&opts).unwrap().len(), 1);
    fs::remove_file(&csv).unwrap();
    assert_eq!(src.emendas(&opts).unwrap().len(), 1);

    let map = src.mapa(&opts, Metric::MovimentacaoLiquida, true).unwrap();
    assert_eq!(map.frames.len(), 1);
    assert!(map.frames[0].regions[0].matched);
    src.mapa(&opts, Metric::Saldo, false).unwrap();
    assert_eq!(fake.count(GEO), 1);

    let ds = src.run(PageKind::Emendas, &opts, None).unwrap();
    assert_eq!(ds.rows[0][1], "PORTO ALEGRE");
}

#[test]
fn missing_polygons_still_build_a_map() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("e.csv");
    fs::write(&csv, "code_muni,municipio,data_emissao,saldo\n4300034,ACEGUA,01/05/2024,10\n").unwrap();

    let fake = Arc::new(FakeTransport::new());
    let src = sources(&fake);
    let mut opts = options();
    opts.emendas_csv = csv;

    let map = src.mapa(&opts, Metric::Saldo, true).unwrap();
    assert_eq!(map.unmatched_codes, [4300034]);
}

#[test]
fn last_commit_only_with_repo_configured() {
    let url = "https://api.github.com/repos/acme/dados/commits";
    let fake = Arc::new(FakeTransport::new().on(url, 200,
        r#"[{"commit":{"committer":{"date":"2024-06-01T02:15:00Z"}}}]"#));
    let src = sources(&fake);

    let mut opts = options();
    assert_eq!(src.last_commit(&opts), None);
    assert!(fake.calls().is_empty());

    opts.github_repo = Some("acme/dados".into());
    opts.github_path = Some("Emendas_RS_cod.csv".into());
    assert_eq!(src.last_commit(&opts).as_deref(), Some("31/05/2024 23:15:00"));
    assert_eq!(fake.calls()[0].param("path"), Some("Emendas_RS_cod.csv"));
}
