// tests/emendas_map.rs
use std::fs;

use monitor_legislativo::choropleth::{self, hex, percentile, ColorBounds, Metric};
use monitor_legislativo::emendas::{
    join_municipios, load_emendas, read_raw_emendas, to_table, write_joined, EmendasLayout,
    MunicipioLookup, RAW_COLUMNS,
};
use monitor_legislativo::specs::geojson::FeatureCollection;

const RAW: &str = "\
Relatório de emendas individuais
Gerado em 01/06/2024
Cod;Municipio;UF;Estado;Data;Mov;Acum;Saldo
8541;NAO-ME-TOQUE;RS;Rio Grande do Sul;06/05/2024;1.000,00;1.000,00;1.000,00
8801;PORTO ALEGRE;RS;Rio Grande do Sul;05/05/2024;2.500,50;2.500,50;2.500,50
9999;CIDADE FANTASMA;RS;Rio Grande do Sul;06/05/2024;10,00;10,00;10,00
8541;NAO-ME-TOQUE;RS;Rio Grande do Sul;sem data;5,00;1.005,00;1.005,00
";

const CODES: &str = "code_muni;name_muni\n4312906;NAOMETOQUE\n4314902;PORTO ALEGRE\n";

const POLYGONS: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"id":"4312906","name":"Não-Me-Toque"},"geometry":null},
  {"type":"Feature","properties":{"id":4314902.0,"name":"Porto Alegre"},"geometry":null}
]}"#;

fn layout() -> EmendasLayout {
    EmendasLayout { delimiter: ';', skip_rows: 2 }
}

fn joined_records(dir: &std::path::Path) -> Vec<monitor_legislativo::emendas::EmendaRecord> {
    let raw_path = dir.join("emendas_raw.csv");
    let codes_path = dir.join("codigos.csv");
    fs::write(&raw_path, RAW).unwrap();
    fs::write(&codes_path, CODES).unwrap();

    let raw = read_raw_emendas(&raw_path, &layout()).unwrap();
    let lookup = MunicipioLookup::from_csv(&codes_path).unwrap();
    let joined = join_municipios(&raw, &lookup).unwrap();
    let out = write_joined(&joined, &dir.join("out").join("emendas.csv")).unwrap();
    load_emendas(&out, &EmendasLayout::default()).unwrap()
}

#[test]
fn raw_header_is_replaced_and_fixed_names_join() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("raw.csv");
    fs::write(&raw_path, RAW).unwrap();

    let raw = read_raw_emendas(&raw_path, &layout()).unwrap();
    assert_eq!(raw.headers.as_deref().unwrap(), RAW_COLUMNS.map(String::from).as_slice());
    assert_eq!(raw.row_count(), 4);

    let lookup = MunicipioLookup::parse(CODES, std::path::Path::new("codigos.csv")).unwrap();
    assert_eq!(lookup.code_of("NAO-ME-TOQUE"), Some(4312906));

    let joined = join_municipios(&raw, &lookup).unwrap();
    let headers = joined.headers.unwrap();
    assert_eq!(headers.len(), RAW_COLUMNS.len() + 2);
    assert_eq!(joined.rows[0][8], "4312906");
    assert_eq!(joined.rows[2][8], "");
}

#[test]
fn joined_file_reads_back_sorted_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let recs = joined_records(dir.path());

    assert_eq!(recs.len(), 4);
    assert_eq!(recs[0].municipio, "PORTO ALEGRE");
    assert_eq!(recs[0].date_label, "05-05-2024");
    assert_eq!(recs[0].movimentacao, Some(2500.5));
    assert_eq!(recs[1].code, Some(4312906));
    assert_eq!(recs[2].code, None);
    assert_eq!(recs[3].date, None);
    assert_eq!(recs[3].acumulada, Some(1005.0));

    let table = to_table(&recs);
    assert_eq!(table.cell_text(0, "Código").as_deref(), Some("4314902"));
    assert_eq!(table.cell_text(2, "Código").as_deref(), Some(""));
}

#[test]
fn map_frames_follow_dates_and_skip_incomplete_rows() {
    let dir = tempfile::tempdir().unwrap();
    let recs = joined_records(dir.path());
    let polygons = FeatureCollection::parse(POLYGONS).unwrap();

    let map = choropleth::build(&recs, Metric::MovimentacaoLiquida, Some(&polygons), false);
    assert_eq!(map.skipped_rows, 2);
    assert!(map.unmatched_codes.is_empty());
    assert_eq!(map.frames.len(), 2);
    assert_eq!(map.frames[0].label, "05-05-2024");
    assert_eq!(map.frames[1].label, "06-05-2024");

    let bounds = map.bounds.unwrap();
    assert_eq!(bounds.lower, 5.0);
    assert_eq!(bounds.upper, 2500.5);

    let poa = &map.frames[0].regions[0];
    assert!(poa.matched);
    assert_eq!(poa.color.map(hex).as_deref(), Some("#800026"));

    let ds = map.frame_to_dataset(1);
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0][1], "4312906");
    assert_eq!(map.to_dataset().row_count(), 2);
}

#[test]
fn missing_polygons_leave_regions_unmatched() {
    let dir = tempfile::tempdir().unwrap();
    let recs = joined_records(dir.path());

    let map = choropleth::build(&recs, Metric::Saldo, None, true);
    assert_eq!(map.unmatched_codes.len(), 2);
    assert!(map.frames.iter().flat_map(|f| &f.regions).all(|r| !r.matched && r.color.is_some()));
}

#[test]
fn clipped_bounds_are_the_5th_and_95th_percentiles() {
    let values: Vec<f64> = (1..=200).map(|i| f64::from(i) * 10.0).collect();
    let b = ColorBounds::clipped(&values).unwrap();
    assert_eq!(Some(b.lower), percentile(&values, 0.05));
    assert_eq!(Some(b.upper), percentile(&values, 0.95));
    assert!(b.lower > 10.0 && b.upper < 2000.0);
    assert_eq!(b.normalize(10.0), 0.0);
    assert_eq!(b.normalize(2000.0), 1.0);
}

#[test]
fn missing_required_column_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sem_codigo.csv");
    fs::write(&path, "municipio,data_emissao\nPORTO ALEGRE,05/05/2024\n").unwrap();
    let err = load_emendas(&path, &EmendasLayout::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("sem_codigo.csv"));
    assert!(msg.contains("code_muni"));
}
