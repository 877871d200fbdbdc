// src/emendas.rs
//! Individual budget amendments paid to RS municipalities.
//!
//! Two steps, both local:
//! 1. `join_municipios`: the raw treasury export (one row per municipality
//!    and day) left-joined to the IBGE code table by municipality name.
//! 2. `load_emendas`: the joined file read back as typed records, sorted by
//!    emission date, each carrying the `dd-mm-YYYY` frame label the map uses.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::csv::{parse_rows, split_header};
use crate::engine::{Column, ColumnKind, Table, Value};
use crate::error::{Error, Result};
use crate::store::{save_dataset_to, DataSet};

/// Column names given to the raw treasury export, in file order.
pub const RAW_COLUMNS: [&str; 8] = [
    "cod_siafi_municipio", "municipio", "uf", "estado", "data_emissao",
    "moviment_liquida", "moviment_liquida_acum", "saldo",
];

const CODE_COLS: &[&str] = &["code_muni"];
const NAME_COLS: &[&str] = &["municipio", "name_muni"];
const DATE_COLS: &[&str] = &["data_emissao", "Data"];
const MOV_COLS: &[&str] = &["moviment_liquida", "Valor"];
const ACUM_COLS: &[&str] = &["moviment_liquida_acum"];
const SALDO_COLS: &[&str] = &["saldo"];

/// Name fixes applied to the code table before joining.
const NAME_FIXES: &[(&str, &str)] = &[
    ("NAOMETOQUE", "NAO-ME-TOQUE"),
    ("SAO JOSE DO INHACARA", "SAO JOSE DO INHACORA"),
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmendasLayout {
    pub delimiter: char,
    /// Lines dropped before the header row.
    pub skip_rows: usize,
}

impl Default for EmendasLayout {
    fn default() -> Self {
        Self { delimiter: ',', skip_rows: 0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmendaRecord {
    pub code: Option<i64>,
    pub municipio: String,
    pub date: Option<NaiveDate>,
    /// `dd-mm-YYYY`, empty when the date did not parse.
    pub date_label: String,
    pub movimentacao: Option<f64>,
    pub acumulada: Option<f64>,
    pub saldo: Option<f64>,
}

/// Integer code, tolerating float renderings such as `4300034.0`.
pub fn parse_code(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>().ok()
            .filter(|x| x.is_finite() && x.fract() == 0.0)
            .map(|x| x as i64)
    })
}

/// `1234.5`, or Brazilian `1.234,50` when a comma is present.
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let normalized = if s.contains(',') { s.replace('.', "").replace(',', ".") } else { s.to_string() };
    normalized.parse().ok().filter(|x: &f64| x.is_finite())
}

fn parse_br_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

fn find_col(header: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| header.iter().position(|h| h == a))
}

fn require_col(header: &[String], aliases: &[&str], path: &Path) -> Result<usize> {
    find_col(header, aliases).ok_or_else(|| Error::MissingColumn {
        path: path.to_path_buf(),
        column: aliases.join("|"),
    })
}

fn cell_amount(row: &[String], i: Option<usize>) -> Option<f64> {
    i.and_then(|i| row.get(i)).and_then(|c| parse_amount(c))
}

fn read_rows(path: &Path, layout: &EmendasLayout) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path)?;
    let mut rows = parse_rows(&text, layout.delimiter);
    rows.drain(..layout.skip_rows.min(rows.len()));
    Ok(rows)
}

/// Typed amendment records, sorted by date with unparseable dates last.
pub fn load_emendas(path: &Path, layout: &EmendasLayout) -> Result<Vec<EmendaRecord>> {
    let rows = read_rows(path, layout)?;
    let Some((header, body)) = split_header(rows) else {
        logf!("Emendas: {} is empty", path.display());
        return Ok(Vec::new());
    };
    parse_records(path, &header, body)
}

fn parse_records(path: &Path, header: &[String], body: Vec<Vec<String>>) -> Result<Vec<EmendaRecord>> {
    let code_i = require_col(header, CODE_COLS, path)?;
    let name_i = require_col(header, NAME_COLS, path)?;
    let date_i = require_col(header, DATE_COLS, path)?;
    let mov_i = find_col(header, MOV_COLS);
    let acum_i = find_col(header, ACUM_COLS);
    let saldo_i = find_col(header, SALDO_COLS);

    let mut out: Vec<EmendaRecord> = body.iter()
        .map(|row| {
            let date = parse_br_date(&row[date_i]);
            EmendaRecord {
                code: parse_code(&row[code_i]),
                municipio: row[name_i].trim().to_string(),
                date,
                date_label: date.map(|d| d.format("%d-%m-%Y").to_string()).unwrap_or_default(),
                movimentacao: cell_amount(row, mov_i),
                acumulada: cell_amount(row, acum_i),
                saldo: cell_amount(row, saldo_i),
            }
        })
        .collect();

    out.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let undated = out.iter().filter(|r| r.date.is_none()).count();
    if undated > 0 {
        logd!("Emendas: {undated} row(s) with unparseable date in {}", path.display());
    }
    logf!("Emendas: {} record(s) from {}", out.len(), path.display());
    Ok(out)
}

/// Display table for the Emendas page and export.
pub fn to_table(records: &[EmendaRecord]) -> Table {
    let col = |key: &str, label: &str, kind| Column { key: s!(key), label: s!(label), kind };
    let money = |x: Option<f64>| x.map_or(Value::Missing, Value::Float);
    Table {
        columns: vec![
            col("code_muni", "Código", ColumnKind::Int),
            col("municipio", "Município", ColumnKind::Text),
            col("data_emissao", "Data", ColumnKind::Text),
            col("moviment_liquida", "Movimentação líquida", ColumnKind::Float),
            col("moviment_liquida_acum", "Movimentação acumulada", ColumnKind::Float),
            col("saldo", "Saldo", ColumnKind::Float),
        ],
        rows: records.iter()
            .map(|r| vec![
                r.code.map_or(Value::Missing, Value::Int),
                Value::Text(r.municipio.clone()),
                Value::Text(r.date_label.clone()),
                money(r.movimentacao),
                money(r.acumulada),
                money(r.saldo),
            ])
            .collect(),
    }
}

/* ---------------- Municipality join ---------------- */

pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    NAME_FIXES.iter()
        .find(|(from, _)| *from == name)
        .map_or_else(|| s!(name), |(_, to)| s!(*to))
}

/// IBGE code table keyed by (normalized) municipality name.
#[derive(Clone, Debug, Default)]
pub struct MunicipioLookup {
    pub headers: Vec<String>,
    rows: Vec<Vec<String>>,
    by_name: HashMap<String, usize>,
    code_col: Option<usize>,
}

impl MunicipioLookup {
    /// Semicolon-delimited file with a header row containing `name_muni`.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let Some((headers, mut rows)) = split_header(parse_rows(text, ';')) else {
            return Err(Error::Other(format!("{}: empty code table", origin.display())));
        };
        let name_col = require_col(&headers, &["name_muni"], origin)?;
        let code_col = find_col(&headers, CODE_COLS);

        let mut by_name = HashMap::new();
        for (i, row) in rows.iter_mut().enumerate() {
            row[name_col] = normalize_name(&row[name_col]);
            // First row wins on duplicate names.
            by_name.entry(row[name_col].clone()).or_insert(i);
        }
        logd!("Municípios: {} name(s) from {}", by_name.len(), origin.display());
        Ok(Self { headers, rows, by_name, code_col })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&[String]> {
        self.by_name.get(name.trim()).map(|&i| self.rows[i].as_slice())
    }

    pub fn code_of(&self, name: &str) -> Option<i64> {
        let ci = self.code_col?;
        self.row(name).and_then(|r| parse_code(&r[ci]))
    }
}

/// Raw treasury export with its own header row replaced by `RAW_COLUMNS`.
pub fn read_raw_emendas(path: &Path, layout: &EmendasLayout) -> Result<DataSet> {
    let mut rows = read_rows(path, layout)?;
    if rows.is_empty() {
        return Ok(DataSet { headers: Some(RAW_COLUMNS.iter().map(|c| s!(*c)).collect()), rows });
    }
    rows.remove(0);
    for r in rows.iter_mut() {
        r.resize(RAW_COLUMNS.len(), s!());
    }
    Ok(DataSet { headers: Some(RAW_COLUMNS.iter().map(|c| s!(*c)).collect()), rows })
}

/// Left join on `municipio == name_muni`; lookup columns are appended and
/// stay empty for unmatched rows.
pub fn join_municipios(raw: &DataSet, lookup: &MunicipioLookup) -> Result<DataSet> {
    let raw_headers = raw.headers.clone().unwrap_or_default();
    let key = require_col(&raw_headers, &["municipio"], Path::new("emendas"))?;
    let blank = vec![s!(); lookup.headers.len()];

    let mut unmatched = 0usize;
    let rows: Vec<Vec<String>> = raw.rows.iter()
        .map(|row| {
            let extra = match row.get(key).and_then(|name| lookup.row(name)) {
                Some(found) => found,
                None => {
                    unmatched += 1;
                    blank.as_slice()
                }
            };
            row.iter().chain(extra).cloned().collect::<Vec<String>>()
        })
        .collect();

    if unmatched > 0 {
        logw!("Municípios: {unmatched} row(s) without a code match");
    }
    let headers = raw_headers.into_iter().chain(lookup.headers.iter().cloned()).collect();
    Ok(DataSet { headers: Some(headers), rows })
}

/// Comma-delimited, header first.
pub fn write_joined(ds: &DataSet, path: &Path) -> Result<PathBuf> {
    save_dataset_to(path, ds)?;
    logf!("Emendas: joined file written to {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: &str = "code_muni;name_muni\n4312906;NAOMETOQUE\n4318440;SAO JOSE DO INHACARA\n4314902;PORTO ALEGRE\n";

    #[test]
    fn codes_tolerate_float_rendering() {
        assert_eq!(parse_code("4300034.0"), Some(4300034));
        assert_eq!(parse_code(" 4300034 "), Some(4300034));
        assert_eq!(parse_code("4300034.5"), None);
        assert_eq!(parse_code(""), None);
    }

    #[test]
    fn amounts_in_both_notations() {
        assert_eq!(parse_amount("1234.5"), Some(1234.5));
        assert_eq!(parse_amount("1.234,50"), Some(1234.5));
        assert_eq!(parse_amount("-300"), Some(-300.0));
        assert_eq!(parse_amount("n/d"), None);
    }

    #[test]
    fn lookup_applies_name_fixes() {
        let lookup = MunicipioLookup::parse(CODES, Path::new("mun_codigos.csv")).unwrap();
        assert_eq!(lookup.code_of("NAO-ME-TOQUE"), Some(4312906));
        assert_eq!(lookup.code_of("SAO JOSE DO INHACORA"), Some(4318440));
        assert_eq!(lookup.code_of("NAOMETOQUE"), None);
    }

    #[test]
    fn join_keeps_unmatched_rows() {
        let lookup = MunicipioLookup::parse(CODES, Path::new("mun_codigos.csv")).unwrap();
        let raw = DataSet {
            headers: Some(RAW_COLUMNS.iter().map(|c| s!(*c)).collect()),
            rows: vec![
                vec![s!("8801"), s!("NAO-ME-TOQUE"), s!("RS"), s!("RIO GRANDE DO SUL"), s!("06/05/2024"), s!("100"), s!("100"), s!("100")],
                vec![s!("9999"), s!("INEXISTENTE"), s!("RS"), s!("RIO GRANDE DO SUL"), s!("06/05/2024"), s!("1"), s!("1"), s!("1")],
            ],
        };
        let joined = join_municipios(&raw, &lookup).unwrap();
        let h = joined.headers.as_ref().unwrap();
        assert_eq!(h.len(), 10);
        assert_eq!(h[8], "code_muni");
        assert_eq!(joined.rows[0][8], "4312906");
        assert_eq!(joined.rows[1][8], "");
        assert_eq!(joined.rows[1].len(), 10);
    }

    #[test]
    fn records_sort_by_date_with_undated_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Emendas_RS_cod.csv");
        fs::write(&path, "municipio,data_emissao,moviment_liquida,saldo,code_muni,name_muni\n\
            PORTO ALEGRE,10/05/2024,10.5,20,4314902.0,PORTO ALEGRE\n\
            CANOAS,sem data,1,1,4304606.0,CANOAS\n\
            NAO-ME-TOQUE,06/05/2024,3,3,4312906.0,NAO-ME-TOQUE\n").unwrap();
        let recs = load_emendas(&path, &EmendasLayout::default()).unwrap();
        assert_eq!(recs.iter().map(|r| r.date_label.as_str()).collect::<Vec<_>>(), ["06-05-2024", "10-05-2024", ""]);
        assert_eq!(recs[0].code, Some(4312906));
        assert_eq!(recs[1].movimentacao, Some(10.5));
        assert_eq!(recs[1].acumulada, None);
    }

    #[test]
    fn missing_code_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e.csv");
        fs::write(&path, "municipio,data_emissao\nX,01/01/2024\n").unwrap();
        let err = load_emendas(&path, &EmendasLayout::default()).unwrap_err();
        assert!(err.to_string().contains("code_muni"));
    }
}
