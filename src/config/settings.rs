// src/config/settings.rs
//
// `key=value` settings file (blank lines and `#` comments ignored), then
// environment overrides. Unknown keys are ignored; malformed values are errors.

use std::{fs, path::{Path, PathBuf}};

use chrono::{Local, NaiveDate};

use super::consts::*;
use crate::emendas::EmendasLayout;
use crate::error::{Error, Result};
use crate::specs::camara::{CamaraQuery, StatusSource};
use crate::specs::senado::SenadoQuery;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub camara_token: Option<String>,
    pub http_timeout_secs: u64,
    pub start_date: NaiveDate,
    /// None → today, resolved when the query is built.
    pub end_date: Option<NaiveDate>,
    pub keywords: Vec<String>,
    pub year: Option<i32>,
    pub status_source: StatusSource,
    pub senado_year: i32,
    pub senado_keyword: String,
    pub emendas_csv: PathBuf,
    pub emendas_delim: char,
    pub emendas_skip_rows: usize,
    pub muni_codes_csv: PathBuf,
    pub geojson_url: String,
    pub github_repo: Option<String>,
    pub github_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camara_token: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            start_date: NaiveDate::parse_from_str(DEFAULT_START_DATE, "%Y-%m-%d").unwrap_or_default(),
            end_date: None,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| s!(*k)).collect(),
            year: Some(DEFAULT_YEAR),
            status_source: StatusSource::Tramitacoes,
            senado_year: DEFAULT_YEAR,
            senado_keyword: s!(DEFAULT_SENADO_KEYWORD),
            emendas_csv: PathBuf::from(DEFAULT_EMENDAS_CSV),
            emendas_delim: ',',
            emendas_skip_rows: 0,
            muni_codes_csv: PathBuf::from(DEFAULT_MUNI_CODES_CSV),
            geojson_url: s!(GEOJSON_RS_URL),
            github_repo: None,
            github_path: None,
        }
    }
}

impl Settings {
    /// Defaults, then the file at `path` (if present), then the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            Self::parse(&fs::read_to_string(path)?)?
        } else {
            logd!("Settings: {} not found, using defaults", path.display());
            Self::default()
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn load_default() -> Result<Self> {
        Self::load(Path::new(SETTINGS_FILE))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut cfg = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            if let Some(eq) = line.find('=') {
                let key = line[..eq].trim();
                let val = line[eq + 1..].trim();
                cfg.set(key, val)?;
            }
        }
        Ok(cfg)
    }

    /// Environment variables win over the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        const ENV_KEYS: &[(&str, &str)] = &[
            ("CAMARA_TOKEN", "camara_token"),
            ("MONITOR_HTTP_TIMEOUT", "http_timeout"),
            ("EMENDAS_CSV", "emendas_csv"),
            ("MUN_CODIGOS_CSV", "muni_codes_csv"),
            ("GEOJSON_URL", "geojson_url"),
            ("GITHUB_REPO", "github_repo"),
            ("GITHUB_PATH", "github_path"),
        ];
        for (env_key, key) in ENV_KEYS {
            if let Some(val) = lookup(env_key) {
                self.set(key, val.trim())?;
            }
        }
        Ok(())
    }

    fn set(&mut self, key: &str, val: &str) -> Result<()> {
        match key {
            "camara_token" => self.camara_token = non_empty(val),
            "http_timeout" => self.http_timeout_secs = parse_num(key, val)?,
            "start_date" => self.start_date = parse_date(key, val)?,
            "end_date" => {
                self.end_date = if val.is_empty() { None } else { Some(parse_date(key, val)?) };
            }
            "keywords" => {
                self.keywords = val.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect();
            }
            "year" => self.year = if val.is_empty() { None } else { Some(parse_num(key, val)?) },
            "status_source" => {
                self.status_source = match val.to_ascii_lowercase().as_str() {
                    "tramitacoes" => StatusSource::Tramitacoes,
                    "detalhes" => StatusSource::Detalhes,
                    other => return Err(Error::Config(format!("status_source: unknown value {other:?}"))),
                };
            }
            "senado_year" => self.senado_year = parse_num(key, val)?,
            "senado_keyword" => self.senado_keyword = s!(val),
            "emendas_csv" => self.emendas_csv = PathBuf::from(val),
            "emendas_delim" => {
                self.emendas_delim = match val {
                    "," | "comma" => ',',
                    ";" | "semicolon" => ';',
                    other => return Err(Error::Config(format!("emendas_delim: unsupported {other:?}"))),
                };
            }
            "emendas_skip_rows" => self.emendas_skip_rows = parse_num(key, val)?,
            "muni_codes_csv" => self.muni_codes_csv = PathBuf::from(val),
            "geojson_url" => self.geojson_url = s!(val),
            "github_repo" => self.github_repo = non_empty(val),
            "github_path" => self.github_path = non_empty(val),
            _ => logd!("Settings: ignoring unknown key {key:?}"),
        }
        Ok(())
    }

    pub fn camara_query(&self) -> CamaraQuery {
        CamaraQuery {
            start: self.start_date,
            end: Some(self.end_date.unwrap_or_else(|| Local::now().date_naive())),
            keywords: self.keywords.clone(),
            year: self.year,
            status: self.status_source,
        }
    }

    pub fn senado_query(&self) -> SenadoQuery {
        SenadoQuery { year: self.senado_year, keyword: self.senado_keyword.clone() }
    }

    pub fn emendas_layout(&self) -> EmendasLayout {
        EmendasLayout { delimiter: self.emendas_delim, skip_rows: self.emendas_skip_rows }
    }
}

fn non_empty(val: &str) -> Option<String> {
    if val.is_empty() { None } else { Some(s!(val)) }
}

fn parse_num<T: std::str::FromStr>(key: &str, val: &str) -> Result<T> {
    val.parse().map_err(|_| Error::Config(format!("{key}: not a number: {val:?}")))
}

fn parse_date(key: &str, val: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(val, "%Y-%m-%d")
        .map_err(|_| Error::Config(format!("{key}: expected YYYY-MM-DD, got {val:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let cfg = Settings::parse(
            "# comment\n\
             keywords = Rio Grande do Sul, enchentes\n\
             start_date=2024-05-01\n\
             emendas_delim=;\n\
             status_source=detalhes\n",
        ).unwrap();
        assert_eq!(cfg.keywords, vec!["Rio Grande do Sul", "enchentes"]);
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(cfg.emendas_delim, ';');
        assert_eq!(cfg.status_source, StatusSource::Detalhes);
        assert_eq!(cfg.http_timeout_secs, HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Settings::parse("start_date=05/05/2024").is_err());
        assert!(Settings::parse("http_timeout=soon").is_err());
    }

    #[test]
    fn env_wins_over_file() {
        let mut cfg = Settings::parse("camara_token=from-file").unwrap();
        cfg.apply_env(|k| (k == "CAMARA_TOKEN").then(|| s!("from-env"))).unwrap();
        assert_eq!(cfg.camara_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn commit_lookup_can_come_from_env_alone() {
        let mut cfg = Settings::parse("").unwrap();
        cfg.apply_env(|k| match k {
            "GITHUB_REPO" => Some(s!("dono/dados")),
            "GITHUB_PATH" => Some(s!(" Emendas_RS_cod.csv ")),
            _ => None,
        }).unwrap();
        assert_eq!(cfg.github_repo.as_deref(), Some("dono/dados"));
        assert_eq!(cfg.github_path.as_deref(), Some("Emendas_RS_cod.csv"));
    }

    #[test]
    fn explicit_end_date_is_kept() {
        let cfg = Settings::parse("end_date=2024-06-30").unwrap();
        assert_eq!(cfg.camara_query().end, NaiveDate::from_ymd_opt(2024, 6, 30));
    }
}
