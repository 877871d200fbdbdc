// src/config/consts.rs

// Net config
pub const CAMARA_API: &str = "https://dadosabertos.camara.leg.br/api/v2";
pub const SENADO_API: &str = "https://legis.senado.leg.br/dadosabertos";
pub const GITHUB_API: &str = "https://api.github.com";
pub const GEOJSON_RS_URL: &str =
    "https://raw.githubusercontent.com/tbrugz/geodata-br/master/geojson/geojs-43-mun.json";
pub const USER_AGENT: &str = concat!("monitor_legislativo/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Chamber listing
pub const PAGE_SIZE: u32 = 100;
pub const DEFAULT_START_DATE: &str = "2024-05-05";
pub const DEFAULT_KEYWORDS: &[&str] = &["Rio Grande do Sul"];
pub const DEFAULT_YEAR: i32 = 2024;

// Senate search
pub const DEFAULT_SENADO_KEYWORD: &str = "Rio Grande do Sul";

// Memoization
pub const FETCH_TTL_SECS: u64 = 3600;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";
pub const SETTINGS_FILE: &str = "monitor.cfg";
pub const DEFAULT_EMENDAS_CSV: &str = "Emendas_RS_cod.csv";
pub const DEFAULT_MUNI_CODES_CSV: &str = "mun_codigos.csv";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "tabela";

// America/Sao_Paulo has had no DST since 2019
pub const SAO_PAULO_UTC_OFFSET_SECS: i32 = -3 * 3600;
