// src/cli.rs
//! Headless access to every page: fetch, project, and write CSV/TSV to
//! stdout or a file. Settings come from `monitor.cfg` and the environment;
//! flags given here win over both.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result};

use crate::choropleth::Metric;
use crate::collect::Sources;
use crate::config::options::{AppOptions, ExportFormat, ExportOptions, PageKind};
use crate::config::Settings;
use crate::emendas::{self, EmendasLayout, MunicipioLookup};
use crate::file::{export_string, resolve_out_path, write_export_to};
use crate::filter::{narrow, Selection};
use crate::progress::Progress;
use crate::specs::camara::StatusSource;
use crate::store::DataSet;

#[derive(Parser, Debug)]
#[command(name = "monitor_legislativo", version)]
#[command(about = "Proposições sobre o RS na Câmara e no Senado, e emendas individuais aos municípios")]
pub struct Cli {
    /// Settings file (`key=value`)
    #[arg(long, global = true, default_value = crate::config::consts::SETTINGS_FILE)]
    pub config: PathBuf,

    /// Output file; stdout when absent
    #[arg(short = 'o', long, global = true)]
    pub out: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Omit the header row
    #[arg(long, global = true, default_value_t = false)]
    pub no_headers: bool,

    /// Bearer token for the Chamber API
    #[arg(long, global = true, env = "CAMARA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Tramitacoes,
    Detalhes,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MetricArg {
    Movimentacao,
    Acumulada,
    Saldo,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chamber of Deputies propositions
    Camara {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Repeatable
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Federal Senate propositions
    Senado {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        keyword: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Amendment disbursements from the joined CSV
    Emendas {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        delimiter: Option<char>,
    },
    /// Join the raw treasury export to the municipality code table
    JoinMunicipios {
        /// Raw export (CSV)
        #[arg(long)]
        raw: PathBuf,
        /// Code table (semicolon CSV)
        #[arg(long)]
        codes: Option<PathBuf>,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// Lines before the header row
        #[arg(long, default_value_t = 2)]
        skip_rows: usize,
    },
    /// Choropleth model as a per-frame region table
    Mapa {
        #[arg(long, value_enum, default_value_t = MetricArg::Movimentacao)]
        metric: MetricArg,
        /// Use min/max instead of the 5th–95th percentile range
        #[arg(long, default_value_t = false)]
        no_clip: bool,
    },
    /// Last commit date of the configured data file
    LastUpdated {
        #[arg(long)]
        repo: Option<String>,
        #[arg(long)]
        path: Option<String>,
    },
}

/// `--tipo`/`--situacao` narrow the table like the GUI filter.
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long = "tipo")]
    pub tipo: Vec<String>,
    #[arg(long = "situacao")]
    pub situacao: Vec<String>,
}

impl FilterArgs {
    fn apply(&self, ds: crate::engine::Table) -> crate::engine::Table {
        if self.tipo.is_empty() && self.situacao.is_empty() {
            return ds;
        }
        let mut sel = Selection::distinct_of(&ds);
        if !self.tipo.is_empty() { sel.tipo = self.tipo.clone(); }
        if !self.situacao.is_empty() { sel.situacao = self.situacao.clone(); }
        narrow(&ds, &sel)
    }
}

/// Progress lines on stderr so stdout stays machine-readable.
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, _label: &str) {
        self.done += 1;
    }
    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        eprintln!("  falha parcial em {label} ({}/{})", self.done, self.total);
    }
    fn finish(&mut self) {
        if self.total > 0 {
            eprintln!("{}/{} concluído(s)", self.done, self.total);
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(&cli.config)?;
    if cli.token.is_some() {
        settings.camara_token = cli.token.clone();
    }

    let mut export = ExportOptions::default();
    export.format = match cli.format {
        FormatArg::Csv => ExportFormat::Csv,
        FormatArg::Tsv => ExportFormat::Tsv,
    };
    export.include_headers = !cli.no_headers;

    let ds = match &cli.command {
        Command::JoinMunicipios { raw, codes, delimiter, skip_rows } => {
            let layout = EmendasLayout { delimiter: *delimiter, skip_rows: *skip_rows };
            let raw = emendas::read_raw_emendas(raw, &layout)?;
            let lookup = MunicipioLookup::from_csv(codes.as_ref().unwrap_or(&settings.muni_codes_csv))?;
            emendas::join_municipios(&raw, &lookup)?
        }
        Command::LastUpdated { repo, path } => {
            if repo.is_some() { settings.github_repo = repo.clone(); }
            if path.is_some() { settings.github_path = path.clone(); }
            let opts = AppOptions::from_settings(&settings);
            let sources = Sources::http(Duration::from_secs(settings.http_timeout_secs))?;
            let when = sources.last_commit(&opts.sources)
                .ok_or_else(|| eyre!("no commit date available (set github_repo and github_path)"))?;
            println!("{when}");
            return Ok(());
        }
        other => collect(other, &mut settings)?,
    };

    match &cli.out {
        Some(out) => {
            let default_name = join!(output_stem(&cli.command), ".", export.format.ext());
            let path = resolve_out_path(out, &default_name)?;
            write_export_to(&path, &export, &ds)?;
            eprintln!("{} linha(s) → {}", ds.row_count(), path.display());
        }
        None => print!("{}", export_string(&export, &ds)),
    }
    Ok(())
}

fn output_stem(command: &Command) -> &'static str {
    match command {
        Command::Camara { .. } => PageKind::Camara.slug(),
        Command::Senado { .. } => PageKind::Senado.slug(),
        Command::Emendas { .. } => PageKind::Emendas.slug(),
        Command::Mapa { .. } => PageKind::Mapa.slug(),
        Command::JoinMunicipios { .. } | Command::LastUpdated { .. } => "Emendas_RS_cod",
    }
}

fn collect(command: &Command, settings: &mut Settings) -> Result<DataSet> {
    match command {
        Command::Camara { start, end, keywords, year, status, .. } => {
            if let Some(d) = start { settings.start_date = *d; }
            if end.is_some() { settings.end_date = *end; }
            if !keywords.is_empty() { settings.keywords = keywords.clone(); }
            if year.is_some() { settings.year = *year; }
            if let Some(s) = status {
                settings.status_source = match s {
                    StatusArg::Tramitacoes => StatusSource::Tramitacoes,
                    StatusArg::Detalhes => StatusSource::Detalhes,
                };
            }
        }
        Command::Senado { year, keyword, .. } => {
            if let Some(y) = year { settings.senado_year = *y; }
            if let Some(k) = keyword { settings.senado_keyword = k.clone(); }
        }
        Command::Emendas { csv, delimiter } => {
            if let Some(p) = csv { settings.emendas_csv = p.clone(); }
            if let Some(d) = delimiter { settings.emendas_delim = *d; }
        }
        _ => {}
    }

    let opts = AppOptions::from_settings(settings);
    let sources = Sources::http(Duration::from_secs(settings.http_timeout_secs))?;
    let mut progress = StderrProgress { total: 0, done: 0 };

    let ds = match command {
        Command::Camara { filter, .. } => {
            let table = sources.camara(&opts.sources, Some(&mut progress))
                .ok_or_else(|| eyre!("Chamber listing unavailable; see .store/debug.log"))?;
            filter.apply(table).to_dataset()
        }
        Command::Senado { filter, .. } => {
            let table = sources.senado(&opts.sources, Some(&mut progress))
                .ok_or_else(|| eyre!("Senate listing unavailable; see .store/debug.log"))?;
            filter.apply(table).to_dataset()
        }
        Command::Emendas { .. } => sources.run(PageKind::Emendas, &opts.sources, None)?,
        Command::Mapa { metric, no_clip } => {
            let metric = match metric {
                MetricArg::Movimentacao => Metric::MovimentacaoLiquida,
                MetricArg::Acumulada => Metric::MovimentacaoAcumulada,
                MetricArg::Saldo => Metric::Saldo,
            };
            sources.mapa(&opts.sources, metric, !no_clip)?.to_dataset()
        }
        Command::JoinMunicipios { .. } | Command::LastUpdated { .. } => {
            return Err(eyre!("not a data page"));
        }
    };
    Ok(ds)
}
