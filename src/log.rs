// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

#[doc(hidden)]
pub use tracing;

use crate::config::consts::LOG_FILE;

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let (secs, ms) = (ms / 1000, ms % 1000);
    let (mins, secs) = (secs / 60, secs % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    format!("{hours:02}:{mins:02}:{secs:02}.{ms:03}")
}

/// Stamps each line with the time since the process started logging.
struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", fmt_elapsed(start().elapsed().as_millis()))
    }
}

/// Install the global subscriber writing to `.store/debug.log`.
/// Safe to call more than once; later calls are no-ops.
pub fn init() -> std::io::Result<()> {
    init_at(Path::new(LOG_FILE), Level::DEBUG)
}

pub fn init_at(path: &Path, max_level: Level) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    start();

    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(Elapsed)
        .with_max_level(max_level)
        .try_init();
    Ok(())
}

// One macro per level, all routed through the subscriber installed by `init`.

#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => { $crate::log::tracing::info!($($arg)*) };
}

#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => { $crate::log::tracing::debug!($($arg)*) };
}

#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => { $crate::log::tracing::warn!($($arg)*) };
}

#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => { $crate::log::tracing::error!($($arg)*) };
}
