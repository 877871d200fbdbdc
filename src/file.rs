// src/file.rs

use std::{
    fs,
    path::{MAIN_SEPARATOR_STR, Path, PathBuf},
};

use crate::config::options::ExportOptions;
use crate::csv::to_export_string;
use crate::error::{Error, Result};
use crate::store::DataSet;

/// Write the displayed table to the single file named by `export.out_path()`.
/// Returns the final path written to.
pub fn write_export_single(export: &ExportOptions, ds: &DataSet) -> Result<PathBuf> {
    let path = export.out_path();
    write_export_to(&path, export, ds)?;
    Ok(path)
}

/// Same as `write_export_single`, to an explicit path (CLI `-o`).
pub fn write_export_to(path: &Path, export: &ExportOptions, ds: &DataSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let contents = export_string(export, ds);
    fs::write(path, contents)?;
    logf!("Export: {} row(s) → {}", ds.row_count(), path.display());
    Ok(())
}

/// Clipboard / stdout rendering.
pub fn export_string(export: &ExportOptions, ds: &DataSet) -> String {
    to_export_string(&ds.headers, &ds.rows, export.include_headers, export.delim())
}

/// `-o saida/` (or an existing directory) means `saida/<default_name>`.
/// Both separators are accepted on every platform.
pub fn resolve_out_path(user_o: &Path, default_name: &str) -> Result<PathBuf> {
    let text = user_o.to_string_lossy();
    if text.is_empty() {
        return Ok(PathBuf::from(default_name));
    }
    let dir_hint = text.ends_with(['/', '\\']);
    let p = PathBuf::from(text.replace(['/', '\\'], MAIN_SEPARATOR_STR));

    if dir_hint || p.is_dir() {
        ensure_directory(&p)?;
        return Ok(p.join(default_name));
    }
    Ok(p)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::Other(format!("{} já existe e não é um diretório", dir.display()))),
        Err(_) => Ok(fs::create_dir_all(dir)?),
    }
}
