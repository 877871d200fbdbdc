// src/store.rs
//
// Last-fetched snapshot per page under `.store/`, so the GUI opens with data
// before anything is fetched. Snapshots hold rendered strings, header first.

use std::{fs, io::{self, BufWriter, Write}, path::{Path, PathBuf}};

use crate::config::consts::STORE_DIR;
use crate::config::options::PageKind;
use crate::csv::{parse_rows, split_header, write_row};

const STORE_SEP: char = ',';

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn row_count(&self) -> usize { self.rows.len() }
    pub fn header_count(&self) -> usize { self.headers.as_ref().map_or(0, |h| h.len()) }
}

pub fn dataset_path(kind: &PageKind) -> PathBuf {
    PathBuf::from(STORE_DIR).join(join!(kind.slug(), ".csv"))
}

pub fn save_dataset(kind: &PageKind, ds: &DataSet) -> io::Result<PathBuf> {
    let path = dataset_path(kind);
    save_dataset_to(&path, ds)?;
    Ok(path)
}

pub fn load_dataset(kind: &PageKind) -> io::Result<DataSet> {
    load_dataset_from(&dataset_path(kind))
}

pub fn save_dataset_to(path: &Path, ds: &DataSet) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(fs::File::create(path)?);
    // The first line is always read back as the header.
    let headers = ds.headers.clone().unwrap_or_else(|| {
        let ncols = ds.rows.first().map_or(0, |r| r.len());
        (1..=ncols).map(|i| format!("Col {i}")).collect()
    });
    write_row(&mut out, &headers, STORE_SEP)?;
    for r in &ds.rows {
        write_row(&mut out, r, STORE_SEP)?;
    }
    out.flush()
}

pub fn load_dataset_from(path: &Path) -> io::Result<DataSet> {
    let text = fs::read_to_string(path)?;
    match split_header(parse_rows(&text, STORE_SEP)) {
        Some((h, rows)) => Ok(DataSet {
            headers: if h.iter().all(|c| c.is_empty()) { None } else { Some(h) },
            rows,
        }),
        None => Ok(DataSet::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("camara.csv");
        let ds = DataSet {
            headers: Some(vec![s!("Tipo"), s!("Ementa")]),
            rows: vec![vec![s!("PL"), s!("Institui auxílio, e dá outras providências")]],
        };
        save_dataset_to(&path, &ds).unwrap();
        assert_eq!(load_dataset_from(&path).unwrap(), ds);
    }

    #[test]
    fn empty_file_is_an_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        let ds = load_dataset_from(&path).unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.header_count(), 0);
    }
}
