// src/csv.rs
//
// Delimited text in and out. Reading tolerates quoted separators, doubled
// quotes, CRLF, a UTF-8 BOM and blank lines; writing quotes only when needed.

use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

#[derive(Default)]
struct Rows {
    out: Vec<Vec<String>>,
    row: Vec<String>,
    field: String,
}

impl Rows {
    fn end_field(&mut self) {
        self.row.push(take(&mut self.field));
    }

    /// Closes the current row; a row holding one empty field is a blank line.
    fn end_row(&mut self) {
        self.end_field();
        let blank = self.row.len() == 1 && self.row[0].is_empty();
        if blank {
            self.row.clear();
        } else {
            self.out.push(take(&mut self.row));
        }
    }
}

pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut acc = Rows::default();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.next_if_eq(&'"').is_some() => acc.field.push('"'),
                '"' => quoted = false,
                _ => acc.field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            '\r' => {
                chars.next_if_eq(&'\n');
                acc.end_row();
            }
            '\n' => acc.end_row(),
            c if c == sep => acc.end_field(),
            _ => acc.field.push(ch),
        }
    }

    // Unterminated quotes still yield the last row.
    if !acc.field.is_empty() || !acc.row.is_empty() {
        acc.end_row();
    }
    acc.out
}

/// First row as a trimmed header; body rows padded to the header width.
pub fn split_header(mut rows: Vec<Vec<String>>) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    if rows.is_empty() {
        return None;
    }
    let header: Vec<String> = rows.remove(0).iter().map(|h| s!(h.trim())).collect();
    for r in rows.iter_mut().filter(|r| r.len() < header.len()) {
        r.resize(header.len(), s!());
    }
    Some((header, rows))
}

/* ---------------- Writing ---------------- */

fn quote_if_needed(cell: &str, sep: char) -> std::borrow::Cow<'_, str> {
    if cell.contains([sep, '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\"")).into()
    } else {
        cell.into()
    }
}

pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let line = row.iter()
        .map(|c| quote_if_needed(c, sep))
        .collect::<Vec<_>>()
        .join(&sep.to_string());
    writeln!(w, "{line}")
}

/// Whole table as text, for export, clipboard and stdout.
pub fn to_export_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let header = headers.as_ref().filter(|_| include_headers);
    for r in header.into_iter().chain(rows) {
        // Writing into a Vec cannot fail.
        let _ = write_row(&mut buf, r, sep);
    }
    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_and_crlf() {
        let rows = parse_rows("a;\"b;c\";\"say \"\"hi\"\"\"\r\n1;2;3\r\n", ';');
        assert_eq!(rows, vec![
            vec![s!("a"), s!("b;c"), s!("say \"hi\"")],
            vec![s!("1"), s!("2"), s!("3")],
        ]);
    }

    #[test]
    fn bom_and_blank_lines_are_skipped() {
        let rows = parse_rows("\u{feff}x,y\n\n1,2", ',');
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "x");
        assert_eq!(rows[1], vec![s!("1"), s!("2")]);
    }

    #[test]
    fn short_rows_are_padded() {
        let (h, body) = split_header(parse_rows("a,b,c\n1\n", ',')).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(body[0], vec![s!("1"), s!(), s!()]);
    }

    #[test]
    fn export_quotes_separator() {
        let headers = Some(vec![s!("Autor"), s!("Ementa")]);
        let rows = vec![vec![s!("Fulano"), s!("Altera a Lei, e dá outras providências")]];
        let out = to_export_string(&headers, &rows, true, ',');
        assert_eq!(out, "Autor,Ementa\nFulano,\"Altera a Lei, e dá outras providências\"\n");
        let no_header = to_export_string(&headers, &rows, false, '\t');
        assert!(no_header.starts_with("Fulano\t"));
    }
}
