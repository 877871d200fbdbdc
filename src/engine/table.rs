// src/engine/table.rs
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as Json;

use super::types::ColumnKind;
use crate::store::DataSet;

/// A coerced cell. Anything that fails to coerce becomes `Missing`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Flag(bool),
    Missing,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) if !x.is_nan() => Some(*x),
            _ => None,
        }
    }

    /// Permissive coercion of a JSON value to the column's kind.
    pub fn coerce(raw: Option<&Json>, kind: ColumnKind) -> Value {
        let Some(raw) = raw else { return Value::Missing };
        if raw.is_null() {
            return Value::Missing;
        }
        match kind {
            ColumnKind::Text => match raw {
                Json::String(s) => Value::Text(s.clone()),
                other => Value::Text(other.to_string()),
            },
            ColumnKind::Int => match raw {
                Json::Number(n) => n.as_i64()
                    .or_else(|| n.as_f64().filter(|x| x.fract() == 0.0).map(|x| x as i64))
                    .map_or(Value::Missing, Value::Int),
                Json::String(s) => parse_int(s).map_or(Value::Missing, Value::Int),
                _ => Value::Missing,
            },
            ColumnKind::Float => match raw {
                Json::Number(n) => n.as_f64().map_or(Value::Missing, Value::Float),
                Json::String(s) => s.trim().parse().map_or(Value::Missing, Value::Float),
                _ => Value::Missing,
            },
            ColumnKind::DateTime => raw.as_str()
                .and_then(parse_datetime)
                .map_or(Value::Missing, Value::DateTime),
            ColumnKind::Date => raw.as_str()
                .and_then(parse_date)
                .map_or(Value::Missing, Value::Date),
            ColumnKind::Flag => match raw {
                Json::Bool(b) => Value::Flag(*b),
                _ => Value::Missing,
            },
        }
    }

    /// Ordering between two present values. Mixed kinds fall back to text.
    fn cmp_present(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Flag(a), Value::Flag(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => a.to_string().cmp(&b.to_string()),
            },
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>().ok().filter(|x| x.fract() == 0.0).map(|x| x as i64)
    })
}

pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS.iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS.iter().find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.is_nan() => Ok(()),
            Value::Float(x) => write!(f, "{x}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Flag(true) => f.write_str("Sim"),
            Value::Flag(false) => f.write_str("Não"),
            Value::Missing => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
}

/// Projected, typed table. No columns at all means "schema-less empty".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    /// Rendered cell text for `row` under column `label`.
    pub fn cell_text(&self, row: usize, label: &str) -> Option<String> {
        let ci = self.column_index(label)?;
        self.rows.get(row).and_then(|r| r.get(ci)).map(|v| v.to_string())
    }

    /// Distinct rendered values of a column, in order of first appearance.
    pub fn distinct(&self, label: &str) -> Vec<String> {
        let Some(ci) = self.column_index(label) else { return Vec::new() };
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let text = row[ci].to_string();
            if seen.insert(text.clone()) {
                out.push(text);
            }
        }
        out
    }

    /// Stable sort on one column; missing cells go last in either direction.
    pub fn sort_by(&mut self, label: &str, descending: bool) {
        let Some(ci) = self.column_index(label) else {
            logd!("Table: sort column {label:?} not present");
            return;
        };
        self.rows.sort_by(|a, b| match (a[ci].is_missing(), b[ci].is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a[ci].cmp_present(&b[ci]);
                if descending { ord.reverse() } else { ord }
            }
        });
    }

    /// Keep rows whose rendered cell in `label` is in `allowed`.
    /// Unknown column → no rows survive.
    pub fn retain_in(&mut self, label: &str, allowed: &HashSet<&str>) {
        let Some(ci) = self.column_index(label) else {
            self.rows.clear();
            return;
        };
        self.rows.retain(|r| allowed.contains(r[ci].to_string().as_str()));
    }

    /// String rendering for display and export.
    pub fn to_dataset(&self) -> DataSet {
        DataSet {
            headers: if self.columns.is_empty() { None } else { Some(self.labels()) },
            rows: self.rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_is_permissive() {
        assert_eq!(Value::coerce(Some(&json!("2024-05-06T10:30")), ColumnKind::DateTime),
            Value::DateTime(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(10, 30, 0).unwrap()));
        assert_eq!(Value::coerce(Some(&json!("Sem data")), ColumnKind::DateTime), Value::Missing);
        assert_eq!(Value::coerce(Some(&json!("1234")), ColumnKind::Int), Value::Int(1234));
        assert_eq!(Value::coerce(Some(&json!(2024.0)), ColumnKind::Int), Value::Int(2024));
        assert_eq!(Value::coerce(Some(&json!("12a")), ColumnKind::Int), Value::Missing);
        assert_eq!(Value::coerce(Some(&Json::Null), ColumnKind::Text), Value::Missing);
        assert_eq!(Value::coerce(None, ColumnKind::Text), Value::Missing);
        assert_eq!(Value::coerce(Some(&json!("06/05/2024")), ColumnKind::Date),
            Value::Date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()));
    }

    fn one_col(values: Vec<Value>) -> Table {
        Table {
            columns: vec![Column { key: s!("k"), label: s!("K"), kind: ColumnKind::Int }],
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    #[test]
    fn missing_sorts_last_both_ways() {
        let mut t = one_col(vec![Value::Int(2), Value::Missing, Value::Int(9), Value::Int(5)]);
        t.sort_by("K", true);
        assert_eq!(t.rows.iter().map(|r| r[0].to_string()).collect::<Vec<_>>(), ["9", "5", "2", ""]);
        t.sort_by("K", false);
        assert_eq!(t.rows.iter().map(|r| r[0].to_string()).collect::<Vec<_>>(), ["2", "5", "9", ""]);
    }

    #[test]
    fn distinct_keeps_first_appearance_order() {
        let t = one_col(vec![Value::Int(3), Value::Int(1), Value::Int(3), Value::Int(2)]);
        assert_eq!(t.distinct("K"), ["3", "1", "2"]);
        assert!(t.distinct("nope").is_empty());
    }
}
