// src/choropleth.rs
//! Choropleth model: amendment values per municipality, one frame per
//! emission date, colored on a YlOrRd scale. Drawing is left to the caller;
//! this module decides *which* color every region gets and why.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::emendas::EmendaRecord;
use crate::specs::geojson::FeatureCollection;
use crate::store::DataSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Daily net movement.
    MovimentacaoLiquida,
    MovimentacaoAcumulada,
    /// Running balance.
    Saldo,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::MovimentacaoLiquida, Metric::MovimentacaoAcumulada, Metric::Saldo];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::MovimentacaoLiquida => "Movimentação líquida (R$) diária",
            Metric::MovimentacaoAcumulada => "Movimentação líquida acumulada (R$)",
            Metric::Saldo => "Saldo (R$) acumulado",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Metric::MovimentacaoLiquida => "movimentacao",
            Metric::MovimentacaoAcumulada => "acumulada",
            Metric::Saldo => "saldo",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.slug() == s)
    }

    pub fn value(&self, rec: &EmendaRecord) -> Option<f64> {
        match self {
            Metric::MovimentacaoLiquida => rec.movimentacao,
            Metric::MovimentacaoAcumulada => rec.acumulada,
            Metric::Saldo => rec.saldo,
        }
    }
}

/// Quantile with linear interpolation between closest ranks. NaN is ignored;
/// `None` when nothing is left.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (v.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(v[lo] + (v[hi] - v[lo]) * (pos - lo as f64))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ColorBounds {
    /// 5th to 95th percentile.
    pub fn clipped(values: &[f64]) -> Option<Self> {
        Some(Self { lower: percentile(values, 0.05)?, upper: percentile(values, 0.95)? })
    }

    pub fn full(values: &[f64]) -> Option<Self> {
        Some(Self { lower: percentile(values, 0.0)?, upper: percentile(values, 1.0)? })
    }

    /// Position of `x` inside the bounds, clamped to 0..=1.
    pub fn normalize(&self, x: f64) -> f64 {
        let span = self.upper - self.lower;
        if span <= 0.0 || !span.is_finite() {
            return 0.5;
        }
        ((x - self.lower) / span).clamp(0.0, 1.0)
    }
}

pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScale {
    #[default]
    YlOrRd,
}

const YLORRD: [Rgb; 9] = [
    [0xff, 0xff, 0xcc], [0xff, 0xed, 0xa0], [0xfe, 0xd9, 0x76],
    [0xfe, 0xb2, 0x4c], [0xfd, 0x8d, 0x3c], [0xfc, 0x4e, 0x2a],
    [0xe3, 0x1a, 0x1c], [0xbd, 0x00, 0x26], [0x80, 0x00, 0x26],
];

impl ColorScale {
    pub fn stops(&self) -> &'static [Rgb] {
        match self {
            ColorScale::YlOrRd => &YLORRD,
        }
    }

    /// Color at `t` in 0..=1, interpolated between evenly spaced stops.
    pub fn at(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let f = pos - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
        [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
    }
}

pub fn hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub code: i64,
    pub name: String,
    pub value: Option<f64>,
    pub color: Option<Rgb>,
    /// A polygon with this code exists in the GeoJSON.
    pub matched: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// `dd-mm-YYYY`
    pub label: String,
    pub date: NaiveDate,
    pub regions: Vec<Region>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choropleth {
    pub metric: Metric,
    pub scale: ColorScale,
    pub bounds: Option<ColorBounds>,
    pub frames: Vec<Frame>,
    /// Distinct codes with no polygon.
    pub unmatched_codes: Vec<i64>,
    /// Rows dropped for lacking a code or a date.
    pub skipped_rows: usize,
}

impl Choropleth {
    pub fn frame(&self, i: usize) -> Option<&Frame> {
        self.frames.get(i)
    }

    fn headers(&self) -> Vec<String> {
        ["Data", "Código", "Município", self.metric.label(), "Cor", "Polígono"]
            .iter().map(|h| s!(*h)).collect()
    }

    /// Every region of every frame, one row each, for tables and export.
    pub fn to_dataset(&self) -> DataSet {
        let rows = self.frames.iter().flat_map(frame_rows).collect();
        DataSet { headers: Some(self.headers()), rows }
    }

    /// Regions of one frame only.
    pub fn frame_to_dataset(&self, i: usize) -> DataSet {
        let rows = self.frames.get(i).map(frame_rows).unwrap_or_default();
        DataSet { headers: Some(self.headers()), rows }
    }
}

fn frame_rows(f: &Frame) -> Vec<Vec<String>> {
    f.regions.iter()
        .map(|r| vec![
            f.label.clone(),
            r.code.to_string(),
            r.name.clone(),
            r.value.map(|v| v.to_string()).unwrap_or_default(),
            r.color.map(hex).unwrap_or_default(),
            s!(if r.matched { "Sim" } else { "Não" }),
        ])
        .collect()
}

/// Group by date (chronological), color by `metric` over the whole data set.
/// Without a GeoJSON every region counts as unmatched but still gets a color.
pub fn build(
    records: &[EmendaRecord],
    metric: Metric,
    geojson: Option<&FeatureCollection>,
    clip: bool,
) -> Choropleth {
    let values: Vec<f64> = records.iter().filter_map(|r| metric.value(r)).collect();
    let bounds = if clip { ColorBounds::clipped(&values) } else { ColorBounds::full(&values) };
    let scale = ColorScale::YlOrRd;

    let polygons: HashMap<i64, Option<&str>> = geojson
        .map(|fc| {
            fc.features.iter()
                .filter_map(|f| f.code().map(|c| (c, f.properties.name.as_deref())))
                .collect()
        })
        .unwrap_or_default();

    let mut by_date: Vec<(NaiveDate, Vec<Region>)> = Vec::new();
    let mut unmatched_codes: Vec<i64> = Vec::new();
    let mut skipped_rows = 0usize;

    for rec in records {
        let (Some(code), Some(date)) = (rec.code, rec.date) else {
            skipped_rows += 1;
            continue;
        };
        let value = metric.value(rec);
        let matched = polygons.contains_key(&code);
        if !matched && !unmatched_codes.contains(&code) {
            unmatched_codes.push(code);
        }
        let name = match polygons.get(&code) {
            Some(Some(n)) if rec.municipio.is_empty() => s!(*n),
            _ => rec.municipio.clone(),
        };
        let region = Region {
            code,
            name,
            value,
            color: value.zip(bounds).map(|(v, b)| scale.at(b.normalize(v))),
            matched,
        };
        match by_date.iter_mut().find(|(d, _)| *d == date) {
            Some((_, regions)) => regions.push(region),
            None => by_date.push((date, vec![region])),
        }
    }

    by_date.sort_by_key(|(d, _)| *d);
    let frames = by_date.into_iter()
        .map(|(date, regions)| Frame { label: date.format("%d-%m-%Y").to_string(), date, regions })
        .collect::<Vec<_>>();

    if !unmatched_codes.is_empty() && geojson.is_some() {
        logw!("Mapa: {} code(s) without a polygon", unmatched_codes.len());
    }
    if skipped_rows > 0 {
        logd!("Mapa: {skipped_rows} row(s) without code or date skipped");
    }
    logf!("Mapa: {} frame(s) for {}", frames.len(), metric.slug());

    Choropleth { metric, scale, bounds, frames, unmatched_codes, skipped_rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        // pos = 0.05 * 9 = 0.45
        assert!((percentile(&v, 0.05).unwrap() - 1.45).abs() < 1e-12);
        // pos = 0.95 * 9 = 8.55
        assert!((percentile(&v, 0.95).unwrap() - 9.55).abs() < 1e-12);
        assert_eq!(percentile(&[f64::NAN, 4.0], 0.5), Some(4.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn bounds_clip_outliers() {
        let mut v: Vec<f64> = (0..=100).map(f64::from).collect();
        v.push(1_000_000.0);
        let clipped = ColorBounds::clipped(&v).unwrap();
        assert!(clipped.upper < 100.0);
        let full = ColorBounds::full(&v).unwrap();
        assert_eq!(full.upper, 1_000_000.0);
        assert_eq!(full.normalize(2_000_000.0), 1.0);
        assert_eq!(full.normalize(-5.0), 0.0);
    }

    #[test]
    fn scale_endpoints_and_midpoint() {
        let s = ColorScale::YlOrRd;
        assert_eq!(hex(s.at(0.0)), "#ffffcc");
        assert_eq!(hex(s.at(1.0)), "#800026");
        assert_eq!(hex(s.at(0.5)), "#fd8d3c");
        assert_eq!(s.at(2.0), s.at(1.0));
    }

    fn rec(code: i64, date: (i32, u32, u32), v: f64) -> EmendaRecord {
        let d = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        EmendaRecord {
            code: Some(code),
            municipio: format!("M{code}"),
            date: Some(d),
            date_label: d.format("%d-%m-%Y").to_string(),
            movimentacao: Some(v),
            acumulada: None,
            saldo: Some(v * 2.0),
        }
    }

    #[test]
    fn frames_are_chronological() {
        let recs = vec![rec(1, (2024, 5, 10), 5.0), rec(2, (2024, 5, 6), 1.0), rec(3, (2024, 5, 10), 9.0)];
        let map = build(&recs, Metric::MovimentacaoLiquida, None, false);
        assert_eq!(map.frames.iter().map(|f| f.label.as_str()).collect::<Vec<_>>(), ["06-05-2024", "10-05-2024"]);
        assert_eq!(map.frames[1].regions.len(), 2);
        assert_eq!(map.bounds, Some(ColorBounds { lower: 1.0, upper: 9.0 }));
        assert_eq!(map.frames[0].regions[0].color.map(hex).as_deref(), Some("#ffffcc"));
        assert_eq!(map.unmatched_codes, [1, 2, 3]);
        assert!(build(&recs, Metric::MovimentacaoAcumulada, None, true).bounds.is_none());
    }
}
