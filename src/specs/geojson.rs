// src/specs/geojson.rs
//! Municipality polygons. Only `properties.id` (IBGE code) and
//! `properties.name` are interpreted; geometry is carried through untouched.

use serde::Deserialize;
use serde_json::Value as Json;

use crate::core::net::{Request, Transport};
use crate::error::Result;

#[derive(Clone, Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub geometry: Json,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub id: Option<Json>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Feature {
    /// Feature key, accepting `"4300034"`, `4300034` and `4300034.0`.
    pub fn code(&self) -> Option<i64> {
        match self.properties.id.as_ref()? {
            Json::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|x| x as i64)),
            Json::String(s) => crate::emendas::parse_code(s),
            _ => None,
        }
    }
}

impl FeatureCollection {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn find(&self, code: i64) -> Option<&Feature> {
        self.features.iter().find(|f| f.code() == Some(code))
    }
}

pub fn fetch_geojson(transport: &dyn Transport, url: &str) -> Result<FeatureCollection> {
    let req = Request::get(url);
    let resp = transport.get(&req)?.require_ok(&req)?;
    let fc = FeatureCollection::parse(&resp.body)?;
    logf!("GeoJSON: {} feature(s) from {url}", fc.features.len());
    Ok(fc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_in_any_numeric_shape() {
        let fc = FeatureCollection::parse(r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"id":"4300034","name":"Aceguá"},"geometry":null},
            {"type":"Feature","properties":{"id":4300059,"name":"Água Santa"},"geometry":null},
            {"type":"Feature","properties":{"name":"Sem código"},"geometry":null}
        ]}"#).unwrap();
        assert_eq!(fc.features[0].code(), Some(4300034));
        assert_eq!(fc.features[1].code(), Some(4300059));
        assert_eq!(fc.features[2].code(), None);
        assert_eq!(fc.find(4300059).and_then(|f| f.properties.name.as_deref()), Some("Água Santa"));
    }
}
