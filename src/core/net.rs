// src/core/net.rs
//
// Blocking HTTP GET behind a small trait so the pipeline can be driven by a
// scripted transport in tests. No retry, no backoff: callers decide what a
// failed request means.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub accept: Option<&'static str>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), query: Vec::new(), bearer: None, accept: None }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((s!(key), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(String::from);
        self
    }

    pub fn accept(mut self, mime: &'static str) -> Self {
        self.accept = Some(mime);
        self
    }

    /// `url?k=v&k=v`, unencoded. For logs and test matching only.
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let qs = self.query.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        join!(&self.url, "?", &qs)
    }

    /// Value of the first query pair named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Anything but 200 becomes `Error::Status`.
    pub fn require_ok(self, req: &Request) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::Status { url: req.describe(), status: self.status })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

pub trait Transport: Send + Sync {
    fn get(&self, req: &Request) -> Result<Response>;
}

/// `reqwest::blocking` transport.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpClient {
    fn get(&self, req: &Request) -> Result<Response> {
        let mut builder = self.client.get(&req.url).query(&req.query);
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(mime) = req.accept {
            builder = builder.header(ACCEPT, mime);
        }

        logd!("HTTP: GET {}", req.describe());
        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Response { status, body })
    }
}
