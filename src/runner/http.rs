//! HTTP transport for fixtures, test cases and cleanup

use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::common::{Error, Result};
use crate::plan::{ApiKey, Headers};

/// Hard timeout applied to every request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Methods the runner knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Parse an uppercase method name; anything else is unsupported
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Whether a JSON body is sent with this method
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
    /// Wall-clock time from send until the body was read
    pub elapsed: Duration,
}

impl HttpResponse {
    /// Body parsed as JSON, or the raw text as a JSON string
    pub fn json_or_text(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Body parsed as JSON, if it is JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Thin wrapper around a reqwest client with the fixed timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// The target is always the plan's base URL; proxy variables are ignored
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub(crate) fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    /// Send one request and read the whole body
    ///
    /// The JSON body is only attached for POST and PUT.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        tracing::debug!(?method, url, "Sending request");

        let mut request = self.client.request(method.to_reqwest(), url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if method.sends_body() {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| Error::from_request(e, self.timeout.as_secs()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_request(e, self.timeout.as_secs()))?;
        let elapsed = started.elapsed();

        tracing::debug!(status, elapsed_ms = elapsed.as_millis() as u64, "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }
}

/// Request headers: the api-key header first, then the request's own
/// headers, which win on a name collision
pub fn merge_headers(api_key: Option<&ApiKey>, overrides: Option<&Headers>) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::new();

    if let Some(key) = api_key {
        merged.push((key.header.clone(), key.value.clone()));
    }

    for (name, value) in overrides.into_iter().flatten() {
        let value = header_value(value);
        match merged.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => merged.push((name.clone(), value)),
        }
    }

    merged
}

fn header_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
