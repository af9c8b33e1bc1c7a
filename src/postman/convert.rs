//! Test plan to Postman collection conversion
//!
//! URL handling is plain string splitting. Host/path decomposition is fixed,
//! including the empty path list for URLs with a single path segment.

use serde_json::Value;

use crate::plan::{ApiKey, Requirement, TestCase, TestPlan};

use super::collection::{Body, Collection, Folder, Header, Info, QueryParam, Request, RequestItem, Url};

/// Default `info.name` when the plan has no `project_name`
pub const DEFAULT_COLLECTION_NAME: &str = "API Tests";

/// Methods whose body is carried into the collection
const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

/// Convert a loaded plan into a Postman collection
///
/// `source` is the plan path echoed into the description and `generated` the
/// timestamp; the output depends on nothing else.
pub fn convert(plan: &TestPlan, source: &str, generated: &str) -> Collection {
    let name = plan
        .project_name
        .as_deref()
        .unwrap_or(DEFAULT_COLLECTION_NAME);
    let description = format!("Converted from test plan: {source}\nGenerated: {generated}");

    let item = plan
        .requirements
        .iter()
        .map(|req| convert_requirement(req, plan.base_url(), plan.api_key()))
        .collect();

    Collection {
        info: Info::new(name, description),
        item,
    }
}

/// One requirement becomes one folder, test cases kept in order
pub fn convert_requirement(req: &Requirement, base_url: &str, api_key: Option<&ApiKey>) -> Folder {
    Folder {
        name: format!("{} - {}", req.id(), req.name()),
        description: req.description().to_string(),
        item: req
            .test_cases
            .iter()
            .map(|case| convert_test_case(case, base_url, api_key))
            .collect(),
    }
}

/// Convert a single test case to a Postman request item
pub fn convert_test_case(case: &TestCase, base_url: &str, api_key: Option<&ApiKey>) -> RequestItem {
    let method = case.method();
    let url = format!("{base_url}{}", case.path());
    let (raw_url, query) = split_query(&url);

    let mut header: Vec<Header> = case
        .headers
        .iter()
        .flatten()
        .map(|(key, value)| Header::text(key.clone(), value.clone()))
        .collect();
    // Appended even when the case already sets the same header
    if let Some(key) = api_key {
        header.push(Header::text(key.header.clone(), Value::String(key.value.clone())));
    }

    let body = case
        .body
        .as_ref()
        .filter(|body| is_truthy(body) && BODY_METHODS.contains(&method.as_str()))
        .map(|body| Body::raw_json(to_pretty_json(body)));

    RequestItem {
        name: case.name().to_string(),
        request: Request {
            method,
            header,
            url: Url {
                raw: url.clone(),
                protocol: "http".to_string(),
                host: url_host(raw_url),
                path: url_path(raw_url),
                query,
            },
            body,
            description: describe(case),
        },
        response: Vec::new(),
        event: Vec::new(),
    }
}

/// Split off the query string at the first `?`
///
/// Only `key=value` pairs are kept; nothing is URL-decoded.
fn split_query(url: &str) -> (&str, Vec<QueryParam>) {
    let Some((raw_url, query_string)) = url.split_once('?') else {
        return (url, Vec::new());
    };

    let query = query_string
        .split('&')
        .filter_map(|param| param.split_once('='))
        .map(|(key, value)| QueryParam {
            key: key.to_string(),
            value: value.to_string(),
            description: String::new(),
        })
        .collect();

    (raw_url, query)
}

/// Authority of the URL split on `:` to separate the port
fn url_host(raw_url: &str) -> Vec<String> {
    let stripped = raw_url.replace("http://", "").replace("https://", "");
    let authority = stripped.split('/').next().unwrap_or_default();
    authority.split(':').map(str::to_string).collect()
}

/// Everything after the third `/`, kept only when it holds another `/`
fn url_path(raw_url: &str) -> Vec<String> {
    let parts: Vec<&str> = raw_url.splitn(4, '/').collect();
    match parts.get(3) {
        Some(tail) if tail.contains('/') => vec![tail.to_string()],
        _ => Vec::new(),
    }
}

/// Description, expected status and expected response, blank-line separated
fn describe(case: &TestCase) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(description) = case.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(description.to_string());
    }
    if let Some(status) = case.expected_status() {
        parts.push(format!("Expected Status: {status}"));
    }
    if let Some(expected) = case.expected_response.as_ref().filter(|v| is_truthy(v)) {
        parts.push(format!("Expected Response: {}", to_pretty_json(expected)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Empty containers, empty strings, zero, false and null count as absent
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn to_pretty_json(value: &Value) -> String {
    // Serializing a Value cannot fail
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
