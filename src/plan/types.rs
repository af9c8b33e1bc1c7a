//! Test plan data model
//!
//! Defines the data structures for deserializing JSON test plans. Every
//! field is optional in the document; accessors supply the defaults.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// Header mapping as written in the plan, in declaration order
pub type Headers = Map<String, Value>;

/// Key inside `fixtures` that holds teardown requests instead of a fixture
pub const CLEANUP_KEY: &str = "cleanup";

/// A complete test plan loaded from a JSON file
#[derive(Deserialize, Debug, Default)]
pub struct TestPlan {
    /// Human-readable project name
    #[serde(default, deserialize_with = "lenient_text")]
    pub project_name: Option<String>,
    /// Free-form test category (e.g. "backend")
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_type: Option<String>,
    /// Prefix for every request path
    pub base_url: Option<String>,
    /// Credentials attached to every request
    pub authentication: Option<Authentication>,
    /// Setup resources created before the run
    pub fixtures: Option<Fixtures>,
    /// Requirements in execution order
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl TestPlan {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(Self::DEFAULT_BASE_URL)
    }

    /// The api-key header declared under `authentication`, if any
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.authentication.as_ref()?.api_key.as_ref()
    }

    pub fn fixtures(&self) -> Option<&Fixtures> {
        self.fixtures.as_ref()
    }

    /// Total number of test cases across all requirements
    pub fn test_case_count(&self) -> usize {
        self.requirements.iter().map(|r| r.test_cases.len()).sum()
    }
}

/// Authentication block of a plan
#[derive(Deserialize, Debug, Clone)]
pub struct Authentication {
    pub api_key: Option<ApiKey>,
}

/// An api-key sent as a request header
#[derive(Deserialize, Debug, Clone)]
pub struct ApiKey {
    /// Header name, e.g. `api_key`
    pub header: String,
    /// Header value
    pub value: String,
}

/// Fixture declarations: named setup requests plus the `cleanup` list
#[derive(Debug, Default)]
pub struct Fixtures {
    /// Setup requests in declaration order
    pub setups: Vec<(String, FixtureSetup)>,
    /// Teardown requests issued after the run
    pub cleanup: Vec<CleanupStep>,
}

impl<'de> Deserialize<'de> for Fixtures {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FixturesVisitor;

        impl<'de> Visitor<'de> for FixturesVisitor {
            type Value = Fixtures;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of fixture names to setup requests")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Fixtures, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fixtures = Fixtures::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key == CLEANUP_KEY {
                        fixtures.cleanup = map
                            .next_value::<Option<Vec<CleanupStep>>>()?
                            .unwrap_or_default();
                    } else {
                        let setup = map.next_value::<FixtureSetup>()?;
                        fixtures.setups.push((key, setup));
                    }
                }
                Ok(fixtures)
            }
        }

        deserializer.deserialize_map(FixturesVisitor)
    }
}

/// A request that creates one named fixture
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FixtureSetup {
    /// POST (default) or PUT; anything else is skipped
    pub method: Option<String>,
    pub path: Option<String>,
    pub headers: Option<Headers>,
    pub body: Option<Value>,
}

impl FixtureSetup {
    pub fn method(&self) -> String {
        upper_or(self.method.as_deref(), "POST")
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }
}

/// A teardown request; `{fixture.id}` in its path is filled from setup data
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CleanupStep {
    /// Defaults to DELETE
    pub method: Option<String>,
    pub path: Option<String>,
    pub headers: Option<Headers>,
}

impl CleanupStep {
    pub fn method(&self) -> String {
        upper_or(self.method.as_deref(), "DELETE")
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }
}

/// A group of related test cases
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Requirement {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Requirement {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Requirement")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// A single HTTP request with its expectations
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TestCase {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// GET, POST, PUT, DELETE (case-insensitive)
    pub method: Option<String>,
    /// Request path, may contain `{fixture.field}` placeholders
    pub path: Option<String>,
    pub headers: Option<Headers>,
    /// JSON request body, may contain placeholders
    pub body: Option<Value>,
    /// Exact status code the response must have
    #[serde(default, deserialize_with = "lenient_status")]
    pub expected_status: Option<i64>,
    /// Kept verbatim so it can be echoed into documentation
    pub expected_response: Option<Value>,
    /// Header name -> type hint; only presence is checked
    pub expected_headers: Option<Headers>,
}

impl TestCase {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Test")
    }

    pub fn method(&self) -> String {
        upper_or(self.method.as_deref(), "GET")
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }

    /// Declared status code; zero counts as not declared
    pub fn expected_status(&self) -> Option<i64> {
        self.expected_status.filter(|s| *s != 0)
    }

    /// Parsed body expectations, present only for a non-empty object
    pub fn expected_response(&self) -> Option<ExpectedResponse> {
        match &self.expected_response {
            Some(Value::Object(map)) if !map.is_empty() => Some(ExpectedResponse::from_map(map)),
            _ => None,
        }
    }

    pub fn expected_headers(&self) -> impl Iterator<Item = &str> {
        self.expected_headers
            .iter()
            .flat_map(|headers| headers.keys().map(String::as_str))
    }
}

/// Assertions on the response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedResponse {
    /// Top-level keys the response object must have
    pub contains: Option<Vec<String>>,
    /// Same check, reported under a different message
    pub contains_keys: Option<Vec<String>>,
    /// Expected JSON shape: array, object or string
    pub shape: Option<String>,
}

impl ExpectedResponse {
    /// Read each assertion on its own; a malformed one is dropped with a
    /// warning and the others still apply
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let shape = match map.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                tracing::warn!(value = %other, "Ignoring expected_response.type: not a string");
                None
            }
        };

        Self {
            contains: string_list(map, "contains"),
            contains_keys: string_list(map, "contains_keys"),
            shape,
        }
    }

    /// The declared shape if it is one the runner knows how to check
    pub fn shape(&self) -> Option<ResponseShape> {
        self.shape.as_deref().and_then(ResponseShape::parse)
    }
}

/// Runtime shape of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Array,
    Object,
    String,
}

impl ResponseShape {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::String => value.is_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
        }
    }
}

fn upper_or(method: Option<&str>, default: &str) -> String {
    method.unwrap_or(default).to_uppercase()
}

/// An array of strings under `key`, or `None` with a warning for any other shape
fn string_list(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let value = map.get(key)?;
    let list = match value {
        Value::Null => return None,
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>(),
        _ => None,
    };
    if list.is_none() {
        tracing::warn!(field = key, %value, "Ignoring expected_response field: not an array of strings");
    }
    list
}

/// Text field that also accepts numbers and booleans, rendered as JSON text
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Status code written as an integer, an integral float or a numeric string
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let status = match &value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    if status.is_none() {
        if let Some(value) = &value {
            tracing::warn!(%value, "Ignoring expected_status: not an integer");
        }
    }
    Ok(status)
}
