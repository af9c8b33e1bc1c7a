//! Fixture data and `{fixture.field}` placeholder substitution

use serde_json::{Map, Value};

/// Response bodies captured from fixture setup, keyed by fixture name
///
/// Filled once before the test cases run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureTable {
    entries: Map<String, Value>,
}

impl FixtureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Value) {
        self.entries.insert(name.into(), data);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fixtures whose data is a JSON object, with that object
    fn objects(&self) -> impl Iterator<Item = (&String, &Map<String, Value>)> {
        self.entries
            .iter()
            .filter_map(|(name, data)| data.as_object().map(|fields| (name, fields)))
    }
}

impl FromIterator<(String, Value)> for FixtureTable {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Replace placeholders throughout a JSON value
///
/// Strings have every `{fixture.field}` of every captured object replaced by
/// the field's text; arrays and objects are walked recursively; other values
/// are returned unchanged. Placeholders naming unknown fixtures or fields are
/// left as written.
pub fn resolve(value: &Value, fixtures: &FixtureTable) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_str(s, fixtures)),
        Value::Array(items) => Value::Array(items.iter().map(|v| resolve(v, fixtures)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve(v, fixtures)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// [`resolve`] for a plain string
pub fn resolve_str(s: &str, fixtures: &FixtureTable) -> String {
    let mut out = s.to_string();
    for (name, fields) in fixtures.objects() {
        for (field, field_value) in fields {
            let placeholder = format!("{{{name}.{field}}}");
            if out.contains(&placeholder) {
                out = out.replace(&placeholder, &value_text(field_value));
            }
        }
    }
    out
}

/// Fill `{fixture.id}` in a cleanup path; no other field is substituted
pub fn resolve_cleanup_path(path: &str, fixtures: &FixtureTable) -> String {
    let mut out = path.to_string();
    for (name, fields) in fixtures.objects() {
        if let Some(id) = fields.get("id") {
            out = out.replace(&format!("{{{name}.id}}"), &value_text(id));
        }
    }
    out
}

/// Text form of a field: strings verbatim, everything else as compact JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
