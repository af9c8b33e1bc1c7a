//! Postman Collection v2.1 document types
//!
//! Field declaration order is the serialized key order, which keeps
//! generated files stable across runs.

use serde::Serialize;
use serde_json::Value;

/// `info.schema` of every generated collection
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// A collection whose top-level items are `I` (requirement folders by default)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Collection<I = Folder> {
    pub info: Info,
    pub item: Vec<I>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Info {
    pub name: String,
    pub description: String,
    pub schema: String,
}

impl Info {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: SCHEMA_URL.to_string(),
        }
    }
}

/// One requirement: a folder of requests
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: String,
    pub description: String,
    pub item: Vec<RequestItem>,
}

/// A folder of requirement folders in a combined collection
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategoryFolder {
    pub name: String,
    pub item: Vec<Folder>,
    pub description: String,
}

/// One test case
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RequestItem {
    pub name: String,
    pub request: Request,
    pub response: Vec<Value>,
    pub event: Vec<Value>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    pub url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Header {
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Header {
    pub fn text(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            kind: "text".to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Url {
    pub raw: String,
    pub protocol: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    pub query: Vec<QueryParam>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
    pub description: String,
}

/// Raw JSON request body
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Body {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

impl Body {
    pub fn raw_json(raw: String) -> Self {
        Self {
            mode: "raw".to_string(),
            raw,
            options: BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RawOptions {
    pub language: String,
}

impl Folder {
    pub fn request_count(&self) -> usize {
        self.item.len()
    }
}

impl CategoryFolder {
    pub fn request_count(&self) -> usize {
        self.item.iter().map(Folder::request_count).sum()
    }
}

impl Collection<Folder> {
    pub fn folder_count(&self) -> usize {
        self.item.len()
    }

    pub fn request_count(&self) -> usize {
        self.item.iter().map(Folder::request_count).sum()
    }
}

impl Collection<CategoryFolder> {
    pub fn folder_count(&self) -> usize {
        self.item.iter().map(|c| c.item.len()).sum()
    }

    pub fn request_count(&self) -> usize {
        self.item.iter().map(CategoryFolder::request_count).sum()
    }
}
