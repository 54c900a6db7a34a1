//! The Insomnia v3 export entity graph.
//!
//! Resources reference each other through `parentId`; the importer resolves
//! those by identifier. Field names follow the importer's JSON schema.

pub mod writer;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

pub use writer::write_document;

/// Export format version understood by the importer.
pub const EXPORT_FORMAT: u32 = 3;

pub const JSON_MIME_TYPE: &str = "application/json";

/// Marker serialized as the envelope's `_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    #[default]
    Export,
}

/// The top-level export envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    #[serde(rename = "_type")]
    pub kind: ExportKind,

    #[serde(rename = "__export_format")]
    pub format: u32,

    #[serde(rename = "__export_date", serialize_with = "serialize_export_date")]
    pub exported_at: DateTime<Utc>,

    #[serde(rename = "__export_source")]
    pub source: String,

    /// `[root group, environment, ...tag groups, ...requests]`.
    pub resources: Vec<Resource>,
}

fn serialize_export_date<S: Serializer>(
    date: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl ExportDocument {
    pub fn groups(&self) -> impl Iterator<Item = &RequestGroup> {
        self.resources.iter().filter_map(|r| match r {
            Resource::RequestGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Request(req) => Some(req),
            _ => None,
        })
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.resources.iter().find_map(|r| match r {
            Resource::Environment(env) => Some(env),
            _ => None,
        })
    }

    pub fn group(&self, id: &str) -> Option<&RequestGroup> {
        self.groups().find(|g| g.id == id)
    }

    /// Serialize with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One entry of `resources`, discriminated by `_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum Resource {
    RequestGroup(RequestGroup),
    Environment(Environment),
    Request(Request),
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Resource::RequestGroup(g) => &g.id,
            Resource::Environment(e) => &e.id,
            Resource::Request(r) => &r.id,
        }
    }

    pub fn parent_id(&self) -> &str {
        match self {
            Resource::RequestGroup(g) => &g.parent_id,
            Resource::Environment(e) => &e.parent_id,
            Resource::Request(r) => &r.parent_id,
        }
    }
}

/// A folder in the request tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestGroup {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub name: String,
    pub data: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub name: String,
    pub description: String,
    pub method: String,
    pub url: String,
    pub body: RequestBody,
    pub headers: Vec<Header>,
    pub parameters: Vec<RequestParameter>,
    pub authentication: Authentication,
}

/// Example payload. Serializes to `{}` when neither field is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestBody {
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        self.mime_type.is_none() && self.text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestParameter {
    pub name: String,
    pub value: String,
}

impl RequestParameter {
    /// A parameter whose value echoes its own name.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
    pub token: String,
    #[serde(rename = "type")]
    pub kind: AuthKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Bearer,
}

impl Authentication {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            kind: AuthKind::Bearer,
        }
    }
}
