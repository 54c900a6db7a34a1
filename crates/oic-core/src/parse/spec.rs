use indexmap::IndexMap;
use serde::Deserialize;

use super::operation::PathItem;
use super::parameter::Parameter;
use super::schema::SchemaOrRef;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    pub version: String,
}

/// Reusable objects under `components` (OpenAPI 3 layout).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Components {
    pub parameters: IndexMap<String, Parameter>,
    pub schemas: IndexMap<String, SchemaOrRef>,
}

/// A parsed Swagger/OpenAPI document, reduced to what the export consumes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SpecDocument {
    #[serde(default)]
    pub swagger: Option<String>,

    #[serde(default)]
    pub openapi: Option<String>,

    #[serde(default)]
    pub info: Option<Info>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Document-level reusable parameters (`#/parameters/...`).
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    /// Document-level schemas (`#/definitions/...`).
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub components: Option<Components>,
}

impl SpecDocument {
    /// The declared format version, whichever of `swagger`/`openapi` is present.
    pub fn version(&self) -> Option<&str> {
        self.swagger.as_deref().or(self.openapi.as_deref())
    }

    /// Total number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations().count()).sum()
    }
}
