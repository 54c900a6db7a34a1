use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;

/// HTTP methods a path item may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "trace" => Ok(HttpMethod::Trace),
            _ => Err(format!("unknown HTTP method `{s}`")),
        }
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Path item keys that carry no information for the export.
const IGNORED_PATH_FIELDS: &[&str] = &["summary", "description", "servers"];

/// A path item: shared parameters plus one operation per HTTP method.
///
/// Operations keep document order and are keyed by the method exactly as it
/// was written in the source document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, serde_json::Value>")]
pub struct PathItem {
    pub parameters: Vec<ParameterOrRef>,
    pub operations: IndexMap<String, Operation>,
}

impl PathItem {
    /// Iterate `(method as written, parsed method, operation)` in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.operations.iter().filter_map(|(key, op)| {
            key.parse::<HttpMethod>()
                .ok()
                .map(|method| (key.as_str(), method, op))
        })
    }
}

impl TryFrom<IndexMap<String, serde_json::Value>> for PathItem {
    type Error = String;

    fn try_from(fields: IndexMap<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();

        for (key, value) in fields {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)
                    .map_err(|e| format!("invalid path-level parameters: {e}"))?;
            } else if key.parse::<HttpMethod>().is_ok() {
                let op: Operation = serde_json::from_value(value)
                    .map_err(|e| format!("invalid `{key}` operation: {e}"))?;
                item.operations.insert(key, op);
            } else if key == "$ref" {
                return Err("path item `$ref` is not supported".to_string());
            } else if key.starts_with("x-") || IGNORED_PATH_FIELDS.contains(&key.as_str()) {
                continue;
            } else {
                return Err(format!("unknown path item field `{key}`"));
            }
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("fetch".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_path_item_keeps_document_order() {
        let yaml = r#"
post:
  tags: [users]
  summary: Create a user
get:
  tags: [users]
  summary: List users
x-internal: true
summary: Users collection
"#;
        let item: PathItem = serde_yaml_ng::from_str(yaml).unwrap();
        let methods: Vec<&str> = item.operations().map(|(key, _, _)| key).collect();
        assert_eq!(methods, vec!["post", "get"]);
        assert_eq!(
            item.operations["get"].summary.as_deref(),
            Some("List users")
        );
    }

    #[test]
    fn test_path_item_rejects_unknown_field() {
        let result: Result<PathItem, _> = serde_yaml_ng::from_str("fetch:\n  summary: x\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown path item field `fetch`"), "{err}");
    }

    #[test]
    fn test_path_item_rejects_ref() {
        let result: Result<PathItem, _> =
            serde_yaml_ng::from_str("$ref: '#/paths/~1other'\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_operation_without_tags() {
        let item: PathItem = serde_yaml_ng::from_str("get:\n  summary: Ping\n").unwrap();
        assert!(item.operations["get"].tags.is_empty());
        assert!(item.operations["get"].parameters.is_empty());
    }
}
