pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::SpecDocument;

/// Parse a Swagger/OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<SpecDocument, ParseError> {
    let spec: SpecDocument = serde_yaml_ng::from_str(input)?;
    Ok(spec)
}

/// Parse a Swagger/OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<SpecDocument, ParseError> {
    let spec: SpecDocument = serde_json::from_str(input)?;
    Ok(spec)
}

/// Parse by file extension: `.json` is read as JSON, anything else as YAML.
pub fn from_str_with_extension(
    input: &str,
    extension: Option<&str>,
) -> Result<SpecDocument, ParseError> {
    match extension {
        Some(ext) if ext.eq_ignore_ascii_case("json") => from_json(input),
        _ => from_yaml(input),
    }
}
