use std::collections::HashSet;

use super::parameter::{Parameter, ParameterOrRef};
use super::schema::{Schema, SchemaOrRef};
use super::spec::SpecDocument;
use crate::error::TransformError;

/// Resolves local `$ref` pointers against a document's reusable parameters
/// and schemas.
///
/// Both the Swagger 2 layout (`#/parameters/..`, `#/definitions/..`) and the
/// OpenAPI 3 layout (`#/components/parameters/..`, `#/components/schemas/..`)
/// are understood. Resolution borrows from the document; nothing is cloned.
pub struct RefResolver<'a> {
    spec: &'a SpecDocument,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a SpecDocument) -> Self {
        Self { spec }
    }

    pub fn resolve_parameter<'p>(
        &self,
        param: &'p ParameterOrRef,
    ) -> Result<&'p Parameter, TransformError>
    where
        'a: 'p,
    {
        match param {
            ParameterOrRef::Parameter(p) => Ok(p),
            ParameterOrRef::Ref { ref_path } => self.lookup_parameter(ref_path),
        }
    }

    /// Follow a chain of schema references to the first inline schema.
    pub fn resolve_schema<'p>(&self, schema: &'p SchemaOrRef) -> Result<&'p Schema, TransformError>
    where
        'a: 'p,
    {
        let mut visited = HashSet::new();
        let mut current = schema;
        loop {
            match current {
                SchemaOrRef::Schema(s) => return Ok(&**s),
                SchemaOrRef::Ref { ref_path } => {
                    if !visited.insert(ref_path.as_str()) {
                        return Err(TransformError::CircularRef(ref_path.clone()));
                    }
                    current = self.lookup_schema(ref_path)?;
                }
            }
        }
    }

    fn lookup_parameter(&self, ref_path: &str) -> Result<&'a Parameter, TransformError> {
        let target = match parse_ref(ref_path)? {
            RefTarget::Parameter(name) => self
                .spec
                .parameters
                .get(&name)
                .or_else(|| {
                    self.spec
                        .components
                        .as_ref()
                        .and_then(|c| c.parameters.get(&name))
                }),
            RefTarget::Schema(_) => {
                return Err(TransformError::InvalidRef(format!(
                    "expected a parameter reference, got {ref_path}"
                )));
            }
        };
        target.ok_or_else(|| TransformError::UnresolvedRef(ref_path.to_string()))
    }

    fn lookup_schema(&self, ref_path: &str) -> Result<&'a SchemaOrRef, TransformError> {
        let target = match parse_ref(ref_path)? {
            RefTarget::Schema(name) => self.spec.definitions.get(&name).or_else(|| {
                self.spec
                    .components
                    .as_ref()
                    .and_then(|c| c.schemas.get(&name))
            }),
            RefTarget::Parameter(_) => {
                return Err(TransformError::InvalidRef(format!(
                    "expected a schema reference, got {ref_path}"
                )));
            }
        };
        target.ok_or_else(|| TransformError::UnresolvedRef(ref_path.to_string()))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RefTarget {
    Parameter(String),
    Schema(String),
}

/// Split a local JSON pointer into its section and unescaped name.
fn parse_ref(ref_path: &str) -> Result<RefTarget, TransformError> {
    let invalid = || TransformError::InvalidRef(ref_path.to_string());

    let pointer = ref_path.strip_prefix("#/").ok_or_else(invalid)?;
    let pointer = pointer.strip_prefix("components/").unwrap_or(pointer);
    let (section, name) = pointer.split_once('/').ok_or_else(invalid)?;
    if name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    let name = name.replace("~1", "/").replace("~0", "~");

    match section {
        "parameters" => Ok(RefTarget::Parameter(name)),
        "definitions" | "schemas" => Ok(RefTarget::Schema(name)),
        _ => Err(invalid()),
    }
}
