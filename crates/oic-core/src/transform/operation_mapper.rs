use indexmap::IndexMap;

use super::CollectionOptions;
use super::BuildRun;
use super::templater::template_path;
use crate::error::TransformError;
use crate::export::{Authentication, JSON_MIME_TYPE, Request, RequestBody, RequestParameter};
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::ref_resolve::RefResolver;

/// A request whose parent group is not known until every tag has been seen.
#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    pub tag: String,
    pub request: Request,
}

/// One operation at one path, as handed to [`map_operation`].
pub(crate) struct OperationSite<'s> {
    pub path: &'s str,
    /// The method key exactly as written in the document.
    pub method_key: &'s str,
    pub method: HttpMethod,
    pub operation: &'s Operation,
    /// Parameters declared on the enclosing path item.
    pub shared_parameters: &'s [ParameterOrRef],
}

/// Emit one pending request per tag of the operation.
///
/// Untagged operations are dropped before any placeholder is captured.
pub(crate) fn map_operation<'s>(
    site: &OperationSite<'s>,
    resolver: &RefResolver<'s>,
    options: &CollectionOptions,
    run: &mut BuildRun,
) -> Result<(), TransformError> {
    let op = site.operation;
    if op.tags.is_empty() {
        log::warn!(
            "dropping {} {}: operation has no tags",
            site.method,
            site.path
        );
        run.dropped_operations += 1;
        return Ok(());
    }

    let mut body = RequestBody::default();
    let mut parameters = Vec::new();
    for param in collect_parameters(resolver, site.shared_parameters, &op.parameters)? {
        match param.location {
            ParameterLocation::Body => {
                if let Some(example) = example_body(resolver, param)? {
                    body = example;
                }
            }
            ParameterLocation::Path => parameters.push(RequestParameter::placeholder(&param.name)),
            ParameterLocation::Query
            | ParameterLocation::Header
            | ParameterLocation::FormData
            | ParameterLocation::Cookie => {}
        }
    }

    let url = format!(
        "{}{}",
        options.api_root_reference(),
        template_path(site.path, &mut run.captures)
    );
    let name = display_name(site, op);
    let description = op.description.clone().unwrap_or_default();

    for tag in &op.tags {
        run.tags.insert(tag.clone());
        run.requests.push(PendingRequest {
            tag: tag.clone(),
            request: Request {
                id: run.ids.next_request(),
                parent_id: String::new(),
                name: name.clone(),
                description: description.clone(),
                method: site.method_key.to_string(),
                url: url.clone(),
                body: body.clone(),
                headers: Vec::new(),
                parameters: parameters.clone(),
                authentication: Authentication::bearer(options.token_reference()),
            },
        });
    }

    Ok(())
}

/// Summary, then operationId, then `METHOD /path`.
fn display_name(site: &OperationSite<'_>, op: &Operation) -> String {
    op.summary
        .clone()
        .or_else(|| op.operation_id.clone())
        .unwrap_or_else(|| format!("{} {}", site.method, site.path))
}

/// Path-level parameters first, minus any the operation redeclares with the
/// same name and location, followed by the operation's own.
fn collect_parameters<'p>(
    resolver: &RefResolver<'p>,
    shared: &'p [ParameterOrRef],
    own: &'p [ParameterOrRef],
) -> Result<Vec<&'p Parameter>, TransformError> {
    let own = own
        .iter()
        .map(|p| resolver.resolve_parameter(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = Vec::with_capacity(shared.len() + own.len());
    for p in shared {
        let p = resolver.resolve_parameter(p)?;
        let overridden = own
            .iter()
            .any(|o| o.name == p.name && o.location == p.location);
        if !overridden {
            merged.push(p);
        }
    }
    merged.extend(own);
    Ok(merged)
}

/// Build the placeholder payload for a body parameter.
///
/// `None` when the schema declares no `required` list. An empty list still
/// yields `{}` as text but no content type.
fn example_body<'p>(
    resolver: &RefResolver<'p>,
    param: &'p Parameter,
) -> Result<Option<RequestBody>, TransformError> {
    let Some(schema) = param.schema.as_ref() else {
        return Ok(None);
    };
    let schema = resolver.resolve_schema(schema)?;
    let Some(required) = schema.required.as_ref() else {
        return Ok(None);
    };

    let mut fields: IndexMap<&str, &str> = IndexMap::new();
    for field in required {
        fields.entry(field.as_str()).or_insert(field.as_str());
    }

    Ok(Some(RequestBody {
        mime_type: (!fields.is_empty()).then(|| JSON_MIME_TYPE.to_string()),
        text: Some(serde_json::to_string(&fields)?),
    }))
}
