use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use super::ids::{ENVIRONMENT_ID, IdAllocator, ROOT_GROUP_ID, WORKSPACE_ID};
use super::operation_mapper::PendingRequest;
use super::templater::{CaptureSet, is_environment_name};
use super::{BuildRun, CollectionOptions};
use crate::export::{
    EXPORT_FORMAT, Environment, ExportDocument, ExportKind, Request, RequestGroup, Resource,
};

/// Compose the final document: root group, environment, tag groups, requests.
pub(crate) fn assemble(
    options: &CollectionOptions,
    run: BuildRun,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    let BuildRun {
        captures,
        mut ids,
        tags,
        requests,
        ..
    } = run;

    let root = RequestGroup {
        id: ROOT_GROUP_ID.to_string(),
        parent_id: WORKSPACE_ID.to_string(),
        name: options.name.clone(),
    };
    let environment = build_environment(options, &captures);
    let groups = build_tag_groups(&tags, &mut ids);
    let requests = resolve_parents(requests, &groups);

    let mut resources = Vec::with_capacity(2 + groups.len() + requests.len());
    resources.push(Resource::RequestGroup(root));
    resources.push(Resource::Environment(environment));
    resources.extend(groups.into_iter().map(Resource::RequestGroup));
    resources.extend(requests.into_iter().map(Resource::Request));

    ExportDocument {
        kind: ExportKind::Export,
        format: EXPORT_FORMAT,
        exported_at,
        source: options.source.clone(),
        resources,
    }
}

/// One group per distinct tag, ordered case-insensitively.
///
/// The sort is stable, so tags equal ignoring case keep first-seen order.
fn build_tag_groups(tags: &IndexSet<String>, ids: &mut IdAllocator) -> Vec<RequestGroup> {
    let mut sorted: Vec<&String> = tags.iter().collect();
    sorted.sort_by_cached_key(|tag| tag.to_lowercase());

    sorted
        .into_iter()
        .map(|tag| RequestGroup {
            id: ids.next_group(),
            parent_id: ROOT_GROUP_ID.to_string(),
            name: tag.clone(),
        })
        .collect()
}

fn resolve_parents(pending: Vec<PendingRequest>, groups: &[RequestGroup]) -> Vec<Request> {
    let lookup: HashMap<&str, &str> = groups
        .iter()
        .map(|g| (g.name.as_str(), g.id.as_str()))
        .collect();

    pending
        .into_iter()
        .map(|PendingRequest { tag, mut request }| {
            request.parent_id = lookup
                .get(tag.as_str())
                .copied()
                .unwrap_or(ROOT_GROUP_ID)
                .to_string();
            request
        })
        .collect()
}

/// The two fixed entries, then one entry per qualifying captured name.
fn build_environment(options: &CollectionOptions, captures: &CaptureSet) -> Environment {
    let mut data = IndexMap::new();
    data.insert(options.api_root_var.clone(), options.api_root.clone());
    data.insert(options.token_var.clone(), String::new());

    for name in captures.iter() {
        if !is_environment_name(name) {
            log::warn!(
                "path variable `{name}` left out of the environment: \
                 only letters and underscores are allowed"
            );
            continue;
        }
        if data.contains_key(name) {
            log::warn!(
                "path variable `{name}` collides with a fixed environment entry; \
                 keeping the fixed value"
            );
            continue;
        }
        data.insert(name.to_string(), name.to_string());
    }

    Environment {
        id: ENVIRONMENT_ID.to_string(),
        parent_id: WORKSPACE_ID.to_string(),
        name: options.environment_name.clone(),
        data,
    }
}
