//! The collection build: Swagger paths in, export document out.
//!
//! A build walks `paths` in document order, maps every tagged operation to
//! one request per tag, then assembles groups and the environment. All state
//! for one build lives in a [`BuildRun`] created fresh by each call.

pub mod assembler;
pub mod ids;
pub mod operation_mapper;
pub mod templater;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;

use crate::EXPORT_SOURCE;
use crate::error::TransformError;
use crate::export::ExportDocument;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::SpecDocument;

use ids::IdAllocator;
use operation_mapper::{OperationSite, PendingRequest, map_operation};
use templater::CaptureSet;

/// Naming of the generated collection and its environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Title of the root request group.
    pub name: String,
    pub environment_name: String,
    /// Environment variable prefixed to every request URL.
    pub api_root_var: String,
    /// Default value of `api_root_var`.
    pub api_root: String,
    /// Environment variable holding the bearer token.
    pub token_var: String,
    /// `__export_source` value.
    pub source: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            name: "REST API".to_string(),
            environment_name: "Base Environment".to_string(),
            api_root_var: "api_root".to_string(),
            api_root: String::new(),
            token_var: "api_token".to_string(),
            source: EXPORT_SOURCE.to_string(),
        }
    }
}

impl CollectionOptions {
    pub fn api_root_reference(&self) -> String {
        format!("{{{{ {} }}}}", self.api_root_var)
    }

    pub fn token_reference(&self) -> String {
        format!("{{{{ {} }}}}", self.token_var)
    }
}

/// Mutable state scoped to a single build.
#[derive(Debug, Default)]
pub(crate) struct BuildRun {
    pub captures: CaptureSet,
    pub ids: IdAllocator,
    /// Distinct tags in first-seen order.
    pub tags: IndexSet<String>,
    pub requests: Vec<PendingRequest>,
    pub dropped_operations: usize,
}

/// Builds export documents. Reusable; every call starts from empty state.
#[derive(Debug, Clone, Default)]
pub struct CollectionBuilder {
    options: CollectionOptions,
}

impl CollectionBuilder {
    pub fn new(options: CollectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CollectionOptions {
        &self.options
    }

    /// Build a document stamped with the current time.
    pub fn build(&self, spec: &SpecDocument) -> Result<ExportDocument, TransformError> {
        self.build_at(spec, Utc::now())
    }

    /// Build a document stamped with `exported_at`.
    pub fn build_at(
        &self,
        spec: &SpecDocument,
        exported_at: DateTime<Utc>,
    ) -> Result<ExportDocument, TransformError> {
        let resolver = RefResolver::new(spec);
        let mut run = BuildRun::default();

        for (path, item) in &spec.paths {
            for (method_key, method, operation) in item.operations() {
                let site = OperationSite {
                    path,
                    method_key,
                    method,
                    operation,
                    shared_parameters: &item.parameters,
                };
                map_operation(&site, &resolver, &self.options, &mut run)?;
            }
        }

        log::debug!(
            "mapped {} requests across {} tags ({} untagged operations dropped, {} path variables)",
            run.requests.len(),
            run.tags.len(),
            run.dropped_operations,
            run.captures.len()
        );

        Ok(assembler::assemble(&self.options, run, exported_at))
    }
}

/// Build with default options.
pub fn build_collection(spec: &SpecDocument) -> Result<ExportDocument, TransformError> {
    CollectionBuilder::default().build(spec)
}

/// Path variables a build would capture, without building.
pub fn capture_path_variables(spec: &SpecDocument) -> CaptureSet {
    let mut captures = CaptureSet::new();
    for (path, item) in &spec.paths {
        if item.operations().any(|(_, _, op)| !op.tags.is_empty()) {
            templater::template_path(path, &mut captures);
        }
    }
    captures
}
