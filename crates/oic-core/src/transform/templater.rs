use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::{Captures, Regex};

/// `{` followed by everything up to (not including) the next `}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)").expect("placeholder pattern is valid"));

/// Names allowed into the generated environment.
static ENVIRONMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]+$").expect("environment name pattern is valid"));

/// Distinct placeholder names seen while templating, in first-seen order.
///
/// One set belongs to one collection build; it is never shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSet {
    names: IndexSet<String>,
}

impl CaptureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`. Returns `false` if it was already captured.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Captured names that qualify as environment variables.
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|name| is_environment_name(name))
    }
}

/// ASCII letters and underscores only, at least one character.
pub fn is_environment_name(name: &str) -> bool {
    ENVIRONMENT_NAME_RE.is_match(name)
}

/// Rewrite `{name}` placeholders into the importer's template syntax,
/// recording every name in `captures`.
///
/// Only `{name` is consumed and replaced with `{{ name }`; the source's own
/// closing brace is kept, so `/users/{id}` becomes `/users/{{ id }}`.
pub fn template_path(path: &str, captures: &mut CaptureSet) -> String {
    PLACEHOLDER_RE
        .replace_all(path, |caps: &Captures| {
            let name = &caps[1];
            captures.insert(name);
            format!("{{{{ {name} }}")
        })
        .into_owned()
}
