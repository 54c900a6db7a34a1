use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::CollectionOptions;

/// Top-level project configuration loaded from `.oic.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OicConfig {
    /// Local spec file. Also the download target when `url` is set.
    pub input: String,
    /// Remote spec to download before generating.
    pub url: Option<String>,
    pub output: String,
    pub collection: CollectionConfig,
}

impl Default for OicConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            url: None,
            output: "dist/collection.json".to_string(),
            collection: CollectionConfig::default(),
        }
    }
}

/// Naming of the generated collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub name: String,
    pub environment_name: String,
    pub api_root_var: String,
    pub api_root: String,
    pub token_var: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        let defaults = CollectionOptions::default();
        Self {
            name: defaults.name,
            environment_name: defaults.environment_name,
            api_root_var: defaults.api_root_var,
            api_root: defaults.api_root,
            token_var: defaults.token_var,
        }
    }
}

impl From<&CollectionConfig> for CollectionOptions {
    fn from(cfg: &CollectionConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            environment_name: cfg.environment_name.clone(),
            api_root_var: cfg.api_root_var.clone(),
            api_root: cfg.api_root.clone(),
            token_var: cfg.token_var.clone(),
            ..CollectionOptions::default()
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oic.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OicConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: OicConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oic configuration
input: openapi.yaml
# url: https://example.com/openapi.yaml   # downloaded to `input` before generating
output: dist/collection.json

collection:
  name: REST API                  # root request group title
  environment_name: Base Environment
  api_root_var: api_root          # prefixed to every request URL
  api_root: ""                    # e.g. http://localhost:8065/api/v4
  token_var: api_token            # bearer token variable
"#
}
