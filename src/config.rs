//! Runtime configuration.
//!
//! Configuration is plain data handed to constructors. It can be loaded from
//! JSON and then adjusted from environment variables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Environment variable overriding [`IndexConfig::index_name`] for projects.
pub const ENV_PROJECT_INDEX_NAME: &str = "CONTENT_API_PROJECT_INDEX_NAME";
/// Environment variable overriding [`IndexConfig::index_type`] for projects.
pub const ENV_PROJECT_INDEX_TYPE: &str = "CONTENT_API_PROJECT_INDEX_TYPE";
/// Environment variable overriding [`RestConfig::default_page_size`].
pub const ENV_DEFAULT_PAGE_SIZE: &str = "CONTENT_API_DEFAULT_PAGE_SIZE";
/// Environment variable overriding [`RestConfig::max_page_size`].
pub const ENV_MAX_PAGE_SIZE: &str = "CONTENT_API_MAX_PAGE_SIZE";

/// Search index coordinates for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Name of the search index
    pub index_name: String,
    /// Document type inside the index
    pub index_type: String,
}

impl IndexConfig {
    /// Creates index coordinates.
    pub fn new(index_name: impl Into<String>, index_type: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            index_type: index_type.into(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new("projects", "project")
    }
}

/// Settings of the REST layer for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Fields stripped from every entity returned by list calls
    pub fields_to_remove: Vec<String>,
    /// Page size used when the caller does not ask for one
    pub default_page_size: usize,
    /// Upper bound for caller-requested page sizes
    pub max_page_size: usize,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            fields_to_remove: Vec::new(),
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use content_aggregator::ApiConfig;
///
/// let config = ApiConfig::from_json(r#"{ "project_index": { "index_name": "dcp_projects", "index_type": "project" } }"#)
///     .expect("valid config");
/// assert_eq!(config.project_index.index_name, "dcp_projects");
/// assert_eq!(config.project_rest.default_page_size, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Index coordinates of the project search index
    pub project_index: IndexConfig,
    /// REST settings for project endpoints
    pub project_rest: RestConfig,
}

impl ApiConfig {
    /// Parses configuration from JSON; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON or inconsistent values.
    pub fn from_json(input: &str) -> Result<Self, Error> {
        let config: ApiConfig =
            serde_json::from_str(input).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, Error> {
        let vars: HashMap<String, String> = [
            ENV_PROJECT_INDEX_NAME,
            ENV_PROJECT_INDEX_TYPE,
            ENV_DEFAULT_PAGE_SIZE,
            ENV_MAX_PAGE_SIZE,
        ]
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect();
        self.apply_overrides(&vars)
    }

    /// Applies overrides from a key/value source using the `CONTENT_API_*` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a numeric override does not parse or the
    /// resulting configuration is inconsistent.
    pub fn apply_overrides(mut self, vars: &HashMap<String, String>) -> Result<Self, Error> {
        if let Some(name) = vars.get(ENV_PROJECT_INDEX_NAME) {
            self.project_index.index_name = name.clone();
        }
        if let Some(index_type) = vars.get(ENV_PROJECT_INDEX_TYPE) {
            self.project_index.index_type = index_type.clone();
        }
        if let Some(size) = vars.get(ENV_DEFAULT_PAGE_SIZE) {
            self.project_rest.default_page_size = parse_size(ENV_DEFAULT_PAGE_SIZE, size)?;
        }
        if let Some(size) = vars.get(ENV_MAX_PAGE_SIZE) {
            self.project_rest.max_page_size = parse_size(ENV_MAX_PAGE_SIZE, size)?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.project_index.index_name.trim().is_empty() {
            return Err(Error::Config("project index name must not be empty".into()));
        }
        if self.project_index.index_type.trim().is_empty() {
            return Err(Error::Config("project index type must not be empty".into()));
        }
        if self.project_rest.max_page_size == 0 {
            return Err(Error::Config("max page size must be positive".into()));
        }
        if self.project_rest.default_page_size > self.project_rest.max_page_size {
            return Err(Error::Config(format!(
                "default page size {} exceeds max page size {}",
                self.project_rest.default_page_size, self.project_rest.max_page_size
            )));
        }
        Ok(())
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, value)))
}
