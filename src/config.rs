//! Publisher configuration
//!
//! Handles loading of the optional `metadex.yaml` file: the default
//! routing scope for emitted documents, which channels to publish, and
//! output formatting. Every section has serde defaults so an empty file
//! (or no file at all) yields a working configuration.

use crate::envelope::{DocumentScope, DEFAULT_LANGUAGE};
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level publisher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PublisherConfig {
    /// Default routing scope for every emitted document
    #[serde(default)]
    pub scope: ScopeConfig,

    /// Which document channels to publish
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,
}

/// Routing scope defaults
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScopeConfig {
    /// Language for translated texts and the index key
    #[serde(default = "default_language")]
    pub language: String,

    /// Client scope; negative means unscoped
    #[serde(default = "default_unscoped")]
    pub client_id: i32,

    /// Role scope; negative means unscoped
    #[serde(default = "default_unscoped")]
    pub role_id: i32,

    /// User scope; negative means unscoped
    #[serde(default = "default_unscoped")]
    pub user_id: i32,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_unscoped() -> i32 {
    -1
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            client_id: -1,
            role_id: -1,
            user_id: -1,
        }
    }
}

impl ScopeConfig {
    /// Build the immutable scope the assemblers consume.
    pub fn to_document_scope(&self) -> DocumentScope {
        DocumentScope::new()
            .with_language(self.language.clone())
            .with_client(self.client_id)
            .with_role(self.role_id)
            .with_user(self.user_id)
    }
}

/// Channel toggles
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChannelsConfig {
    #[serde(default = "default_true")]
    pub window: bool,

    #[serde(default = "default_true")]
    pub browser: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self { window: true, browser: true }
    }
}

/// Output formatting
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OutputConfig {
    /// Pretty-print emitted JSON
    #[serde(default)]
    pub pretty: bool,
}

impl PublisherConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: PublisherConfig = serde_norway::from_str(text)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Reject configurations that cannot produce valid index keys.
    pub fn validate(&self) -> Result<()> {
        if self.scope.language.trim().is_empty() {
            return Err(Error::Config("scope.language must not be empty".into()));
        }
        Ok(())
    }
}
