// File: src/config.rs
// Purpose: Action registry and list defaults parsed from silverghost.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use silverghost_actions::{
    ActionDefinition, ActionInstance, ActionRouter, Pagination, Pathgroups,
};
use silverghost_reducers::ListReducer;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub list: ListConfig,

    /// Action definitions, in registration order
    #[serde(default, rename = "action")]
    pub actions: Vec<ActionConfig>,
}

/// List defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

/// One `[[action]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Name the definition is looked up by
    pub name: String,

    /// Base action type (default: `@@App/<name>`)
    #[serde(default, rename = "type")]
    pub action_type: Option<String>,

    #[serde(default)]
    pub reducer_key: Option<String>,

    /// Path template, e.g. "/welcome/:channel/:query"
    #[serde(default)]
    pub pathname: Option<String>,

    #[serde(default)]
    pub pathgroups: Pathgroups,
}

// Default values
fn default_page_size() -> u64 {
    10
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

impl ListConfig {
    /// First page at the configured size
    pub fn pagination(&self) -> Pagination {
        Pagination::new(0, self.default_page_size)
    }

    /// List reducer for `definitions`, paging at the configured size
    pub fn list_reducer<I>(&self, initial: Option<ActionInstance>, definitions: I) -> ListReducer
    where
        I: IntoIterator<Item = Arc<ActionDefinition>>,
    {
        ListReducer::new(initial, definitions).with_page_size(self.default_page_size)
    }
}

impl ActionConfig {
    pub fn action_type(&self) -> String {
        self.action_type
            .clone()
            .unwrap_or_else(|| format!("@@App/{}", self.name))
    }

    pub fn to_definition(&self) -> ActionDefinition {
        let mut definition = ActionDefinition::new(self.action_type())
            .with_pathgroups(self.pathgroups.clone());
        if let Some(key) = &self.reducer_key {
            definition = definition.with_reducer_key(key);
        }
        if let Some(pathname) = &self.pathname {
            definition = definition.with_pathname(pathname);
        }
        definition
    }
}

impl Config {
    /// Load configuration from silverghost.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./silverghost.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("silverghost.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = toml::from_str(content).context("Invalid silverghost configuration")?;
        Ok(config)
    }

    /// Builds the router, registering actions in file order.
    ///
    /// Names and reducer keys must be unique.
    pub fn router(&self) -> Result<ActionRouter> {
        let mut names = HashSet::new();
        let mut reducer_keys = HashSet::new();
        let mut router = ActionRouter::new();

        for action in &self.actions {
            if !names.insert(action.name.as_str()) {
                bail!("Duplicate action name: {}", action.name);
            }
            if let Some(key) = &action.reducer_key {
                if !reducer_keys.insert(key.as_str()) {
                    bail!("Duplicate reducer key {} on action {}", key, action.name);
                }
            }
            router.register(action.to_definition());
        }

        Ok(router)
    }

    /// Definition of the action configured under `name`
    pub fn definition(&self, name: &str) -> Option<ActionDefinition> {
        self.actions
            .iter()
            .find(|action| action.name == name)
            .map(ActionConfig::to_definition)
    }
}
