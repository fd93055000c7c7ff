//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (the demonstration tree)
//! 2. Global config: `$XDG_CONFIG_HOME/degtree/degtree.toml`
//! 3. Local config: `--config <file>` or `./.degtree.toml`
//! 4. Environment variables: `DEGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::builder::{Edge, TreeBuilder};
use crate::errors::LayoutResult;

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".degtree.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },
}

/// Effective settings: tree shape plus search defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Degree bound shared by every node
    pub max_degree: usize,
    /// Key of the root node
    pub root_key: i64,
    /// Key of the default search start, the root if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_key: Option<i64>,
    /// Insertion requests, applied in order
    pub edges: Vec<Edge>,
}

/// Raw settings for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_degree: Option<usize>,
    pub root_key: Option<i64>,
    pub start_key: Option<i64>,
    pub edges: Option<Vec<Edge>>,
}

impl Default for Settings {
    //      1
    //    /   \
    //   2     3
    //       /   \
    //      4     5
    //          /   \
    //         10    11
    fn default() -> Self {
        Self {
            max_degree: 3,
            root_key: 1,
            start_key: None,
            edges: [(1, 2), (1, 3), (3, 4), (3, 5), (5, 10), (5, 11)]
                .into_iter()
                .map(|(parent, child)| Edge::new(parent, child))
                .collect(),
        }
    }
}

/// Get the XDG config directory for degtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "degtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("degtree.toml"))
}

/// Local config in the working directory, if present.
pub fn local_config_path() -> Option<PathBuf> {
    let path = PathBuf::from(LOCAL_CONFIG_FILE);
    path.exists().then_some(path)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value; `edges` are replaced, not merged.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_degree: overlay.max_degree.unwrap_or(self.max_degree),
            root_key: overlay.root_key.unwrap_or(self.root_key),
            start_key: overlay.start_key.or(self.start_key),
            edges: overlay
                .edges
                .clone()
                .unwrap_or_else(|| self.edges.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional local config file; it must exist when given
    #[instrument(level = "debug")]
    pub fn load(local: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        current = Self::apply_env_overrides(current, Environment::with_prefix("DEGTREE"))?;
        current.validate()?;
        Ok(current)
    }

    /// Apply `DEGTREE_*` variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("max_degree") {
            settings.max_degree = usize::try_from(val).map_err(|_| SettingsError::Config {
                message: format!("max_degree must not be negative, got {val}"),
            })?;
        }
        if let Ok(val) = config.get_int("root_key") {
            settings.root_key = val;
        }
        if let Ok(val) = config.get_int("start_key") {
            settings.start_key = Some(val);
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.max_degree == 0 {
            return Err(SettingsError::Config {
                message: "max_degree must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(self.max_degree, self.root_key)
            .edges(self.edges.iter().map(|edge| (edge.parent, edge.child)))
    }

    /// Build the configured tree.
    pub fn build_tree(&self) -> LayoutResult<Tree> {
        self.tree_builder().build()
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# degtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/degtree/degtree.toml
#   Local:  --config <file>, or ./.degtree.toml
#   Env:    DEGTREE_MAX_DEGREE, DEGTREE_ROOT_KEY, DEGTREE_START_KEY

# Degree bound: the root may hold max_degree children, other nodes max_degree - 1
# max_degree = 3

# Key of the root node
# root_key = 1

# Key of the node searches start from (default: root)
# start_key = 3

# Insertion requests, applied in order. The parent is the first node
# (preorder) carrying that key. A local list replaces the inherited one.
# [[edges]]
# parent = 1
# child = 2
"#
        .to_string()
    }
}

fn config_err(e: config::ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}
