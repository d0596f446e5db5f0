use std::{
    collections::BTreeMap,
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::iter::DEFAULT_MAX_TREE_DEPTH;
use crate::repository::DEFAULT_REMOTE;

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped).to_string_lossy().into_owned();
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub url: String,
}

/// Configuration for a gitcore repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Remote name -> remote settings
    #[serde(default)]
    pub remotes: BTreeMap<String, RemoteConfig>,
    /// Deepest tree nesting a walk will descend into
    #[serde(default = "defaults::max_tree_depth")]
    pub max_tree_depth: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            remotes: BTreeMap::new(),
            max_tree_depth: defaults::max_tree_depth(),
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from the config file (if any) and environment variables
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        tracing::debug!("loading gitcore config from {:?}", config_path);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("GITCORE_ORIGIN_URL") {
            self.remotes.insert(
                DEFAULT_REMOTE.to_string(),
                RemoteConfig {
                    url: expand_tilde(&url),
                },
            );
        }

        if let Ok(depth) = env::var("GITCORE_MAX_TREE_DEPTH") {
            self.max_tree_depth = depth
                .parse()
                .context("Failed to parse GITCORE_MAX_TREE_DEPTH as usize")?;
        }

        Ok(())
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: RepositoryConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        for remote in config.remotes.values_mut() {
            remote.url = expand_tilde(&remote.url);
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// `$GITCORE_CONFIG`, else `~/.config/gitcore/config.yaml`
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = env::var("GITCORE_CONFIG") {
            return Ok(PathBuf::from(expand_tilde(&path)));
        }
        dirs::home_dir()
            .map(|home| home.join(".config/gitcore/config.yaml"))
            .context("Could not determine home directory for config file")
    }
}

mod defaults {
    pub(crate) fn max_tree_depth() -> usize {
        super::DEFAULT_MAX_TREE_DEPTH
    }
}
