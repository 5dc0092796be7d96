use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::path::Path;

use super::error::{MergeError, Result};

const CONFIG_PATHS: [&str; 2] = ["./shardmerge.toml", "/etc/shardmerge/shardmerge.toml"];

/// Merge engine tuning
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Maximum number of distinct groups the buffered GROUP BY strategy may
    /// hold. `None` means unbounded.
    #[serde(default)]
    pub memory_group_limit: Option<usize>,
    /// Buffered group count after which a warning is logged once per merge.
    #[serde(default = "default_memory_warn_threshold")]
    pub memory_warn_threshold: usize,
    /// Match column labels exactly instead of case-insensitively.
    #[serde(default)]
    pub case_sensitive_labels: bool,
}

const fn default_memory_warn_threshold() -> usize { 100_000 }

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            memory_group_limit: None,
            memory_warn_threshold: default_memory_warn_threshold(),
            case_sensitive_labels: false,
        }
    }
}

impl MergeConfig {
    /// Load configuration with priority: ENV > config file > defaults.
    ///
    /// An explicit `path` must exist; otherwise the first of the well-known
    /// locations that exists is used, if any.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as `load`, reading `SHARDMERGE_*` variables from `env` instead of
    /// the process environment when given.
    fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
            tracing::debug!(path = %path.display(), "loading merge config");
        } else if let Some(found) = CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.add_source(File::with_name(found));
            tracing::debug!(path = %found, "loading merge config");
        }

        // SHARDMERGE_MEMORY_GROUP_LIMIT=5000 etc.
        builder = builder.add_source(
            Environment::with_prefix("SHARDMERGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| MergeError::Config(e.to_string()))
    }
}
