//! Configuration module for paperdex.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.paperdex/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `PAPERDEX_` and use double
//! underscores to separate nested levels:
//! - `PAPERDEX_EMBEDDING__MODEL=BGESmallENV15` sets `embedding.model`
//! - `PAPERDEX_SEARCH__DEFAULT_LIMIT=5` sets `search.default_limit`
//! - `PAPERDEX_DEBUG=true` sets `debug`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IndexError, IndexResult};
use crate::vector::{FastEmbedOptions, parse_embedding_model};

/// Name of the per-workspace configuration directory.
pub const CONFIG_DIR: &str = ".paperdex";

const ENV_PREFIX: &str = "PAPERDEX_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding the persisted index
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Global debug mode
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// fastembed model identifier, e.g. `MultilingualE5Small`
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Where downloaded model files are cached
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_true")]
    pub show_download_progress: bool,

    /// Batch size passed to the model runtime; `None` lets fastembed decide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of results returned when the caller does not ask for a count
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_index_path() -> PathBuf {
    PathBuf::from(".paperdex/index")
}
fn default_true() -> bool {
    true
}
fn default_embedding_model() -> String {
    "MultilingualE5Small".to_string()
}
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("paperdex").join("models"))
        .unwrap_or_else(|| PathBuf::from(".paperdex/models"))
}
fn default_limit() -> usize {
    3
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            debug: false,
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_dir: default_cache_dir(),
            show_download_progress: true,
            batch_size: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> IndexResult<Self> {
        // Try to find the workspace root by looking for .paperdex directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honoring the
    /// environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> IndexResult<Self> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore (__) separates nested levels, single
            // underscore stays part of the field name
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(|e| IndexError::ConfigError {
                reason: e.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would only fail later, mid-build or mid-search.
    pub fn validate(&self) -> IndexResult<()> {
        if self.search.default_limit == 0 {
            return Err(IndexError::ConfigError {
                reason: "search.default_limit must be at least 1".to_string(),
            });
        }
        if self.embedding.batch_size == Some(0) {
            return Err(IndexError::ConfigError {
                reason: "embedding.batch_size must be at least 1".to_string(),
            });
        }
        parse_embedding_model(&self.embedding.model).map_err(|e| IndexError::ConfigError {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Options for loading the configured embedding model.
    pub fn embedding_options(&self) -> FastEmbedOptions {
        FastEmbedOptions {
            model_name: self.embedding.model.clone(),
            cache_dir: self.embedding.cache_dir.clone(),
            show_download_progress: self.embedding.show_download_progress,
            batch_size: self.embedding.batch_size,
        }
    }

    /// Index directory with a relative `index_path` anchored at the
    /// workspace root, or at the current directory outside a workspace.
    pub fn resolved_index_path(&self) -> PathBuf {
        if self.index_path.is_absolute() {
            return self.index_path.clone();
        }
        match Self::workspace_root() {
            Some(root) => root.join(&self.index_path),
            None => self.index_path.clone(),
        }
    }

    /// Find the workspace config by looking for a .paperdex directory,
    /// searching from the current directory up to the root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .paperdex is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> IndexResult<PathBuf> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Same as [`Settings::init_config_file`], rooted at `root`.
    pub fn init_config_file_in(root: &Path, force: bool) -> IndexResult<PathBuf> {
        let config_path = root.join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err(IndexError::ConfigError {
                reason: format!(
                    "Configuration file already exists at {}. Use --force to overwrite",
                    config_path.display()
                ),
            });
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| IndexError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let template = format!(
            r#"# paperdex configuration file

# Version of the configuration schema
version = 1

# Directory the index is written to and searched from
index_path = ".paperdex/index"

# Global debug mode (raises the log level to debug)
debug = false

[embedding]
# fastembed model used for both indexing and queries.
# Rebuild the index after changing it.
# Supported: {models}
model = "{model}"

# Where downloaded model files are cached
cache_dir = '{cache_dir}'

# Show a progress bar while a model is downloaded for the first time
show_download_progress = true

# Batch size handed to the model runtime (unset lets fastembed decide)
# batch_size = 64

[search]
# Number of results when --limit is not given
default_limit = 3

[logging]
# Log filter used when RUST_LOG is unset, e.g. "info" or "paperdex=debug"
level = "warn"
"#,
            models = crate::vector::SUPPORTED_MODELS.join(", "),
            model = default_embedding_model(),
            cache_dir = default_cache_dir().display(),
        );

        std::fs::write(&config_path, template).map_err(|source| IndexError::FileWrite {
            path: config_path.clone(),
            source,
        })?;

        Ok(config_path)
    }
}
