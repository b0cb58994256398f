//! Configuration module for the retrieval pipeline.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CORRAL_` and use double
//! underscores to separate nested levels:
//! - `CORRAL_INDEX__CLUSTERS=3` sets `index.clusters`
//! - `CORRAL_QUERY__TOP_K=5` sets `query.top_k`
//! - `CORRAL_CORPUS__EXTENSIONS=["txt"]` sets `corpus.extensions`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .corral is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Index build configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// Query-time configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Corpus loading configuration
    #[serde(default)]
    pub corpus: CorpusConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IndexConfig {
    /// Number of clusters (k) to partition the corpus into
    #[serde(default = "default_clusters")]
    pub clusters: usize,

    /// Rotation offset into canonical document order for centroid seeding
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Cap on K-means iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QueryConfig {
    /// Result list cap; 0 returns the routed cluster in full
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CorpusConfig {
    /// File extensions (without the dot) treated as documents
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_clusters() -> usize {
    2
}
fn default_seed() -> u64 {
    0
}
fn default_max_iterations() -> usize {
    crate::cluster::MAX_ITERATIONS
}
fn default_top_k() -> usize {
    3
}
fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            index: IndexConfig::default(),
            query: QueryConfig::default(),
            corpus: CorpusConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
            seed: default_seed(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .corral directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".corral/settings.toml"));

        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with CORRAL_ prefix
            // Use double underscore (__) to separate nested levels
            .merge(Env::prefixed("CORRAL_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
            // Extract into Settings struct
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Find the workspace root by looking for .corral directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".corral");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        // Try to find workspace config
        let config_path = if let Some(path) = Self::find_workspace_config() {
            path
        } else {
            // No workspace found, check current directory
            PathBuf::from(".corral/settings.toml")
        };

        // Check if settings.toml exists
        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        // Try to parse the config file to check if it's valid
        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'corral init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Get the workspace root directory (where .corral is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".corral");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CORRAL_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Save current configuration to file
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(".corral/settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create a well-documented settings.toml template
        let current_dir = std::env::current_dir().unwrap_or_default();
        let template = format!(
            r#"# Corral Configuration File

# Version of the configuration schema
version = 1

# Workspace root directory (automatically detected)
workspace_root = "{}"

# Global debug mode
debug = false

[index]
# Number of clusters (k) the corpus is partitioned into.
# Must stay between 1 and the number of documents.
clusters = 2

# Rotation offset into canonical document order for centroid seeding.
# Same corpus + same seed = byte-identical index, on any platform.
seed = 0

# Cap on K-means iterations before the partition is frozen as-is
max_iterations = 100

[query]
# Result list cap; 0 returns the routed cluster in full
top_k = 3

[corpus]
# File extensions (without the dot) treated as documents
extensions = ["txt", "md"]
"#,
            current_dir.display()
        );

        std::fs::write(&config_path, template)?;

        if force {
            println!("Overwrote configuration at: {}", config_path.display());
        } else {
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
        }

        Ok(config_path)
    }
}
