//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{self, config_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Runner defaults
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Postman conversion defaults
    #[serde(default)]
    pub postman: PostmanConfig,
}

/// Runner settings
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Plan executed when no path is given
    #[serde(default = "default_plan")]
    pub default_plan: PathBuf,

    /// Where the JSON report is written
    #[serde(default = "default_report")]
    pub report_path: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_plan: default_plan(),
            report_path: default_report(),
        }
    }
}

fn default_plan() -> PathBuf {
    PathBuf::from(paths::DEFAULT_PLAN)
}

fn default_report() -> PathBuf {
    PathBuf::from(paths::DEFAULT_REPORT)
}

/// Postman conversion settings
#[derive(Debug, Deserialize)]
pub struct PostmanConfig {
    /// Root scanned for `**/*.json` plans by `convert-all`
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,

    /// Output directory for generated collections
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the combined collection
    #[serde(default = "default_combined_file")]
    pub combined_file: String,

    /// `info.name` of the combined collection
    #[serde(default = "default_combined_name")]
    pub combined_name: String,
}

impl Default for PostmanConfig {
    fn default() -> Self {
        Self {
            tests_dir: default_tests_dir(),
            output_dir: default_output_dir(),
            combined_file: default_combined_file(),
            combined_name: default_combined_name(),
        }
    }
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_TESTS_DIR)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_COLLECTIONS_DIR)
}
fn default_combined_file() -> String {
    "Petstore_API_Complete.json".to_string()
}
fn default_combined_name() -> String {
    "Petstore API - Complete Test Suite".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
