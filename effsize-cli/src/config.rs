//! Configuration loading from effsize.toml
//!
//! Analysis defaults can be specified in an `effsize.toml` file, which is
//! discovered automatically by walking up from the current directory.
//! Command-line flags take precedence over the file.

use effsize::{DEFAULT_REPLICATES, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Name of the discovered configuration file
pub const CONFIG_FILE_NAME: &str = "effsize.toml";

/// Effsize configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EffsizeConfig {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Analysis defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Within-subject factor names, in design order
    #[serde(default)]
    pub factors: Vec<String>,
    /// Observed (measured, not manipulated) factors
    #[serde(default)]
    pub observed: Vec<String>,
    /// Bootstrap replicate count
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    /// Confidence level (e.g. 0.95 for 95%)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Base seed for the resampling RNG
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Bootstrap worker threads (0 = use all available cores)
    #[serde(default)]
    pub threads: usize,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            factors: Vec::new(),
            observed: Vec::new(),
            replicates: default_replicates(),
            confidence: default_confidence(),
            seed: default_seed(),
            threads: 0,
        }
    }
}

fn default_replicates() -> usize {
    DEFAULT_REPLICATES
}
fn default_confidence() -> f64 {
    0.95
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Output defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Default output format: "human", "json", or "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output file path (stdout when unset)
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema
    #[error("failed to parse effsize.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

impl EffsizeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Discover `effsize.toml` by walking up from `start`.
    ///
    /// A relative `start` is resolved against the current directory first,
    /// so the walk reaches filesystem ancestors rather than stopping at a
    /// relative root. Returns the default configuration when no file is
    /// found.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        let mut dir = if start.is_absolute() {
            start.to_path_buf()
        } else {
            std::env::current_dir()?.join(start)
        };
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let text = std::fs::read_to_string(&candidate)?;
                return Self::from_toml(&text);
            }
            if !dir.pop() {
                return Ok(Self::default());
            }
        }
    }
}
