//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.job-market.toml` files.

use crate::dataset::ColumnAliases;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".job-market.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Column alias lists.
    #[serde(default)]
    pub columns: ColumnAliases,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "job_market_report.md".to_string()
}

/// Analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How many job titles to rank.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Job title to break down by experience level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_job: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            target_job: None,
        }
    }
}

fn default_top_n() -> usize {
    10
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Render charts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory the SVG files are written to.
    #[serde(default = "default_charts_dir")]
    pub output_dir: String,

    /// Chart width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Chart height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Fixed histogram bin count (Sturges' rule when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram_bins: Option<usize>,

    /// Overlay a density curve on the salary histogram.
    #[serde(default = "default_true")]
    pub show_kde: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: default_charts_dir(),
            width: default_width(),
            height: default_height(),
            histogram_bins: None,
            show_kde: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_charts_dir() -> String {
    "charts".to_string()
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    700
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject values that would produce empty rankings or zero-sized charts.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.top_n == 0 {
            bail!("analysis.top_n must be greater than 0");
        }
        if self.charts.histogram_bins == Some(0) {
            bail!("charts.histogram_bins must be greater than 0");
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            bail!(
                "charts.width and charts.height must be greater than 0 (got {}x{})",
                self.charts.width,
                self.charts.height
            );
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(top) = args.top {
            self.analysis.top_n = top;
        }
        if let Some(ref job) = args.job {
            self.analysis.target_job = Some(job.clone());
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref dir) = args.charts_dir {
            self.charts.output_dir = dir.display().to_string();
        }
        if args.no_charts {
            self.charts.enabled = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Report output path.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.general.output)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
