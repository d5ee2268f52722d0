//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// job-market - salary statistics and charts for job posting datasets
///
/// Reads a CSV of job postings (any column naming: Title/role/position,
/// Salary/gross_salary, Experience/level, ...), prints salary statistics,
/// the most common job titles, salary by experience level and the
/// highest-paid posting, then writes a report and SVG charts.
///
/// Examples:
///   job-market --input ds_salaries.csv
///   job-market --input jobs.csv --top 5 --job "Data Scientist"
///   job-market --input jobs.csv --format json --output report.json --no-charts
///   job-market --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file with job postings
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "JOB_MARKET_INPUT",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// Number of top job titles to show
    ///
    /// Defaults to the config file value, or 10.
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Job title to break down by experience level (exact match)
    #[arg(short, long, value_name = "TITLE")]
    pub job: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to the config file value, or job_market_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Directory to write SVG charts into
    #[arg(long, value_name = "DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Write the cleaned dataset (standardized columns) to this CSV file
    #[arg(long, value_name = "FILE")]
    pub export_clean: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .job-market.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .job-market.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.input {
            None => return Err("An input CSV file is required (--input)".to_string()),
            Some(ref path) if path.is_dir() => {
                return Err(format!("Input path is a directory: {}", path.display()));
            }
            Some(ref path) if !path.exists() => {
                return Err(format!("File {} not found.", path.display()));
            }
            Some(_) => {}
        }

        if self.top == Some(0) {
            return Err("Top count must be at least 1".to_string());
        }

        if let Some(ref job) = self.job {
            if job.trim().is_empty() {
                return Err("Job title must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_default` comes from the config file; `--quiet` overrides it.
    pub fn log_level(&self, verbose_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
