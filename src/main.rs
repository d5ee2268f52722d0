//! job-market - Job Market Dataset Analyzer
//!
//! A CLI tool that loads job posting CSV files with arbitrary column
//! naming, prints salary statistics and writes a report plus SVG charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing file, invalid CSV, config error, etc.)

mod analysis;
mod charts;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use dataset::{Dataset, LoadOptions};
use models::{AnalysisReport, JobGrowth, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The log level depends on `general.verbose`
    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("job-market v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .job-market.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize column aliases, top-N and chart output.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
///
/// Runs before the tracing subscriber exists, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", config::DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}

/// Load configuration and apply CLI overrides.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    Ok(config)
}

/// Compute every aggregate for the report.
fn build_report(dataset: &Dataset, config: &Config) -> AnalysisReport {
    let postings = dataset.postings();
    let top_n = config.analysis.top_n;

    let job_growth = config.analysis.target_job.as_ref().map(|title| JobGrowth {
        job_title: title.clone(),
        levels: analysis::salary_growth_for_job(postings, title),
    });

    AnalysisReport {
        metadata: ReportMetadata {
            source: dataset.source.display().to_string(),
            generated_at: Utc::now(),
            rows_loaded: dataset.rows_loaded,
            rows_analyzed: dataset.len(),
            columns: dataset.columns.clone(),
        },
        salary_stats: analysis::salary_stats(postings),
        top_professions: analysis::top_professions(postings, top_n),
        experience_salaries: analysis::experience_table(postings),
        richest_job: analysis::richest_job(postings),
        job_growth,
        charts: Vec::new(),
    }
}

/// Print the aggregates to the terminal.
fn print_summary(report: &AnalysisReport) {
    println!("\n📊 Salary Statistics (USD):");
    match report.salary_stats {
        Some(ref stats) => print!(
            "{}",
            report::render_table(&analysis::salary_stats_table(Some(stats)))
        ),
        None => println!("   No salary data."),
    }

    println!("\n🏆 Top-{} Job Titles:", report.top_professions.len());
    print!(
        "{}",
        report::render_table(&analysis::top_professions_table(&report.top_professions))
    );

    println!("\n📈 Average Salary by Experience:");
    let experience = analysis::experience_stats_table(&report.experience_salaries);
    if experience.is_empty() {
        println!("   No postings with a known experience level.");
    } else {
        print!("{}", report::render_table(&experience));
    }

    println!("\n💰 Highest-Paid Position:");
    match report.richest_job {
        Some(ref richest) => print!(
            "{}",
            report::render_table(&analysis::richest_job_table(Some(richest)))
        ),
        None => println!("   No salary data."),
    }

    if let Some(ref growth) = report.job_growth {
        println!("\n🔎 Salary Growth for '{}':", growth.job_title);
        match growth.levels {
            Some(ref levels) => print!(
                "{}",
                report::render_table(&analysis::experience_stats_table(levels))
            ),
            None => println!("   Job title not found."),
        }
    }
}

/// Run the complete analysis workflow.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let input = args
        .input
        .clone()
        .context("An input CSV file is required (--input)")?;

    // Step 1: Load and clean the dataset
    println!("📥 Loading dataset: {}", input.display());
    let options = LoadOptions {
        aliases: config.columns.clone(),
        show_progress: !args.quiet,
    };
    let dataset = Dataset::load(&input, &options)?;
    println!(
        "   {} rows loaded, {} kept after cleaning",
        dataset.rows_loaded,
        dataset.len()
    );

    if dataset.is_empty() {
        warn!("No complete rows left after cleaning");
    }

    if let Some(ref export_path) = args.export_clean {
        dataset
            .write_csv(export_path)
            .with_context(|| format!("Failed to export cleaned data to {}", export_path.display()))?;
        println!("   Cleaned data written to {}", export_path.display());
    }

    // Step 2: Aggregate
    let mut report = build_report(&dataset, &config);
    if !args.quiet {
        print_summary(&report);
    }

    // Step 3: Charts
    if config.charts.enabled {
        println!("\n🎨 Rendering charts...");
        let renderer = charts::ChartRenderer::new(charts::ChartOptions::from(&config.charts));
        let written = renderer.render_all(dataset.postings(), config.analysis.top_n)?;
        for path in &written {
            println!("   📄 {}", path.display());
        }
        report.charts = written.iter().map(|p| p.display().to_string()).collect();
    } else {
        debug!("Chart rendering disabled");
    }

    // Step 4: Write the report
    println!("\n📝 Generating report...");
    let output_path = config.output_path();
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    report::write_report(&output, &output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}
