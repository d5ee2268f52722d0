//! Markdown and JSON report generation.
//!
//! This module turns an [`AnalysisReport`] into a readable Markdown
//! document or a JSON dump.

use crate::analysis::{
    experience_stats_table, richest_job_table, salary_stats_table, top_professions_table,
};
use crate::models::{AnalysisReport, JobGrowth, ReportMetadata, Table};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Render a table as a Markdown table.
pub fn render_table(table: &Table) -> String {
    let mut out = String::new();

    out.push_str(&format!("| {} |\n", table.columns.join(" | ")));
    out.push_str(&format!(
        "|{}|\n",
        table.columns.iter().map(|_| ":---").collect::<Vec<_>>().join("|")
    ));

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    out
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("# Job Market Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_salary_section(report));
    output.push_str(&generate_professions_section(report));
    output.push_str(&generate_experience_section(report));
    output.push_str(&generate_richest_section(report));

    if let Some(ref growth) = report.job_growth {
        output.push_str(&generate_growth_section(growth));
    }

    output.push_str(&generate_charts_section(&report.charts));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push_str(&format!("- **Rows Analyzed:** {}\n", metadata.rows_analyzed));
    if metadata.rows_loaded > metadata.rows_analyzed {
        section.push_str(&format!(
            "- **Rows Dropped:** {} (missing title, salary or experience)\n",
            metadata.rows_loaded - metadata.rows_analyzed
        ));
    }
    section.push_str(&format!("- **Columns:** {}\n", metadata.columns.join(", ")));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &AnalysisReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Salary Statistics](#salary-statistics)\n");
    toc.push_str("- [Top Professions](#top-professions)\n");
    toc.push_str("- [Salary by Experience](#salary-by-experience)\n");
    toc.push_str("- [Highest-Paid Position](#highest-paid-position)\n");

    if report.job_growth.is_some() {
        toc.push_str("- [Salary Growth](#salary-growth)\n");
    }
    if !report.charts.is_empty() {
        toc.push_str("- [Charts](#charts)\n");
    }

    toc.push('\n');

    toc
}

fn generate_salary_section(report: &AnalysisReport) -> String {
    let mut section = String::from("## Salary Statistics\n\n");

    match report.salary_stats {
        Some(ref stats) => {
            section.push_str(&render_table(&salary_stats_table(Some(stats))));
            section.push('\n');
        }
        None => section.push_str("No salary data.\n\n"),
    }

    section
}

fn generate_professions_section(report: &AnalysisReport) -> String {
    let mut section = format!("## Top Professions\n\n*Top {} by number of vacancies*\n\n", report.top_professions.len());

    if report.top_professions.is_empty() {
        section.push_str("No job titles found.\n\n");
    } else {
        section.push_str(&render_table(&top_professions_table(&report.top_professions)));
        section.push('\n');
    }

    section
}

fn generate_experience_section(report: &AnalysisReport) -> String {
    let mut section = String::from("## Salary by Experience\n\n");

    if report.experience_salaries.is_empty() {
        section.push_str("No postings with a known experience level (EN, MI, SE, EX).\n\n");
    } else {
        section.push_str(&render_table(&experience_stats_table(&report.experience_salaries)));
        section.push('\n');
    }

    section
}

fn generate_richest_section(report: &AnalysisReport) -> String {
    let mut section = String::from("## Highest-Paid Position\n\n");

    match report.richest_job {
        Some(ref richest) => {
            section.push_str(&render_table(&richest_job_table(Some(richest))));
            section.push('\n');
        }
        None => section.push_str("No salary data.\n\n"),
    }

    section
}

fn generate_growth_section(growth: &JobGrowth) -> String {
    let mut section = format!("## Salary Growth\n\n*{}*\n\n", growth.job_title);

    match growth.levels {
        None => section.push_str(&format!("Job title '{}' was not found in the dataset.\n\n", growth.job_title)),
        Some(ref levels) if levels.is_empty() => {
            section.push_str("No postings with a known experience level for this title.\n\n")
        }
        Some(ref levels) => {
            section.push_str(&render_table(&experience_stats_table(levels)));
            section.push('\n');
        }
    }

    section
}

fn generate_charts_section(charts: &[String]) -> String {
    if charts.is_empty() {
        return String::new();
    }

    let mut section = String::from("## Charts\n\n");
    for chart in charts {
        section.push_str(&format!("![{}]({})\n\n", chart_title(chart), chart));
    }

    section
}

fn chart_title(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_else(|| path.to_string())
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!("*Report generated by job-market v{}*\n", env!("CARGO_PKG_VERSION")));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, ExperienceSalary, ProfessionCount, RichestJob, SalaryStats};
    use chrono::Utc;

    fn create_test_report() -> AnalysisReport {
        AnalysisReport {
            metadata: ReportMetadata {
                source: "jobs.csv".to_string(),
                generated_at: Utc::now(),
                rows_loaded: 4,
                rows_analyzed: 3,
                columns: vec![
                    "job_title".to_string(),
                    "salary_in_usd".to_string(),
                    "experience_level".to_string(),
                ],
            },
            salary_stats: Some(SalaryStats {
                min: 1000.0,
                max: 3000.0,
                avg: 2000.0,
                median: 2000.0,
            }),
            top_professions: vec![
                ProfessionCount { job_title: "Dev".to_string(), count: 2 },
                ProfessionCount { job_title: "QA".to_string(), count: 1 },
            ],
            experience_salaries: vec![ExperienceSalary {
                level: ExperienceLevel::Entry,
                avg_salary: 3000.0,
            }],
            richest_job: Some(RichestJob {
                job_title: "QA".to_string(),
                salary_in_usd: 3000.0,
                experience_level: "EN".to_string(),
            }),
            job_growth: None,
            charts: vec!["charts/top_jobs.svg".to_string()],
        }
    }

    #[test]
    fn test_render_table() {
        let mut table = Table::new(&["Job Title", "Vacancies Count"]);
        table.push_row(vec!["Dev".to_string(), "2".to_string()]);
        table.push_row(vec!["A|B".to_string(), "1".to_string()]);

        assert_eq!(
            render_table(&table),
            "| Job Title | Vacancies Count |\n|:---|:---|\n| Dev | 2 |\n| A\\|B | 1 |\n"
        );
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Job Market Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Rows Dropped:** 1"));
        assert!(markdown.contains("| min | max | avg | median |"));
        assert!(markdown.contains("| Dev | 2 |"));
        assert!(markdown.contains("| Entry-level (Junior) | 3000 |"));
        assert!(markdown.contains("| QA | 3000 | EN |"));
        assert!(markdown.contains("![top jobs](charts/top_jobs.svg)"));
        assert!(!markdown.contains("## Salary Growth"));
    }

    #[test]
    fn test_empty_dataset_sections() {
        let mut report = create_test_report();
        report.salary_stats = None;
        report.richest_job = None;
        report.top_professions.clear();
        report.experience_salaries.clear();
        report.charts.clear();

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("No salary data."));
        assert!(markdown.contains("No job titles found."));
        assert!(!markdown.contains("## Charts"));
    }

    #[test]
    fn test_growth_section() {
        let missing = JobGrowth {
            job_title: "Astronaut".to_string(),
            levels: None,
        };
        assert!(generate_growth_section(&missing).contains("'Astronaut' was not found"));

        let found = JobGrowth {
            job_title: "Dev".to_string(),
            levels: Some(vec![
                ExperienceSalary { level: ExperienceLevel::Mid, avg_salary: 1000.0 },
                ExperienceSalary { level: ExperienceLevel::Senior, avg_salary: 2000.5 },
            ]),
        };
        let section = generate_growth_section(&found);
        assert!(section.contains("| Mid-level | 1000 |"));
        assert!(section.contains("| Senior | 2000.50 |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"salary_stats\""));
        assert!(json.contains("\"top_professions\""));
        assert!(json.contains("\"richest_job\""));
        assert!(!json.contains("\"job_growth\""));
    }

    #[test]
    fn test_write_report_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");

        write_report("# hi\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi\n");
    }
}
