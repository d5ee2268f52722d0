//! Data models for the job market analyzer.
//!
//! This module contains the core data structures used throughout the
//! application for representing postings, aggregates, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Seniority bucket encoded by the two-letter experience codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    /// `EN` - entry level / junior
    Entry,
    /// `MI` - mid level
    Mid,
    /// `SE` - senior
    Senior,
    /// `EX` - executive / director
    Executive,
}

impl ExperienceLevel {
    /// Levels in career order (junior first).
    pub const ORDERED: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Parses a dataset code. Codes are matched exactly (`"EN"`, not `"en"`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EN" => Some(ExperienceLevel::Entry),
            "MI" => Some(ExperienceLevel::Mid),
            "SE" => Some(ExperienceLevel::Senior),
            "EX" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }

    /// Long label used in tables and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry-level (Junior)",
            ExperienceLevel::Mid => "Mid-level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }

    /// Short label used on chart axes.
    pub fn short_label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Junior",
            ExperienceLevel::Mid => "Middle",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single cleaned row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Job title as written in the source file.
    pub job_title: String,
    /// Salary in USD; `None` when the cell was not numeric.
    pub salary_in_usd: Option<f64>,
    /// Raw experience code (usually EN/MI/SE/EX).
    pub experience_level: String,
    /// Every other non-missing column of the row, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl JobPosting {
    /// Creates a posting without extra columns.
    pub fn new(job_title: &str, salary_in_usd: Option<f64>, experience_level: &str) -> Self {
        Self {
            job_title: job_title.to_string(),
            salary_in_usd,
            experience_level: experience_level.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// Returns the parsed experience level, if the code is a known one.
    pub fn level(&self) -> Option<ExperienceLevel> {
        ExperienceLevel::from_code(&self.experience_level)
    }
}

/// Descriptive statistics over all numeric salaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    pub min: f64,
    pub max: f64,
    /// Mean, rounded to two decimals.
    pub avg: f64,
    pub median: f64,
}

/// Number of postings for one job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionCount {
    pub job_title: String,
    pub count: usize,
}

/// Mean salary for one experience level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSalary {
    pub level: ExperienceLevel,
    pub avg_salary: f64,
}

/// The single highest-paid posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichestJob {
    pub job_title: String,
    pub salary_in_usd: f64,
    pub experience_level: String,
}

/// Salary progression for a single job title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobGrowth {
    /// Title that was looked up.
    pub job_title: String,
    /// `None` when no posting carries that title.
    pub levels: Option<Vec<ExperienceSalary>>,
}

/// A small display table (header row plus string cells).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats a salary: whole numbers without decimals, otherwise two decimals.
pub fn format_salary(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Metadata about the analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed CSV file.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Data rows read from the file.
    pub rows_loaded: usize,
    /// Rows left after dropping incomplete records.
    pub rows_analyzed: usize,
    /// Column names after standardization.
    pub columns: Vec<String>,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    /// `None` when no numeric salary survived cleaning.
    pub salary_stats: Option<SalaryStats>,
    pub top_professions: Vec<ProfessionCount>,
    pub experience_salaries: Vec<ExperienceSalary>,
    pub richest_job: Option<RichestJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_growth: Option<JobGrowth>,
    /// Paths of rendered chart files.
    #[serde(default)]
    pub charts: Vec<String>,
}
