//! CSV loading.
//!
//! Reads a job postings file, standardizes its header, validates the
//! required columns and turns each complete row into a [`JobPosting`].

use super::columns::{self, ColumnAliases, EXPERIENCE_LEVEL, JOB_TITLE, SALARY_IN_USD};
use super::DatasetError;
use crate::models::JobPosting;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Cell values treated as missing, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for loading a dataset.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Column alias lists used for standardization.
    pub aliases: ColumnAliases,
    /// Whether to show a spinner while reading.
    pub show_progress: bool,
}

/// A cleaned, in-memory job postings table.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File the data was read from.
    pub source: PathBuf,
    /// Header after standardization, in file order.
    pub columns: Vec<String>,
    /// Number of data rows in the file before cleaning.
    pub rows_loaded: usize,
    postings: Vec<JobPosting>,
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_VALUES.contains(&cell)
}

/// Numeric coercion for salary cells; anything unparsable becomes `None`.
fn parse_salary(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn column_index(columns: &[String], name: &str) -> usize {
    // Presence is checked by `missing_required` before this is called.
    columns.iter().position(|c| c == name).unwrap_or_default()
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, DatasetError> {
        info!("Loading dataset: {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::NotFound {
                path: path.to_path_buf(),
            },
            _ => DatasetError::Io(e),
        })?;

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let mut columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        debug!("Raw columns: {:?}", columns);

        columns::dedupe_headers(&mut columns);
        let renames = columns::standardize_columns(&mut columns, &options.aliases);
        for (from, to) in &renames {
            info!("Column '{}' mapped to '{}'", from, to);
        }

        let missing = columns::missing_required(&columns);
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns { missing });
        }

        let title_idx = column_index(&columns, JOB_TITLE);
        let salary_idx = column_index(&columns, SALARY_IN_USD);
        let level_idx = column_index(&columns, EXPERIENCE_LEVEL);

        let spinner = if options.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let mut postings = Vec::new();
        let mut rows_loaded = 0usize;
        let mut non_numeric = 0usize;

        for result in reader.records() {
            let record = result?;
            rows_loaded += 1;

            if record.len() > columns.len() {
                return Err(DatasetError::RaggedRow {
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    expected: columns.len(),
                    found: record.len(),
                });
            }

            // Short rows are padded with missing values.
            let cell = |idx: usize| record.get(idx).filter(|c| !is_missing(c));

            let (Some(title), Some(salary), Some(level)) =
                (cell(title_idx), cell(salary_idx), cell(level_idx))
            else {
                continue;
            };

            let salary_in_usd = parse_salary(salary);
            if salary_in_usd.is_none() {
                non_numeric += 1;
            }

            let extra: BTreeMap<String, String> = columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| ![title_idx, salary_idx, level_idx].contains(idx))
                .filter_map(|(idx, name)| cell(idx).map(|v| (name.clone(), v.to_string())))
                .collect();

            let mut posting = JobPosting::new(title, salary_in_usd, level);
            posting.extra = extra;
            postings.push(posting);

            if let Some(ref pb) = spinner {
                if rows_loaded % 1000 == 0 {
                    pb.set_message(format!("{} rows read", rows_loaded));
                }
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let dropped = rows_loaded - postings.len();
        info!(
            "Loaded {} rows ({} kept, {} dropped with missing values)",
            rows_loaded,
            postings.len(),
            dropped
        );
        if non_numeric > 0 {
            debug!("{} salary values were not numeric", non_numeric);
        }

        Ok(Self {
            source: path.to_path_buf(),
            columns,
            rows_loaded,
            postings,
        })
    }

    /// The cleaned records.
    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Write the cleaned table back out as CSV, using the standardized header.
    ///
    /// Salaries are written at full precision.
    pub fn write_csv(&self, path: &Path) -> Result<(), DatasetError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;

        for posting in &self.postings {
            let row: Vec<String> = self
                .columns
                .iter()
                .map(|col| match col.as_str() {
                    JOB_TITLE => posting.job_title.clone(),
                    SALARY_IN_USD => posting.salary_in_usd.map(|v| v.to_string()).unwrap_or_default(),
                    EXPERIENCE_LEVEL => posting.experience_level.clone(),
                    other => posting.extra.get(other).cloned().unwrap_or_default(),
                })
                .collect();
            writer.write_record(&row)?;
        }

        writer.flush()?;
        info!("Wrote {} cleaned rows to {}", self.postings.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", content).unwrap();
        tmp
    }

    fn load(content: &str) -> Result<Dataset, DatasetError> {
        let tmp = write_csv(content);
        Dataset::load(tmp.path(), &LoadOptions::default())
    }

    #[test]
    fn test_load_with_aliases() {
        let ds = load("Title,Salary,Experience\nDev,1000,MI\nDev,2000,SE\nQA,3000,EN\n").unwrap();

        assert_eq!(ds.columns, vec!["job_title", "salary_in_usd", "experience_level"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows_loaded, 3);
        assert_eq!(ds.postings()[0], JobPosting::new("Dev", Some(1000.0), "MI"));
    }

    #[test]
    fn test_file_not_found() {
        let err = Dataset::load(Path::new("/nonexistent/jobs.csv"), &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, DatasetError::NotFound { .. }));
        assert_eq!(err.to_string(), "File /nonexistent/jobs.csv not found.");
    }

    #[test]
    fn test_missing_columns() {
        let err = load("title,company\nDev,Acme\n").unwrap_err();

        match err {
            DatasetError::MissingColumns { ref missing } => {
                assert_eq!(missing, &vec!["salary_in_usd".to_string(), "experience_level".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("CSV file is invalid. Missing required columns:"));
    }

    #[test]
    fn test_drops_rows_with_missing_values() {
        let ds = load(
            "job_title,salary_in_usd,experience_level\n\
             Dev,1000,MI\n\
             ,2000,SE\n\
             QA,NA,EN\n\
             Ops,3000,\n\
             Lead,4000\n",
        )
        .unwrap();

        assert_eq!(ds.rows_loaded, 5);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.postings()[0].job_title, "Dev");
    }

    #[test]
    fn test_non_numeric_salary_kept_as_none() {
        let ds = load("job_title,salary_in_usd,experience_level\nDev,lots,MI\nQA, 2500 ,SE\n").unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.postings()[0].salary_in_usd, None);
        assert_eq!(ds.postings()[1].salary_in_usd, Some(2500.0));
    }

    #[test]
    fn test_extra_columns_preserved() {
        let ds = load("role,company,salary,level\nDev,Acme,1000,MI\nQA,,2000,SE\n").unwrap();

        assert_eq!(ds.columns, vec!["job_title", "company", "salary_in_usd", "experience_level"]);
        assert_eq!(ds.postings()[0].extra.get("company").map(String::as_str), Some("Acme"));
        assert!(ds.postings()[1].extra.is_empty());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = load("job_title,salary_in_usd,experience_level\nDev,1000,MI,extra\n").unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { expected: 3, found: 4, .. }));
    }

    #[test]
    fn test_write_csv_round_trip() {
        let ds = load("Title,company,Salary,Experience\nDev,Acme,1000,MI\nQA,,oops,SE\n").unwrap();
        let out = NamedTempFile::new().unwrap();
        ds.write_csv(out.path()).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            written,
            "job_title,company,salary_in_usd,experience_level\nDev,Acme,1000,MI\nQA,,,SE\n"
        );
    }

    #[test]
    fn test_write_csv_keeps_precision_and_duplicate_columns() {
        let ds = load("title,salary,level,tag,tag\nDev,85000.125,MI,a,b\n").unwrap();
        assert_eq!(ds.columns, vec!["job_title", "salary_in_usd", "experience_level", "tag", "tag.1"]);

        let out = NamedTempFile::new().unwrap();
        ds.write_csv(out.path()).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            written,
            "job_title,salary_in_usd,experience_level,tag,tag.1\nDev,85000.125,MI,a,b\n"
        );

        let reloaded = load(&written).unwrap();
        assert_eq!(reloaded.postings(), ds.postings());
    }
}
