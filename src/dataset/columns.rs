//! Column name standardization.
//!
//! Job datasets come with many spellings of the same column ("Title",
//! "role", "gross_salary", ...). This module maps them onto the three
//! canonical names the analyzer works with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Canonical job title column.
pub const JOB_TITLE: &str = "job_title";
/// Canonical salary column.
pub const SALARY_IN_USD: &str = "salary_in_usd";
/// Canonical experience code column.
pub const EXPERIENCE_LEVEL: &str = "experience_level";

/// Columns every dataset must provide after standardization, in check order.
pub const REQUIRED_COLUMNS: [&str; 3] = [JOB_TITLE, SALARY_IN_USD, EXPERIENCE_LEVEL];

/// Ordered alias lists for each canonical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAliases {
    #[serde(default = "default_job_title_aliases")]
    pub job_title: Vec<String>,

    #[serde(default = "default_salary_aliases")]
    pub salary_in_usd: Vec<String>,

    #[serde(default = "default_experience_aliases")]
    pub experience_level: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            job_title: default_job_title_aliases(),
            salary_in_usd: default_salary_aliases(),
            experience_level: default_experience_aliases(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_job_title_aliases() -> Vec<String> {
    to_strings(&["job_title", "title", "role", "position"])
}

fn default_salary_aliases() -> Vec<String> {
    to_strings(&["salary_in_usd", "salary", "salary_usd", "gross_salary"])
}

fn default_experience_aliases() -> Vec<String> {
    to_strings(&["experience_level", "experience", "exp_level", "level"])
}

impl ColumnAliases {
    /// Canonical names paired with their aliases, in standardization order.
    pub fn entries(&self) -> [(&'static str, &[String]); 3] {
        [
            (JOB_TITLE, &self.job_title),
            (SALARY_IN_USD, &self.salary_in_usd),
            (EXPERIENCE_LEVEL, &self.experience_level),
        ]
    }
}

/// Makes repeated header names unique by suffixing `.1`, `.2`, ...
///
/// `tag,tag,tag` becomes `tag,tag.1,tag.2`. A generated name that collides
/// with a later or earlier header keeps counting up.
pub fn dedupe_headers(headers: &mut [String]) {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for header in headers.iter_mut() {
        let mut name = header.clone();
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{}.{}", name, seen);
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), seen + 1);

        if name != *header {
            debug!("Duplicate column '{}' renamed to '{}'", header, name);
            *header = name;
        }
    }
}

/// Renames headers in place to their canonical names.
///
/// A canonical name that is already present is left alone. Otherwise the
/// aliases are tried in order and the first header matching one of them
/// case-insensitively is renamed. Lookups use the headers as they were on
/// entry. If the first matching header was already claimed by another
/// canonical name, the search stops there and the column stays missing.
///
/// Returns the `(original, canonical)` pairs that were applied.
pub fn standardize_columns(headers: &mut [String], aliases: &ColumnAliases) -> Vec<(String, String)> {
    // Later duplicates win, matching a lowercase -> header lookup table.
    let original_lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut renamed = vec![false; headers.len()];
    let mut applied = Vec::new();

    for (target, candidates) in aliases.entries() {
        if headers.iter().any(|h| h == target) {
            continue;
        }

        for alias in candidates {
            let alias_lower = alias.to_lowercase();
            let Some(idx) = original_lower.iter().rposition(|h| *h == alias_lower) else {
                continue;
            };

            if renamed[idx] {
                debug!("Column '{}' already mapped, '{}' left unset", headers[idx], target);
            } else {
                debug!("Renaming column '{}' -> '{}'", headers[idx], target);
                applied.push((headers[idx].clone(), target.to_string()));
                headers[idx] = target.to_string();
                renamed[idx] = true;
            }
            break;
        }
    }

    applied
}

/// Returns the required canonical columns missing from `headers`.
pub fn missing_required(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_renames_capitalized_aliases() {
        let mut cols = headers(&["Title", "Salary", "Experience"]);
        let applied = standardize_columns(&mut cols, &ColumnAliases::default());

        assert_eq!(cols, headers(&["job_title", "salary_in_usd", "experience_level"]));
        assert_eq!(applied.len(), 3);
        assert_eq!(applied[0], ("Title".to_string(), "job_title".to_string()));
    }

    #[test]
    fn test_canonical_columns_left_alone() {
        let mut cols = headers(&["job_title", "salary", "salary_in_usd", "experience_level"]);
        let applied = standardize_columns(&mut cols, &ColumnAliases::default());

        assert!(applied.is_empty());
        assert_eq!(cols[1], "salary");
    }

    #[test]
    fn test_alias_order_decides() {
        // "salary" comes before "gross_salary" in the alias list.
        let mut cols = headers(&["gross_salary", "Salary", "role", "level"]);
        standardize_columns(&mut cols, &ColumnAliases::default());

        assert_eq!(cols, headers(&["gross_salary", "salary_in_usd", "job_title", "experience_level"]));
    }

    #[test]
    fn test_mixed_case_canonical_name() {
        let mut cols = headers(&["Job_Title", "SALARY_IN_USD", "Exp_Level"]);
        standardize_columns(&mut cols, &ColumnAliases::default());

        assert_eq!(cols, headers(&["job_title", "salary_in_usd", "experience_level"]));
    }

    #[test]
    fn test_header_renamed_only_once() {
        let aliases = ColumnAliases {
            job_title: headers(&["name"]),
            salary_in_usd: headers(&["name"]),
            experience_level: headers(&["level"]),
        };
        let mut cols = headers(&["name", "level"]);
        standardize_columns(&mut cols, &aliases);

        assert_eq!(cols, headers(&["job_title", "experience_level"]));
        assert_eq!(missing_required(&cols), vec!["salary_in_usd".to_string()]);
    }

    #[test]
    fn test_claimed_header_stops_alias_search() {
        let aliases = ColumnAliases {
            job_title: headers(&["name"]),
            salary_in_usd: headers(&["name", "pay"]),
            experience_level: headers(&["level"]),
        };
        let mut cols = headers(&["name", "pay", "level"]);
        standardize_columns(&mut cols, &aliases);

        assert_eq!(cols, headers(&["job_title", "pay", "experience_level"]));
        assert_eq!(missing_required(&cols), vec!["salary_in_usd".to_string()]);
    }

    #[test]
    fn test_dedupe_headers() {
        let mut cols = headers(&["tag", "title", "tag", "tag"]);
        dedupe_headers(&mut cols);
        assert_eq!(cols, headers(&["tag", "title", "tag.1", "tag.2"]));

        let mut cols = headers(&["a", "a", "a.1"]);
        dedupe_headers(&mut cols);
        assert_eq!(cols, headers(&["a", "a.1", "a.1.1"]));
    }

    #[test]
    fn test_missing_required() {
        let cols = headers(&["job_title", "company"]);
        assert_eq!(
            missing_required(&cols),
            vec!["salary_in_usd".to_string(), "experience_level".to_string()]
        );
        assert!(missing_required(&headers(&["experience_level", "salary_in_usd", "job_title"])).is_empty());
    }
}
