//! Salary and profession aggregation.
//!
//! This module computes the descriptive statistics over a set of cleaned
//! postings: salary summary, most frequent titles, salary by experience
//! and the highest-paid record.

use crate::models::{
    format_salary, ExperienceLevel, ExperienceSalary, JobPosting, ProfessionCount, RichestJob,
    SalaryStats, Table,
};
use std::collections::HashMap;

/// Numeric salaries of the given postings, in input order.
pub fn salaries(postings: &[JobPosting]) -> Vec<f64> {
    postings.iter().filter_map(|p| p.salary_in_usd).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute min, max, mean (rounded to cents) and median salary.
///
/// Returns `None` when there is no numeric salary to summarize.
pub fn salary_stats(postings: &[JobPosting]) -> Option<SalaryStats> {
    let values = salaries(postings);
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(SalaryStats {
        min,
        max,
        avg: round2(mean(&values)),
        median: median(&values),
    })
}

/// Count postings per job title, most frequent first.
///
/// Titles with equal counts keep the order in which they first appear.
pub fn title_counts(postings: &[JobPosting]) -> Vec<ProfessionCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ProfessionCount> = Vec::new();

    for posting in postings {
        match index.get(posting.job_title.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(&posting.job_title, counts.len());
                counts.push(ProfessionCount {
                    job_title: posting.job_title.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-appearance order among ties.
    counts.sort_by_key(|c| std::cmp::Reverse(c.count));
    counts
}

/// Get the top N job titles by number of postings.
pub fn top_professions(postings: &[JobPosting], n: usize) -> Vec<ProfessionCount> {
    let mut counts = title_counts(postings);
    counts.truncate(n);
    counts
}

/// Mean salary per known experience level, junior to executive.
///
/// Unknown codes and levels without a numeric salary are left out.
pub fn experience_table(postings: &[JobPosting]) -> Vec<ExperienceSalary> {
    let mut sums: HashMap<ExperienceLevel, (f64, usize)> = HashMap::new();

    for posting in postings {
        if let (Some(level), Some(salary)) = (posting.level(), posting.salary_in_usd) {
            let entry = sums.entry(level).or_insert((0.0, 0));
            entry.0 += salary;
            entry.1 += 1;
        }
    }

    ExperienceLevel::ORDERED
        .iter()
        .filter_map(|level| {
            sums.get(level).map(|(sum, count)| ExperienceSalary {
                level: *level,
                avg_salary: sum / *count as f64,
            })
        })
        .collect()
}

/// Salary by experience level for one exact job title.
///
/// Returns `None` when no posting has that title.
pub fn salary_growth_for_job(postings: &[JobPosting], job_title: &str) -> Option<Vec<ExperienceSalary>> {
    let matching: Vec<JobPosting> = postings
        .iter()
        .filter(|p| p.job_title == job_title)
        .cloned()
        .collect();

    if matching.is_empty() {
        return None;
    }

    Some(experience_table(&matching))
}

/// Find the single highest-paid posting (first one wins on ties).
pub fn richest_job(postings: &[JobPosting]) -> Option<RichestJob> {
    let mut best: Option<(&JobPosting, f64)> = None;

    for posting in postings {
        let Some(salary) = posting.salary_in_usd else {
            continue;
        };
        if best.map_or(true, |(_, top)| salary > top) {
            best = Some((posting, salary));
        }
    }

    best.map(|(posting, salary)| RichestJob {
        job_title: posting.job_title.clone(),
        salary_in_usd: salary,
        experience_level: posting.experience_level.clone(),
    })
}

/// Salary statistics as a single-row table.
pub fn salary_stats_table(stats: Option<&SalaryStats>) -> Table {
    let mut table = Table::new(&["min", "max", "avg", "median"]);
    if let Some(s) = stats {
        table.push_row(vec![
            format_salary(s.min),
            format_salary(s.max),
            format_salary(s.avg),
            format_salary(s.median),
        ]);
    }
    table
}

/// Top professions as a two-column table.
pub fn top_professions_table(professions: &[ProfessionCount]) -> Table {
    let mut table = Table::new(&["Job Title", "Vacancies Count"]);
    for p in professions {
        table.push_row(vec![p.job_title.clone(), p.count.to_string()]);
    }
    table
}

/// The highest-paid posting as a single-row table.
pub fn richest_job_table(richest: Option<&RichestJob>) -> Table {
    let mut table = Table::new(&["Job Title", "Salary (USD)", "Experience"]);
    if let Some(r) = richest {
        table.push_row(vec![
            r.job_title.clone(),
            format_salary(r.salary_in_usd),
            r.experience_level.clone(),
        ]);
    }
    table
}

/// Salary by experience level as a two-column table with readable labels.
pub fn experience_stats_table(levels: &[ExperienceSalary]) -> Table {
    let mut table = Table::new(&["Experience Level", "Avg Salary"]);
    for l in levels {
        table.push_row(vec![l.level.label().to_string(), format_salary(l.avg_salary)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<JobPosting> {
        vec![
            JobPosting::new("Dev", Some(1000.0), "MI"),
            JobPosting::new("Dev", Some(2000.0), "SE"),
            JobPosting::new("QA", Some(3000.0), "EN"),
        ]
    }

    #[test]
    fn test_salary_stats() {
        let stats = salary_stats(&sample()).unwrap();

        assert_eq!(stats.min, 1000.0);
        assert_eq!(stats.max, 3000.0);
        assert_eq!(stats.avg, 2000.0);
        assert_eq!(stats.median, 2000.0);
    }

    #[test]
    fn test_salary_stats_even_count_and_rounding() {
        let postings = vec![
            JobPosting::new("A", Some(100.0), "EN"),
            JobPosting::new("B", Some(200.0), "EN"),
            JobPosting::new("C", Some(200.5), "EN"),
            JobPosting::new("D", None, "EN"),
        ];
        let stats = salary_stats(&postings).unwrap();

        assert_eq!(stats.median, 200.0);
        assert_eq!(stats.avg, 166.83);
    }

    #[test]
    fn test_salary_stats_empty() {
        assert!(salary_stats(&[]).is_none());
        assert!(salary_stats(&[JobPosting::new("Dev", None, "MI")]).is_none());
    }

    #[test]
    fn test_top_professions() {
        let top = top_professions(&sample(), 1);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].job_title, "Dev");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_top_professions_ties_keep_file_order() {
        let postings = vec![
            JobPosting::new("B", Some(1.0), "EN"),
            JobPosting::new("A", Some(1.0), "EN"),
            JobPosting::new("C", Some(1.0), "EN"),
            JobPosting::new("C", Some(1.0), "EN"),
        ];
        let titles: Vec<String> = top_professions(&postings, 10)
            .into_iter()
            .map(|p| p.job_title)
            .collect();

        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_experience_table_order_and_filtering() {
        let postings = vec![
            JobPosting::new("Dev", Some(4000.0), "EX"),
            JobPosting::new("Dev", Some(1000.0), "EN"),
            JobPosting::new("Dev", Some(3000.0), "EN"),
            JobPosting::new("Dev", Some(9999.0), "LEAD"),
            JobPosting::new("Dev", None, "SE"),
        ];
        let table = experience_table(&postings);

        assert_eq!(
            table,
            vec![
                ExperienceSalary { level: ExperienceLevel::Entry, avg_salary: 2000.0 },
                ExperienceSalary { level: ExperienceLevel::Executive, avg_salary: 4000.0 },
            ]
        );
    }

    #[test]
    fn test_salary_growth_for_job() {
        let growth = salary_growth_for_job(&sample(), "Dev").unwrap();
        let levels: Vec<ExperienceLevel> = growth.iter().map(|g| g.level).collect();
        assert_eq!(levels, vec![ExperienceLevel::Mid, ExperienceLevel::Senior]);

        assert!(salary_growth_for_job(&sample(), "dev").is_none());
        assert!(salary_growth_for_job(&sample(), "Designer").is_none());
    }

    #[test]
    fn test_richest_job() {
        let richest = richest_job(&sample()).unwrap();
        assert_eq!(richest.job_title, "QA");
        assert_eq!(richest.salary_in_usd, 3000.0);
        assert_eq!(richest.experience_level, "EN");
    }

    #[test]
    fn test_richest_job_ties_and_missing() {
        let postings = vec![
            JobPosting::new("Ghost", None, "EX"),
            JobPosting::new("First", Some(500.0), "MI"),
            JobPosting::new("Second", Some(500.0), "SE"),
        ];
        assert_eq!(richest_job(&postings).unwrap().job_title, "First");
        assert!(richest_job(&postings[..1]).is_none());
    }

    #[test]
    fn test_tables() {
        let postings = sample();

        let stats = salary_stats(&postings);
        let table = salary_stats_table(stats.as_ref());
        assert_eq!(table.rows, vec![vec!["1000", "3000", "2000", "2000"]]);

        let top = top_professions_table(&top_professions(&postings, 5));
        assert_eq!(top.columns, vec!["Job Title", "Vacancies Count"]);
        assert_eq!(top.rows[0], vec!["Dev", "2"]);

        let richest = richest_job_table(richest_job(&postings).as_ref());
        assert_eq!(richest.columns, vec!["Job Title", "Salary (USD)", "Experience"]);
        assert_eq!(richest.rows, vec![vec!["QA", "3000", "EN"]]);

        let exp = experience_stats_table(&experience_table(&postings));
        assert_eq!(exp.rows[0], vec!["Entry-level (Junior)", "3000"]);
        assert_eq!(exp.rows.len(), 3);

        assert!(salary_stats_table(None).is_empty());
    }
}
