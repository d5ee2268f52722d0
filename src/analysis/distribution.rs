//! Distribution helpers for charting.
//!
//! Histogram binning, kernel density estimation and the per-group salary
//! series the chart renderer draws.

use super::aggregator::top_professions;
use crate::models::{ExperienceLevel, JobPosting};
use std::f64::consts::PI;

/// One histogram bin covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Default bin count for `n` samples (Sturges' rule).
pub fn sturges_bins(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize + 1).max(1)
}

/// Split `values` into `bins` equal-width bins between their min and max.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min || bins <= 1 {
        // Pad a degenerate range so the single bar has some width.
        let (start, end) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
        return vec![Bin {
            start,
            end,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Gaussian kernel density estimate sampled at `points` evenly spaced
/// positions across the data range.
///
/// Uses Scott's rule for the bandwidth. Returns `(x, density)` pairs, or an
/// empty vector when fewer than two distinct values are available.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    if values.len() < 2 || points < 2 {
        return Vec::new();
    }

    let sigma = std_dev(values);
    if sigma == 0.0 || !sigma.is_finite() {
        return Vec::new();
    }

    let n = values.len() as f64;
    let bandwidth = sigma * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Numeric salaries for each of the `n` most frequent titles, in rank order.
pub fn salaries_by_job(postings: &[JobPosting], n: usize) -> Vec<(String, Vec<f64>)> {
    top_professions(postings, n)
        .into_iter()
        .map(|p| {
            let values: Vec<f64> = postings
                .iter()
                .filter(|posting| posting.job_title == p.job_title)
                .filter_map(|posting| posting.salary_in_usd)
                .collect();
            (p.job_title, values)
        })
        .filter(|(_, values)| !values.is_empty())
        .collect()
}

/// Mean salary for every experience code present, lowest first.
///
/// Equal means are ordered by raw code.
/// Known codes are shown as Junior/Middle/Senior/Executive; anything else
/// keeps its raw code.
pub fn experience_means_ascending(postings: &[JobPosting]) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for posting in postings {
        let Some(salary) = posting.salary_in_usd else {
            continue;
        };
        match groups.iter_mut().find(|(code, _, _)| *code == posting.experience_level) {
            Some(group) => {
                group.1 += salary;
                group.2 += 1;
            }
            None => groups.push((posting.experience_level.clone(), salary, 1)),
        }
    }

    let mut means: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(code, sum, count)| (code, sum / count as f64))
        .collect();
    means.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    means
        .into_iter()
        .map(|(code, mean)| {
            let label = ExperienceLevel::from_code(&code)
                .map(|level| level.short_label().to_string())
                .unwrap_or(code);
            (label, mean)
        })
        .collect()
}
