//! SVG chart rendering with plotters.
//!
//! Each `plot_*` method writes one SVG file into the configured output
//! directory and returns its path, or `None` when there was nothing to draw.

use super::palette::{gradient, COOLWARM, MAGMA, TEAL, VIRIDIS};
use crate::analysis::distribution::{
    experience_means_ascending, gaussian_kde, histogram, salaries_by_job, sturges_bins,
};
use crate::analysis::{salaries, top_professions};
use crate::config::ChartsConfig;
use crate::models::JobPosting;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const SALARY_DISTRIBUTION_FILE: &str = "salary_distribution.svg";
pub const TOP_JOBS_FILE: &str = "top_jobs.svg";
pub const SALARY_BY_JOB_FILE: &str = "salary_by_job.svg";
pub const EXPERIENCE_SALARIES_FILE: &str = "experience_salaries.svg";

const KDE_POINTS: usize = 200;
const FONT: &str = "sans-serif";

/// Options for chart rendering.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Directory the SVG files are written to.
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Fixed histogram bin count; Sturges' rule when `None`.
    pub histogram_bins: Option<usize>,
    /// Overlay a density curve on the salary histogram.
    pub show_kde: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::from(&ChartsConfig::default())
    }
}

impl From<&ChartsConfig> for ChartOptions {
    fn from(config: &ChartsConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            width: config.width,
            height: config.height,
            histogram_bins: config.histogram_bins,
            show_kde: config.show_kde,
        }
    }
}

/// Renders the dataset aggregates as SVG charts.
pub struct ChartRenderer {
    options: ChartOptions,
}

/// Axis label for a segmented category axis.
fn segment_label(value: &SegmentValue<i32>, labels: &[String]) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

fn segment_index(value: &SegmentValue<i32>) -> usize {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => (*i).max(0) as usize,
        SegmentValue::Last => 0,
    }
}

/// Room for category labels on a horizontal chart.
fn label_area_width(labels: &[String]) -> u32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    (longest * 8 + 20).clamp(80, 400)
}

fn position(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.5
    } else {
        i as f64 / (n - 1) as f64
    }
}

impl ChartRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.options.output_dir).with_context(|| {
            format!(
                "Failed to create chart directory: {}",
                self.options.output_dir.display()
            )
        })?;
        Ok(self.options.output_dir.join(file_name))
    }

    fn size(&self) -> (u32, u32) {
        (self.options.width, self.options.height)
    }

    /// Histogram of all salaries with an optional density overlay.
    pub fn plot_salary_distribution(&self, postings: &[JobPosting]) -> Result<Option<PathBuf>> {
        let values = salaries(postings);
        if values.is_empty() {
            warn!("No salary values; skipping salary distribution chart");
            return Ok(None);
        }

        let bin_count = self
            .options
            .histogram_bins
            .unwrap_or_else(|| sturges_bins(values.len()));
        let bins = histogram(&values, bin_count);
        debug!("Salary histogram: {} bins", bins.len());

        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Ok(None);
        };
        let (x_min, x_max) = (first.start, last.end);
        let bin_width = first.end - first.start;

        // Density scaled to counts so it lines up with the bars.
        let n = values.len() as f64;
        let kde: Vec<(f64, f64)> = if self.options.show_kde {
            gaussian_kde(&values, KDE_POINTS)
                .into_iter()
                .map(|(x, d)| (x, d * n * bin_width))
                .collect()
        } else {
            Vec::new()
        };

        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;
        let max_kde = kde.iter().map(|(_, y)| *y).fold(0.0, f64::max);
        let y_max = max_count.max(max_kde) * 1.1;

        let path = self.prepare(SALARY_DISTRIBUTION_FILE)?;
        {
            let root = SVGBackend::new(&path, self.size()).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Salary Distribution (USD)", (FONT, 30))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

            chart
                .configure_mesh()
                .x_desc("Salary in USD")
                .y_desc("Number of Vacancies")
                .x_label_formatter(&|v| format!("{:.0}", v))
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()?;

            chart.draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], TEAL.mix(0.55).filled())
            }))?;
            chart.draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
            }))?;

            if !kde.is_empty() {
                chart.draw_series(LineSeries::new(kde, TEAL.stroke_width(2)))?;
            }

            root.present()?;
        }

        info!("Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Horizontal bar chart of the `n` most common job titles.
    pub fn plot_top_jobs(&self, postings: &[JobPosting], n: usize) -> Result<Option<PathBuf>> {
        let top = top_professions(postings, n);
        if top.is_empty() {
            warn!("No job titles; skipping top jobs chart");
            return Ok(None);
        }

        let labels: Vec<String> = top.iter().map(|p| p.job_title.clone()).collect();
        let max_count = top.iter().map(|p| p.count).max().unwrap_or(1) as u32;
        let x_max = max_count + (max_count / 10).max(1);
        let rows = top.len() as i32;

        let path = self.prepare(TOP_JOBS_FILE)?;
        {
            let root = SVGBackend::new(&path, self.size()).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Top-{} Job Titles", n), (FONT, 30))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(label_area_width(&labels))
                .build_cartesian_2d(0u32..x_max, (0..rows).into_segmented())?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc("Number of Vacancies")
                .y_labels(labels.len())
                .y_label_formatter(&|v| segment_label(v, &labels))
                .draw()?;

            let count = top.len();
            chart.draw_series(
                Histogram::horizontal(&chart)
                    .margin(6)
                    .style_func(move |v, _| {
                        gradient(&VIRIDIS, position(segment_index(v), count)).filled()
                    })
                    .data(top.iter().enumerate().map(|(i, p)| (i as i32, p.count as u32))),
            )?;

            root.present()?;
        }

        info!("Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Box plots of the salary range for each of the `n` most common titles.
    pub fn plot_salary_by_job(&self, postings: &[JobPosting], n: usize) -> Result<Option<PathBuf>> {
        let groups = salaries_by_job(postings, n);
        if groups.is_empty() {
            warn!("No salaries for top job titles; skipping salary range chart");
            return Ok(None);
        }

        let labels: Vec<String> = groups.iter().map(|(title, _)| title.clone()).collect();
        let quartiles: Vec<Quartiles> = groups.iter().map(|(_, v)| Quartiles::new(v)).collect();

        let all = groups.iter().flat_map(|(_, v)| v.iter().copied());
        let (lo, hi) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let pad = ((hi - lo) * 0.05).max(1.0);
        let (x_min, x_max) = ((lo - pad) as f32, (hi + pad) as f32);
        let rows = groups.len() as i32;

        let path = self.prepare(SALARY_BY_JOB_FILE)?;
        {
            let root = SVGBackend::new(&path, self.size()).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Salary Ranges for Top-{} Professions", n), (FONT, 30))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(label_area_width(&labels))
                .build_cartesian_2d(x_min..x_max, (0..rows).into_segmented())?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc("Salary (USD)")
                .y_desc("Job Title")
                .x_label_formatter(&|v| format!("{:.0}", v))
                .y_labels(labels.len())
                .y_label_formatter(&|v| segment_label(v, &labels))
                .draw()?;

            let count = groups.len();
            chart.draw_series(quartiles.iter().enumerate().map(|(i, q)| {
                Boxplot::new_horizontal(SegmentValue::CenterOf(i as i32), q)
                    .width(24)
                    .whisker_width(0.6)
                    .style(gradient(&COOLWARM, position(i, count)).stroke_width(2))
            }))?;

            // Points beyond the whiskers.
            for (i, ((_, values), q)) in groups.iter().zip(&quartiles).enumerate() {
                let [lower, _, _, _, upper] = q.values();
                let style = gradient(&COOLWARM, position(i, count)).filled();
                chart.draw_series(
                    values
                        .iter()
                        .map(|v| *v as f32)
                        .filter(|v| *v < lower || *v > upper)
                        .map(|v| Circle::new((v, SegmentValue::CenterOf(i as i32)), 3, style)),
                )?;
            }

            root.present()?;
        }

        info!("Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Bar chart of the mean salary per experience level, lowest first.
    pub fn plot_experience_salaries(&self, postings: &[JobPosting]) -> Result<Option<PathBuf>> {
        let means = experience_means_ascending(postings);
        if means.is_empty() {
            warn!("No salaries by experience level; skipping experience chart");
            return Ok(None);
        }

        let labels: Vec<String> = means.iter().map(|(label, _)| label.clone()).collect();
        let y_max = means.iter().map(|(_, m)| *m).fold(0.0, f64::max) * 1.1;
        let y_max = if y_max > 0.0 { y_max } else { 1.0 };
        let cols = means.len() as i32;

        let path = self.prepare(EXPERIENCE_SALARIES_FILE)?;
        {
            let root = SVGBackend::new(&path, self.size()).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Average Salary by Experience Level", (FONT, 30))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(80)
                .build_cartesian_2d((0..cols).into_segmented(), 0f64..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Experience Level")
                .y_desc("Salary (USD)")
                .x_labels(labels.len())
                .x_label_formatter(&|v| segment_label(v, &labels))
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()?;

            let count = means.len();
            chart.draw_series(
                Histogram::vertical(&chart)
                    .margin(20)
                    .style_func(move |v, _| {
                        gradient(&MAGMA, position(segment_index(v), count)).filled()
                    })
                    .data(means.iter().enumerate().map(|(i, (_, m))| (i as i32, *m))),
            )?;

            root.present()?;
        }

        info!("Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Render every chart; returns the files that were written.
    pub fn render_all(&self, postings: &[JobPosting], n: usize) -> Result<Vec<PathBuf>> {
        let rendered = [
            self.plot_salary_distribution(postings)?,
            self.plot_top_jobs(postings, n)?,
            self.plot_salary_by_job(postings, n)?,
            self.plot_experience_salaries(postings)?,
        ];

        Ok(rendered.into_iter().flatten().collect())
    }
}
