pub mod chart;
pub mod dataset;
pub mod views;

use std::path::Path;

use anyhow::Result;

use chart::{Chart, ChartKind, ChartRenderer};
use dataset::Original;

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub top_n: usize,
    pub excluded_year: u16,
}

/// The four views, in display order.
pub fn build_charts(originals: &[Original], opts: AnalysisOptions) -> Vec<Chart> {
    let counts = |v: Vec<(String, usize)>| v.into_iter().map(|(g, c)| (g, c as f64));

    vec![
        Chart::new(
            "top_genres",
            &format!("Top {} genres across Netflix originals", opts.top_n),
            "genre",
            "originals",
            ChartKind::Bar,
        )
        .with_points(counts(views::top_genres(originals, opts.top_n))),
        Chart::new(
            "releases_per_year",
            "Netflix originals released per year",
            "premiere year",
            "originals",
            ChartKind::Line,
        )
        .with_points(
            views::releases_per_year(originals, opts.excluded_year)
                .into_iter()
                .map(|(year, n)| (year, n as f64)),
        ),
        Chart::new(
            "average_runtime",
            "Average runtime by category",
            "category",
            "minutes",
            ChartKind::Bar,
        )
        .with_points(views::average_runtime_by_category(originals, opts.excluded_year)),
        Chart::new(
            "renewed_genres",
            &format!("Top {} genres among renewed series", opts.top_n),
            "genre",
            "renewed series",
            ChartKind::Bar,
        )
        .with_points(counts(views::renewed_genres(originals, opts.top_n))),
    ]
}

/// Load both cleaned files and hand every chart to every renderer.
/// Returns the number of originals analyzed.
pub fn analyze_files(
    series: &Path,
    movies: &Path,
    opts: AnalysisOptions,
    renderers: &mut [Box<dyn ChartRenderer>],
) -> Result<usize> {
    let originals = dataset::load(series, movies)?;
    for chart in build_charts(&originals, opts) {
        for renderer in renderers.iter_mut() {
            renderer.render(&chart)?;
        }
    }
    Ok(originals.len())
}
