use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::analysis::chart::{ChartRenderer, JsonRenderer, TerminalRenderer};
use crate::analysis::{self, AnalysisOptions};
use crate::clean::{clean_movies_file, clean_series_file};
use crate::scraper::{self, ScrapeStats};
use crate::settings::Settings;
use crate::sources::{DataPaths, MOVIE_URLS, SERIES_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scrape,
    Clean,
    Analyze,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Scrape, Stage::Clean, Stage::Analyze];
}

/// Rows written by the clean stage; `None` when that raw file was absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub series: Option<usize>,
    pub movies: Option<usize>,
}

pub struct Pipeline {
    settings: Settings,
    paths: DataPaths,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        let paths = DataPaths::in_dir(&settings.data_dir);
        Pipeline { settings, paths }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Run stages in order, stopping at the first failure.
    pub async fn run(&self, stages: &[Stage]) -> Result<()> {
        for &stage in stages {
            let t = Instant::now();
            match stage {
                Stage::Scrape => {
                    let stats = self.scrape().await?;
                    print_scrape(&stats);
                }
                Stage::Clean => {
                    let stats = self.clean()?;
                    print_clean(&stats);
                }
                Stage::Analyze => {
                    let n = self.analyze()?;
                    println!("\nAnalyzed {} originals.", n);
                }
            }
            info!(?stage, elapsed = ?t.elapsed(), "Stage finished");
        }
        Ok(())
    }

    pub async fn scrape(&self) -> Result<ScrapeStats> {
        let client = scraper::build_client(
            &self.settings.user_agent,
            Duration::from_secs(self.settings.timeout_secs),
        )?;
        scraper::scrape_listings(
            &client,
            SERIES_URL,
            MOVIE_URLS,
            &self.paths.raw_series,
            &self.paths.raw_movies,
        )
        .await
    }

    /// Clean whichever raw files exist. Neither existing is an error.
    pub fn clean(&self) -> Result<CleanStats> {
        let p = &self.paths;
        if !p.raw_series.exists() && !p.raw_movies.exists() {
            bail!(
                "no raw data in {} (run `scrape` first)",
                self.settings.data_dir.display()
            );
        }

        let series = if_present(&p.raw_series, || clean_series_file(&p.raw_series, &p.clean_series))?;
        let movies = if_present(&p.raw_movies, || {
            clean_movies_file(&p.raw_movies, &p.clean_movies, self.settings.movie_runtime_policy)
        })?;
        Ok(CleanStats { series, movies })
    }

    /// Render every chart to the terminal, and as JSON when a charts dir is set.
    pub fn analyze(&self) -> Result<usize> {
        let mut renderers: Vec<Box<dyn ChartRenderer>> = vec![Box::new(TerminalRenderer::stdout())];
        if let Some(dir) = &self.settings.charts_dir {
            renderers.push(Box::new(JsonRenderer::new(dir.clone())));
        }
        self.analyze_with(&mut renderers)
    }

    pub fn analyze_with(&self, renderers: &mut [Box<dyn ChartRenderer>]) -> Result<usize> {
        let opts = AnalysisOptions {
            top_n: self.settings.top_n,
            excluded_year: self.settings.excluded_year,
        };
        analysis::analyze_files(&self.paths.clean_series, &self.paths.clean_movies, opts, renderers)
    }
}

fn if_present(input: &Path, stage: impl FnOnce() -> Result<usize>) -> Result<Option<usize>> {
    if input.exists() {
        stage().map(Some)
    } else {
        warn!("{} not found, skipping", input.display());
        Ok(None)
    }
}

fn show(n: Option<usize>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
}

fn print_scrape(stats: &ScrapeStats) {
    println!(
        "Scraped {} pages ({} ok, {} errors): {} series rows, {} movie rows.",
        stats.total,
        stats.ok,
        stats.errors,
        show(stats.series_rows),
        show(stats.movie_rows)
    );
}

fn print_clean(stats: &CleanStats) {
    println!(
        "Cleaned {} series, {} movies.",
        show(stats.series),
        show(stats.movies)
    );
}
