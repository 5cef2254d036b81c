use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::parser::parse_listing_page;
use crate::table::Frame;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("no tables found on {url}")]
    NoTables { url: String },
}

/// Scrape stats returned after completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    /// Rows written to the raw series file, if it was written.
    pub series_rows: Option<usize>,
    /// Rows written to the raw movies file, if it was written.
    pub movie_rows: Option<usize>,
}

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// Fetch one listing page and stack all its tables.
pub async fn fetch_listing(client: &Client, url: &str) -> Result<Frame, ScrapeError> {
    let http = |source| ScrapeError::Http {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status,
        });
    }
    let html = response.text().await.map_err(http)?;
    parse_listing_page(&html).ok_or_else(|| ScrapeError::NoTables {
        url: url.to_string(),
    })
}

/// Fetch the series page and every movie page, one after another, and write the
/// two raw files. A page that fails is logged and skipped.
pub async fn scrape_listings(
    client: &Client,
    series_url: &str,
    movie_urls: &[&str],
    series_out: &Path,
    movies_out: &Path,
) -> Result<ScrapeStats> {
    let total = 1 + movie_urls.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut errors = 0usize;

    pb.set_message("series");
    let series = match fetch_listing(client, series_url).await {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("Scraping series failed: {}", e);
            errors += 1;
            None
        }
    };
    pb.inc(1);

    let mut movies = Vec::with_capacity(movie_urls.len());
    for &url in movie_urls {
        pb.set_message(url.to_string());
        match fetch_listing(client, url).await {
            Ok(frame) => movies.push(frame),
            Err(e) => {
                warn!("Scraping movies from {} failed: {}", url, e);
                errors += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (series_rows, movie_rows) = write_raw(series, movies, series_out, movies_out)?;
    info!("Scraped {} pages ({} ok, {} errors)", total, total - errors, errors);

    Ok(ScrapeStats {
        total,
        ok: total - errors,
        errors,
        series_rows,
        movie_rows,
    })
}

/// Write whatever was scraped. No movie frames means no movie file.
fn write_raw(
    series: Option<Frame>,
    movies: Vec<Frame>,
    series_out: &Path,
    movies_out: &Path,
) -> Result<(Option<usize>, Option<usize>)> {
    let series_rows = match series {
        Some(frame) => {
            frame.write_csv(series_out)?;
            info!("Wrote {} series rows to {}", frame.len(), series_out.display());
            Some(frame.len())
        }
        None => None,
    };

    let movie_rows = if movies.is_empty() {
        warn!("No movies found; {} not written", movies_out.display());
        None
    } else {
        let frame = Frame::concat(movies);
        frame.write_csv(movies_out)?;
        info!("Wrote {} movie rows to {}", frame.len(), movies_out.display());
        Some(frame.len())
    };

    Ok((series_rows, movie_rows))
}
