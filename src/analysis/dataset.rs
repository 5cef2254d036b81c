use std::fmt;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::clean::movies::MovieRecord;
use crate::clean::runtime::{Runtime, UNKNOWN};
use crate::clean::series::SeriesRecord;
use crate::clean::{read_movies, read_series};

/// Which listing an original came from. Orders alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Movies,
    Series,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Movies => "Movies",
            Category::Series => "Series",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A cleaned series or movie row, tagged with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Original {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub runtime: Option<Runtime>,
    pub premiere: Option<u16>,
    pub status: Option<String>,
    pub category: Category,
}

fn known(text: String) -> Option<String> {
    (!text.is_empty() && text != UNKNOWN).then_some(text)
}

fn year(text: &str) -> Option<u16> {
    text.trim().parse().ok()
}

impl From<SeriesRecord> for Original {
    fn from(r: SeriesRecord) -> Self {
        Original {
            premiere: year(&r.premiere),
            title: known(r.title),
            genre: known(r.genre),
            runtime: r.runtime,
            status: known(r.status),
            category: Category::Series,
        }
    }
}

impl From<MovieRecord> for Original {
    fn from(r: MovieRecord) -> Self {
        Original {
            premiere: year(&r.premiere),
            title: r.title,
            genre: known(r.genre),
            runtime: r.runtime,
            status: None,
            category: Category::Movies,
        }
    }
}

/// Load both cleaned files, series first. A missing file is skipped with a
/// warning; both missing is an error.
pub fn load(series_path: &Path, movies_path: &Path) -> Result<Vec<Original>> {
    if !series_path.exists() && !movies_path.exists() {
        bail!(
            "no cleaned data: neither {} nor {} exists (run `clean` first)",
            series_path.display(),
            movies_path.display()
        );
    }

    let mut originals = Vec::new();
    if series_path.exists() {
        let series = read_series(series_path)?;
        info!("Loaded {} series from {}", series.len(), series_path.display());
        originals.extend(series.into_iter().map(Original::from));
    } else {
        warn!("{} not found, analyzing movies only", series_path.display());
    }
    if movies_path.exists() {
        let movies = read_movies(movies_path)?;
        info!("Loaded {} movies from {}", movies.len(), movies_path.display());
        originals.extend(movies.into_iter().map(Original::from));
    } else {
        warn!("{} not found, analyzing series only", movies_path.display());
    }
    Ok(originals)
}
