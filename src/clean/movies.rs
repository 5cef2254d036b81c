use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::genre::{normalize_movie_genre, MOVIE_GENRE_FALLBACK};
use super::runtime::{self, normalize_movie_runtime_with, ParsePolicy, Runtime};
use super::strip_citations;
use super::year::extract_year;
use crate::table::{Cell, Frame};

/// Columns kept from the raw movies file, in output order.
pub const MOVIE_COLUMNS: [&str; 5] = ["Title", "Premiere", "Genre", "Runtime", "Language"];

/// The film listings call the premiere column this.
pub const RELEASE_DATE: &str = "Release date";

/// One row of `netflix_movies_clean.csv`. Missing values stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Premiere")]
    pub premiere: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Runtime", with = "runtime::cell")]
    pub runtime: Option<Runtime>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
}

/// Raw movies table → cleaned records.
///
/// Under [`ParsePolicy::Strict`] the first unreadable runtime aborts with an error
/// naming the row; under [`ParsePolicy::Lenient`] it is logged and left missing.
pub fn clean_movies(mut raw: Frame, policy: ParsePolicy) -> Result<Vec<MovieRecord>> {
    raw.drop_duplicates();
    raw.rename(RELEASE_DATE, "Premiere");

    let mut frame = raw.select(&MOVIE_COLUMNS);
    frame.rows.retain(|row| row.iter().any(Option::is_some));
    frame.map_cells(strip_citations);

    frame
        .rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| to_record(i, row, policy))
        .collect()
}

fn to_record(index: usize, row: Vec<Cell>, policy: ParsePolicy) -> Result<MovieRecord> {
    let [title, premiere, genre, raw_runtime, language]: [Cell; 5] = row
        .try_into()
        .map_err(|r: Vec<Cell>| anyhow::anyhow!("row {} has {} cells", index + 1, r.len()))?;

    let runtime = normalize_movie_runtime_with(raw_runtime.as_deref(), policy).with_context(|| {
        format!("movie row {} ({:?})", index + 1, title.as_deref().unwrap_or(""))
    })?;

    let genre = genre.unwrap_or_else(|| MOVIE_GENRE_FALLBACK.to_string());

    Ok(MovieRecord {
        premiere: extract_year(premiere.as_deref()),
        genre: normalize_movie_genre(&genre),
        runtime,
        title,
        language,
    })
}
