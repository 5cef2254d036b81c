pub mod genre;
pub mod movies;
pub mod runtime;
pub mod series;
pub mod year;

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::table::{ensure_parent, Cell, Frame};
use movies::{clean_movies, MovieRecord, MOVIE_COLUMNS};
use runtime::ParsePolicy;
use series::{clean_series, SeriesRecord, SERIES_COLUMNS};

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Remove footnote markers like `[12]`; a cell left blank becomes missing.
pub fn strip_citations(text: &str) -> Cell {
    let cleaned = CITATION_RE.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Raw series CSV → cleaned series CSV. Returns the number of rows written.
pub fn clean_series_file(input: &Path, output: &Path) -> Result<usize> {
    let raw = Frame::read_csv(input)?;
    if raw.is_empty() {
        warn!("{} has no rows", input.display());
    }
    info!("Cleaning {} raw series rows from {}", raw.len(), input.display());
    let records = clean_series(raw);
    write_records(output, &SERIES_COLUMNS, &records)?;
    Ok(records.len())
}

/// Raw movies CSV → cleaned movies CSV. Returns the number of rows written.
pub fn clean_movies_file(input: &Path, output: &Path, policy: ParsePolicy) -> Result<usize> {
    let raw = Frame::read_csv(input)?;
    info!(
        ?policy,
        "Cleaning {} raw movie rows from {}",
        raw.len(),
        input.display()
    );
    let records: Vec<MovieRecord> =
        clean_movies(raw, policy).with_context(|| format!("cleaning {}", input.display()))?;
    write_records(output, &MOVIE_COLUMNS, &records)?;
    Ok(records.len())
}

/// Write typed records as CSV. The header row is written even with no records.
pub fn write_records<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(columns)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    rdr.deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .with_context(|| format!("reading {}", path.display()))
}

pub fn read_series(path: &Path) -> Result<Vec<SeriesRecord>> {
    read_records(path)
}

pub fn read_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    read_records(path)
}
