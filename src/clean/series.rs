use serde::{Deserialize, Serialize};
use tracing::debug;

use super::genre::normalize_series_genre;
use super::runtime::{self, normalize_series_runtime, Runtime, UNKNOWN};
use super::strip_citations;
use super::year::extract_year;
use crate::table::{Cell, Frame};

/// Columns kept from the raw series file, in output order.
pub const SERIES_COLUMNS: [&str; 6] = ["Title", "Genre", "Runtime", "Premiere", "Status", "Subject"];

const STATUS: usize = 4;

/// Placeholder title used by the listing for announced-but-unnamed shows.
pub const AWAITING_RELEASE: &str = "Awaiting release";

/// One row of `netflix_series_clean.csv`. Missing text is [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Runtime", with = "runtime::cell_or_unknown")]
    pub runtime: Option<Runtime>,
    #[serde(rename = "Premiere")]
    pub premiere: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Subject")]
    pub subject: String,
}

/// Raw series table → cleaned records. Rows without a status are dropped.
pub fn clean_series(mut raw: Frame) -> Vec<SeriesRecord> {
    raw.drop_duplicates();

    let mut frame = raw.select(&SERIES_COLUMNS);
    frame
        .rows
        .retain(|row| row[0].as_deref() != Some(AWAITING_RELEASE));
    strip_series_citations(&mut frame);

    let total = frame.len();
    let records: Vec<SeriesRecord> = frame.rows.into_iter().filter_map(to_record).collect();
    debug!(
        kept = records.len(),
        dropped = total - records.len(),
        "Series rows cleaned"
    );
    records
}

/// A status that held only footnote markers stays present but empty, so the row
/// is kept; other cells left blank become missing.
fn strip_series_citations(frame: &mut Frame) {
    for row in &mut frame.rows {
        for (col, cell) in row.iter_mut().enumerate() {
            if let Some(text) = cell.take() {
                *cell = match strip_citations(&text) {
                    None if col == STATUS => Some(String::new()),
                    stripped => stripped,
                };
            }
        }
    }
}

fn to_record(row: Vec<Cell>) -> Option<SeriesRecord> {
    let [title, genre, runtime, premiere, status, subject]: [Cell; 6] = row.try_into().ok()?;

    let fill = |c: Cell| c.unwrap_or_else(|| UNKNOWN.to_string());
    let status = fill(status);
    if status == UNKNOWN {
        return None;
    }

    // Docuseries tables list a subject instead of a genre
    let genre = genre.or_else(|| subject.clone());

    Some(SeriesRecord {
        title: fill(title),
        genre: genre
            .map(|g| normalize_series_genre(&g))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        runtime: normalize_series_runtime(runtime.as_deref()),
        premiere: extract_year(premiere.as_deref()),
        status,
        subject: fill(subject),
    })
}
