use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// A scraped cell. `None` is a missing value and is written as an empty CSV field.
pub type Cell = Option<String>;

/// Loosely-typed string table: the shape of the raw scrape files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(headers: Vec<String>) -> Self {
        Frame {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Stack frames vertically. Columns are the union of all headers in first-seen
    /// order; cells a frame has no column for stay missing.
    pub fn concat(frames: Vec<Frame>) -> Frame {
        let mut headers: Vec<String> = Vec::new();
        for frame in &frames {
            for h in &frame.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let mut out = Frame::new(headers);
        for frame in frames {
            let mapping: Vec<usize> = frame
                .headers
                .iter()
                .filter_map(|h| out.column_index(h))
                .collect();
            for row in frame.rows {
                let mut new_row = vec![None; out.headers.len()];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    new_row[target] = cell;
                }
                out.rows.push(new_row);
            }
        }
        out
    }

    /// Drop repeated rows, keeping the first occurrence.
    pub fn drop_duplicates(&mut self) {
        let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    pub fn rename(&mut self, from: &str, to: &str) {
        for h in self.headers.iter_mut().filter(|h| h.as_str() == from) {
            *h = to.to_string();
        }
    }

    /// Project onto `columns`, in that order. A column the frame lacks comes back
    /// all-missing.
    pub fn select(&self, columns: &[&str]) -> Frame {
        let indices: Vec<Option<usize>> = columns
            .iter()
            .map(|c| {
                let idx = self.column_index(c);
                if idx.is_none() {
                    warn!("Column {:?} not present; treating it as missing", c);
                }
                idx
            })
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row.get(i).cloned().flatten()))
                    .collect()
            })
            .collect();

        Frame {
            headers: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Apply `f` to every present cell of every column.
    pub fn map_cells(&mut self, mut f: impl FnMut(&str) -> Cell) {
        for cell in self.rows.iter_mut().flatten() {
            if let Some(text) = cell.take() {
                *cell = f(&text);
            }
        }
    }

    pub fn read_csv(path: &Path) -> Result<Frame> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Frame::from_reader(file).with_context(|| format!("reading {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Frame> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();
        let mut frame = Frame::new(headers);

        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<Cell> = record
                .iter()
                .take(width)
                .map(|f| if f.is_empty() { None } else { Some(f.to_string()) })
                .collect();
            row.resize(width, None);
            frame.rows.push(row);
        }
        Ok(frame)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.to_writer(file)
            .with_context(|| format!("writing {}", path.display()))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}
