use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// File stem used when the chart is exported.
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub points: Vec<Point>,
}

impl Chart {
    pub fn new(id: &str, title: &str, x_label: &str, y_label: &str, kind: ChartKind) -> Self {
        Chart {
            id: id.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
            points: Vec::new(),
        }
    }

    pub fn with_points<L: ToString>(mut self, points: impl IntoIterator<Item = (L, f64)>) -> Self {
        self.points = points
            .into_iter()
            .map(|(label, value)| Point {
                label: label.to_string(),
                value,
            })
            .collect();
        self
    }
}

pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()>;
}

/// Draws charts as text: `#` bars, or a `*` marker per point for line charts.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        TerminalRenderer { out }
    }
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        TerminalRenderer::new(std::io::stdout())
    }
}

impl<W: Write> ChartRenderer for TerminalRenderer<W> {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "\n{}", chart.title)?;
        writeln!(out, "({} → {})", chart.x_label, chart.y_label)?;

        if chart.points.is_empty() {
            writeln!(out, "  (no data)")?;
            return Ok(());
        }

        let label_width = chart
            .points
            .iter()
            .map(|p| p.label.chars().count())
            .max()
            .unwrap_or(0);
        let max = chart.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);

        for p in &chart.points {
            let len = if max > 0.0 {
                ((p.value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let mark = match chart.kind {
                ChartKind::Bar => "#".repeat(len),
                ChartKind::Line => format!("{}*", " ".repeat(len.saturating_sub(1))),
            };
            writeln!(
                out,
                "{:<lw$} | {:<bw$} {}",
                p.label,
                mark,
                format_value(p.value),
                lw = label_width,
                bw = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

/// Writes each chart as `<dir>/<id>.json`.
pub struct JsonRenderer {
    dir: PathBuf,
}

impl JsonRenderer {
    pub fn new(dir: PathBuf) -> Self {
        JsonRenderer { dir }
    }
}

impl ChartRenderer for JsonRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.dir.join(format!("{}.json", chart.id));
        let json = serde_json::to_string_pretty(chart)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote chart {}", path.display());
        Ok(())
    }
}
