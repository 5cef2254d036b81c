use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::table::{Cell, Frame};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

/// Upper bound for rowspan/colspan; guards against absurd attribute values.
const MAX_SPAN: usize = 1000;

struct GridRow {
    cells: Vec<Cell>,
    is_header: bool,
}

/// A cell value still owed to the rows below a `rowspan`.
struct Carry {
    remaining: usize,
    text: Cell,
}

/// Extract every `<table>` in the document as a `Frame`.
/// Tables without any body rows are skipped.
pub fn extract_tables(html: &str) -> Vec<Frame> {
    let document = Html::parse_document(html);
    document
        .select(&TABLE_SEL)
        .filter_map(|table| build_frame(table_grid(table)))
        .collect()
}

/// Rows belonging to `table` itself, not to tables nested inside it.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let table_id = table.id();
    table.select(&ROW_SEL).filter(move |tr| {
        tr.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "table")
            .map(|a| a.id())
            == Some(table_id)
    })
}

fn table_grid(table: ElementRef) -> Vec<GridRow> {
    let mut grid = Vec::new();
    let mut carry: Vec<Option<Carry>> = Vec::new();

    for tr in own_rows(table) {
        let in_thead = tr
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|p| p.value().name() == "thead");

        let mut cells: Vec<Cell> = Vec::new();
        let mut all_th = true;
        let mut own = 0usize;

        for cell in tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
        {
            take_carried(&mut carry, &mut cells);
            own += 1;
            all_th &= cell.value().name() == "th";

            let text = cell_text(cell);
            let colspan = span_attr(cell, "colspan");
            let rowspan = span_attr(cell, "rowspan");
            for _ in 0..colspan {
                let col = cells.len();
                if carry.len() <= col {
                    carry.resize_with(col + 1, || None);
                }
                if rowspan > 1 {
                    carry[col] = Some(Carry {
                        remaining: rowspan - 1,
                        text: text.clone(),
                    });
                }
                cells.push(text.clone());
            }
        }

        if own == 0 {
            continue;
        }

        // Spans reaching past this row's last own cell
        while carry[cells.len().min(carry.len())..]
            .iter()
            .any(Option::is_some)
        {
            if !take_carried(&mut carry, &mut cells) {
                cells.push(None);
            }
        }

        grid.push(GridRow {
            cells,
            is_header: in_thead || all_th,
        });
    }

    grid
}

/// Push carried values for consecutive spanned columns at the current position.
/// Returns whether anything was taken.
fn take_carried(carry: &mut [Option<Carry>], cells: &mut Vec<Cell>) -> bool {
    let mut took = false;
    while let Some(Some(c)) = carry.get_mut(cells.len()) {
        cells.push(c.text.clone());
        c.remaining -= 1;
        if c.remaining == 0 {
            carry[cells.len() - 1] = None;
        }
        took = true;
    }
    took
}

fn span_attr(cell: ElementRef, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Visible text of a cell, whitespace-collapsed. `<br>` separates words.
fn cell_text(cell: ElementRef) -> Cell {
    let mut raw = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|p| matches!(p.value().name(), "style" | "script"));
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(e) if e.name() == "br" => raw.push(' '),
            _ => {}
        }
    }
    let text = normalize_ws(&raw);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading header rows name the columns; everything after the first body row is data.
fn build_frame(grid: Vec<GridRow>) -> Option<Frame> {
    let split = grid.iter().position(|r| !r.is_header).unwrap_or(grid.len());
    let (head, body) = grid.split_at(split);
    if body.is_empty() {
        return None;
    }

    let width = grid.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let mut seen: HashMap<String, usize> = HashMap::new();
    let headers = (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in head {
                if let Some(Some(text)) = row.cells.get(col) {
                    if parts.last() != Some(&text.as_str()) {
                        parts.push(text);
                    }
                }
            }
            let name = if parts.is_empty() {
                col.to_string()
            } else {
                parts.join(" ")
            };
            unique_header(name, &mut seen)
        })
        .collect();

    let rows = body
        .iter()
        .map(|r| {
            let mut cells = r.cells.clone();
            cells.resize(width, None);
            cells
        })
        .collect();

    Some(Frame { headers, rows })
}

/// Repeated names get a `.N` suffix: `Genre`, `Genre.1`, ...
fn unique_header(name: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(name.clone()).or_insert(0);
    let out = if *count == 0 {
        name
    } else {
        format!("{}.{}", name, count)
    };
    *count += 1;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    #[test]
    fn simple_table() {
        let html = "<table><tr><th>Title</th><th>Genre</th></tr>\
                    <tr><td>Dark</td><td>Drama</td></tr></table>";
        let frames = extract_tables(html);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].headers, vec!["Title", "Genre"]);
        assert_eq!(frames[0].rows, vec![vec![cell("Dark"), cell("Drama")]]);
    }

    #[test]
    fn row_header_cells_stay_in_body() {
        let html = "<table><tr><th>Title</th><th>Runtime</th></tr>\
                    <tr><th scope=\"row\">Dark</th><td>45 min</td></tr></table>";
        let frames = extract_tables(html);
        assert_eq!(frames[0].rows[0], vec![cell("Dark"), cell("45 min")]);
    }

    #[test]
    fn rowspan_is_repeated_downwards() {
        let html = "<table><tr><th>Title</th><th>Premiere</th></tr>\
                    <tr><td>A</td><td rowspan=\"2\">May 1, 2020</td></tr>\
                    <tr><td>B</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.rows[1], vec![cell("B"), cell("May 1, 2020")]);
    }

    #[test]
    fn rowspan_in_first_column() {
        let html = "<table><tr><th>Date</th><th>Title</th></tr>\
                    <tr><td rowspan=\"2\">2021</td><td>A</td></tr>\
                    <tr><td>B</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.rows[1], vec![cell("2021"), cell("B")]);
    }

    #[test]
    fn colspan_is_repeated_sideways() {
        let html = "<table><tr><th>Title</th><th>Genre</th><th>Runtime</th></tr>\
                    <tr><td>A</td><td colspan=\"2\">TBA</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.rows[0], vec![cell("A"), cell("TBA"), cell("TBA")]);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let html = "<table><tr><th>Genre</th><th>Genre</th></tr>\
                    <tr><td>a</td><td>b</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.headers, vec!["Genre", "Genre.1"]);
    }

    #[test]
    fn headerless_table_uses_positions() {
        let html = "<table><tr><td>a</td><td>b</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.headers, vec!["0", "1"]);
    }

    #[test]
    fn empty_cells_are_missing_and_br_separates() {
        let html = "<table><tr><th>Title</th><th>Genre</th></tr>\
                    <tr><td>A</td><td> </td></tr>\
                    <tr><td>B</td><td>Drama<br>Comedy</td></tr></table>";
        let f = &extract_tables(html)[0];
        assert_eq!(f.rows[0][1], None);
        assert_eq!(f.rows[1][1], cell("Drama Comedy"));
    }

    #[test]
    fn nested_tables_do_not_leak_rows() {
        let html = "<table><tr><th>Title</th></tr>\
                    <tr><td>A<table><tr><td>inner</td></tr></table></td></tr></table>";
        let frames = extract_tables(html);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].rows.len(), 1);
    }

    #[test]
    fn header_only_table_is_skipped() {
        let html = "<table><tr><th>Title</th></tr></table>";
        assert!(extract_tables(html).is_empty());
    }

    #[test]
    fn series_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/series.html").unwrap();
        let frames = extract_tables(&html);
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0].headers,
            vec!["Title", "Genre", "Premiere", "Seasons", "Runtime", "Status"]
        );
        let f = Frame::concat(frames);
        assert!(f.headers.contains(&"Subject".to_string()));
        assert!(f.len() >= 6);
    }

    #[test]
    fn movies_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/movies.html").unwrap();
        let frames = extract_tables(&html);
        let f = Frame::concat(frames);
        assert!(f.column_index("Release date").is_some());
        assert!(f.column_index("Language").is_some());
        // rowspan on the release date cell covers two films
        let idx = f.column_index("Release date").unwrap();
        let dated = f
            .rows
            .iter()
            .filter(|r| r[idx].as_deref() == Some("January 15, 2021"))
            .count();
        assert_eq!(dated, 2);
    }
}
