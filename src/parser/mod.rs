pub mod tables;

use crate::table::Frame;

/// Page → tables → one frame: every table on the page stacked by column name.
/// `None` when the page carries no usable table.
pub fn parse_listing_page(html: &str) -> Option<Frame> {
    let tables = tables::extract_tables(html);
    if tables.is_empty() {
        return None;
    }
    Some(Frame::concat(tables))
}
