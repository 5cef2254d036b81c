use std::ops::RangeInclusive;

/// Years a premiere can be attributed to.
pub const PREMIERE_YEARS: RangeInclusive<u16> = 2015..=2025;

/// First year of [`PREMIERE_YEARS`] (in ascending order) that occurs anywhere in
/// `text`, or an empty string. Plain substring search: `"20150"` still yields 2015.
pub fn extract_year(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    PREMIERE_YEARS
        .map(|y| y.to_string())
        .find(|y| text.contains(y.as_str()))
        .unwrap_or_default()
}
