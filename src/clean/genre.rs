/// Genre used for movies listed without one (the documentary tables carry none).
pub const MOVIE_GENRE_FALLBACK: &str = "Documentary";

/// `"Comedy/Horror"` → `"comedy,horror"`.
pub fn normalize_series_genre(text: &str) -> String {
    text.replace('/', ",").to_lowercase()
}

/// `"Romantic comedy-drama"` → `"romantic comedy drama"`; slashes are dropped.
pub fn normalize_movie_genre(text: &str) -> String {
    text.replace(['\\', '/'], "")
        .replace('-', " ")
        .to_lowercase()
}

/// Genre tokens as counted by the analysis: commas and whitespace separate,
/// everything lowercase.
pub fn genre_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
