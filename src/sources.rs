use std::path::{Path, PathBuf};

pub const SERIES_URL: &str = "https://en.wikipedia.org/wiki/List_of_Netflix_original_programming";

pub const MOVIE_URLS: &[&str] = &[
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2015%E2%80%932017)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2018)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2019)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2020)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2021)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2022)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2023)",
    "https://en.wikipedia.org/wiki/List_of_Netflix_original_films_(2024)#Shorts",
];

pub const RAW_SERIES_FILE: &str = "netflix_series.csv";
pub const RAW_MOVIES_FILE: &str = "netflix_movies.csv";
pub const CLEAN_SERIES_FILE: &str = "netflix_series_clean.csv";
pub const CLEAN_MOVIES_FILE: &str = "netflix_movies_clean.csv";

/// Locations of the four files that connect the stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub raw_series: PathBuf,
    pub raw_movies: PathBuf,
    pub clean_series: PathBuf,
    pub clean_movies: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        DataPaths {
            raw_series: dir.join(RAW_SERIES_FILE),
            raw_movies: dir.join(RAW_MOVIES_FILE),
            clean_series: dir.join(CLEAN_SERIES_FILE),
            clean_movies: dir.join(CLEAN_MOVIES_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_listing_pages() {
        assert_eq!(MOVIE_URLS.len() + 1, 9);
        assert!(MOVIE_URLS.iter().all(|u| u.contains("Netflix_original_films")));
    }

    #[test]
    fn paths_share_the_data_dir() {
        let p = DataPaths::in_dir(Path::new("out"));
        assert_eq!(p.raw_series, Path::new("out/netflix_series.csv"));
        assert_eq!(p.clean_movies, Path::new("out/netflix_movies_clean.csv"));
    }
}
