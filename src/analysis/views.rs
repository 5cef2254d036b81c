//! The four aggregate views over the combined originals.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use super::dataset::{Category, Original};
use crate::clean::genre::genre_tokens;

/// Count genre tokens, most frequent first. Equal counts keep first-appearance order.
fn count_genres<'a>(genres: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    // token -> (count, first seen)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut seen = 0usize;
    for genre in genres {
        for token in genre_tokens(genre) {
            let entry = counts.entry(token).or_insert_with(|| {
                seen += 1;
                (0, seen)
            });
            entry.0 += 1;
        }
    }
    counts
        .into_iter()
        .sorted_by(|(_, (ca, fa)), (_, (cb, fb))| cb.cmp(ca).then(fa.cmp(fb)))
        .map(|(token, (count, _))| (token, count))
        .collect()
}

/// The `n` most frequent genre tokens across all originals.
pub fn top_genres(originals: &[Original], n: usize) -> Vec<(String, usize)> {
    let mut counts = count_genres(originals.iter().filter_map(|o| o.genre.as_deref()));
    counts.truncate(n);
    counts
}

/// Originals per premiere year, oldest first. `excluded` is left out.
pub fn releases_per_year(originals: &[Original], excluded: u16) -> BTreeMap<u16, usize> {
    originals
        .iter()
        .filter_map(|o| o.premiere)
        .filter(|&year| year != excluded)
        .counts()
        .into_iter()
        .collect()
}

/// Mean runtime in minutes per category, ignoring `excluded` and missing runtimes.
pub fn average_runtime_by_category(originals: &[Original], excluded: u16) -> Vec<(Category, f64)> {
    let mut totals: BTreeMap<Category, (u64, u64)> = BTreeMap::new();
    for o in originals.iter().filter(|o| o.premiere != Some(excluded)) {
        if let Some(runtime) = o.runtime {
            let t = totals.entry(o.category).or_default();
            t.0 += u64::from(runtime.minutes());
            t.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(category, (sum, n))| (category, sum as f64 / n as f64))
        .collect()
}

/// The `n` most frequent genre tokens among renewed series.
pub fn renewed_genres(originals: &[Original], n: usize) -> Vec<(String, usize)> {
    let renewed = originals
        .iter()
        .filter(|o| o.category == Category::Series)
        .filter(|o| {
            o.status
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains("renewed"))
        })
        .filter_map(|o| o.genre.as_deref());
    let mut counts = count_genres(renewed);
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::runtime::Runtime;

    fn original(category: Category, genre: &str, year: Option<u16>, minutes: Option<u32>, status: &str) -> Original {
        Original {
            title: None,
            genre: (!genre.is_empty()).then(|| genre.to_string()),
            runtime: minutes.map(|m| match category {
                Category::Movies => Runtime::Single { minutes: m },
                Category::Series => Runtime::Range { min: m, max: m, avg: m },
            }),
            premiere: year,
            status: (!status.is_empty()).then(|| status.to_string()),
            category,
        }
    }

    fn sample() -> Vec<Original> {
        use Category::*;
        vec![
            original(Series, "drama,thriller", Some(2017), Some(58), "Ended"),
            original(Series, "comedy,horror", Some(2022), Some(51), "Renewed"),
            original(Series, "drama", Some(2025), Some(300), "Renewed for season 3"),
            original(Series, "cooking", Some(2015), None, "renewed"),
            original(Movies, "action comedy", Some(2021), Some(118), ""),
            original(Movies, "drama", Some(2021), Some(100), ""),
            original(Movies, "documentary", None, Some(90), ""),
            original(Movies, "", Some(2025), Some(1000), ""),
        ]
    }

    #[test]
    fn genres_by_frequency() {
        let top = top_genres(&sample(), 3);
        assert_eq!(
            top,
            vec![("drama".to_string(), 3), ("comedy".to_string(), 2), ("thriller".to_string(), 1)]
        );
    }

    #[test]
    fn genre_ties_keep_first_appearance() {
        let top = top_genres(&sample(), 10);
        let ones: Vec<&str> = top
            .iter()
            .filter(|(_, c)| *c == 1)
            .map(|(g, _)| g.as_str())
            .collect();
        assert_eq!(ones, vec!["thriller", "horror", "cooking", "action", "documentary"]);
    }

    #[test]
    fn releases_skip_excluded_and_unknown_years() {
        let by_year = releases_per_year(&sample(), 2025);
        assert_eq!(
            by_year.into_iter().collect::<Vec<_>>(),
            vec![(2015, 1), (2017, 1), (2021, 2), (2022, 1)]
        );
    }

    #[test]
    fn average_runtime_ignores_missing_and_excluded() {
        let avg = average_runtime_by_category(&sample(), 2025);
        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0].0, Category::Movies);
        assert!((avg[0].1 - (118.0 + 100.0 + 90.0) / 3.0).abs() < 1e-9);
        assert_eq!(avg[1].0, Category::Series);
        assert!((avg[1].1 - (58.0 + 51.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn category_without_runtimes_is_omitted() {
        let only = vec![original(Category::Series, "drama", Some(2020), None, "Ended")];
        assert!(average_runtime_by_category(&only, 2025).is_empty());
    }

    #[test]
    fn renewed_is_case_insensitive_and_series_only() {
        let renewed = renewed_genres(&sample(), 10);
        assert_eq!(
            renewed,
            vec![
                ("comedy".to_string(), 1),
                ("horror".to_string(), 1),
                ("drama".to_string(), 1),
                ("cooking".to_string(), 1),
            ]
        );
    }
}
