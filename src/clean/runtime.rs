//! Runtime normalization.
//!
//! Scraped runtimes come in two dialects: movie pages give one duration
//! (`"97 min"`, `"1h 30min"`), series pages give an episode range (`"24–52 min."`).
//! Both are normalized into [`Runtime`], which is written to the cleaned files in its
//! canonical text encoding:
//!
//! ```text
//! Single → minutes:97
//! Range  → min:24,max:52,avg:38
//! ```
//!
//! The two normalizers deliberately differ in how they treat text they cannot read:
//! movies use [`ParsePolicy::Strict`] and surface a [`RuntimeParseError`], series are
//! always lenient and fall back to a missing value.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

static NON_RANGE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9\-–]").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Fill value written for missing fields in the cleaned series file.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Single { minutes: u32 },
    Range { min: u32, max: u32, avg: u32 },
}

impl Runtime {
    /// Range with the truncated mean of both ends.
    pub fn range(min: u32, max: u32) -> Self {
        let avg = ((u64::from(min) + u64::from(max)) / 2) as u32;
        Runtime::Range { min, max, avg }
    }

    /// One representative duration: the single value, or the average of a range.
    pub fn minutes(&self) -> u32 {
        match *self {
            Runtime::Single { minutes } => minutes,
            Runtime::Range { avg, .. } => avg,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Read an encoded runtime back. `minutes:<n>` wins over `avg:<n>`; for a range
    /// the `avg` tail is what matters, `min`/`max` fall back to it when absent.
    pub fn decode(text: &str) -> Option<Self> {
        if let Some(tail) = text.split("minutes:").nth(1) {
            let minutes = tail.trim().parse().ok()?;
            return Some(Runtime::Single { minutes });
        }
        let avg: u32 = text.split("avg:").nth(1)?.trim().parse().ok()?;
        let field = |key: &str| {
            text.split(',')
                .filter_map(|part| part.split_once(':'))
                .find(|(k, _)| k.trim() == key)
                .and_then(|(_, v)| v.trim().parse().ok())
        };
        Some(Runtime::Range {
            min: field("min").unwrap_or(avg),
            max: field("max").unwrap_or(avg),
            avg,
        })
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Single { minutes } => write!(f, "minutes:{}", minutes),
            Runtime::Range { min, max, avg } => write!(f, "min:{},max:{},avg:{}", min, max, avg),
        }
    }
}

/// What to do with runtime text that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Fail with [`RuntimeParseError`].
    #[default]
    Strict,
    /// Treat it as missing.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot read runtime {text:?}")]
pub struct RuntimeParseError {
    pub text: String,
}

/// Movie runtime under the strict policy.
///
/// `"97 min"` → 97, `"1h 30min"` → 90, `"2h"` → 120. Empty, missing and `"unknown"`
/// are `Ok(None)`; any other text that is not a whole number is an error.
pub fn normalize_movie_runtime(raw: Option<&str>) -> Result<Option<Runtime>, RuntimeParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let text = raw.replace('.', " ").replace("min", "");
    let text = text.trim();
    if text.is_empty() || text == "unknown" {
        return Ok(None);
    }

    let err = || RuntimeParseError {
        text: raw.to_string(),
    };
    let part = |s: &str| -> Result<u32, RuntimeParseError> {
        let s = s.trim();
        if s.is_empty() {
            Ok(0)
        } else {
            s.parse().map_err(|_| err())
        }
    };

    let minutes = match text.split_once('h') {
        Some((hours, mins)) => part(hours)?
            .checked_mul(60)
            .and_then(|h| h.checked_add(part(mins).ok()?))
            .ok_or_else(err)?,
        None => text.parse().map_err(|_| err())?,
    };
    Ok(Some(Runtime::Single { minutes }))
}

/// Movie runtime under an explicit policy.
pub fn normalize_movie_runtime_with(
    raw: Option<&str>,
    policy: ParsePolicy,
) -> Result<Option<Runtime>, RuntimeParseError> {
    match (normalize_movie_runtime(raw), policy) {
        (Err(e), ParsePolicy::Lenient) => {
            warn!("{}; left missing", e);
            Ok(None)
        }
        (result, _) => result,
    }
}

/// Series runtime: always lenient.
///
/// Keeps only digits and range dashes, then reads the digit runs. One value is a
/// degenerate range, two values are `min`/`max`, zero or more than two are missing.
pub fn normalize_series_runtime(raw: Option<&str>) -> Option<Runtime> {
    let cleaned = NON_RANGE_CHARS.replace_all(raw?, "").replace('–', "-");
    let numbers: Vec<u32> = DIGIT_RUN
        .find_iter(&cleaned)
        .map(|m| m.as_str().parse().ok())
        .collect::<Option<_>>()?;

    match numbers.as_slice() {
        [n] => Some(Runtime::Range {
            min: *n,
            max: *n,
            avg: *n,
        }),
        [a, b] => Some(Runtime::range(*a, *b)),
        _ => None,
    }
}

/// serde adapters for `Option<Runtime>` CSV fields.
pub mod cell {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Runtime;

    /// Missing is written as an empty field.
    pub fn serialize<S: Serializer>(value: &Option<Runtime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(r) => s.serialize_str(&r.encode()),
            None => s.serialize_str(""),
        }
    }

    /// Anything that does not decode (empty, `Unknown`, junk) is missing.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Runtime>, D::Error> {
        let text = Option::<String>::deserialize(d)?;
        Ok(text.as_deref().and_then(Runtime::decode))
    }
}

/// Like [`cell`], but missing is written as [`UNKNOWN`].
pub mod cell_or_unknown {
    use serde::{Deserializer, Serializer};

    use super::{Runtime, UNKNOWN};

    pub fn serialize<S: Serializer>(value: &Option<Runtime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(r) => s.serialize_str(&r.encode()),
            None => s.serialize_str(UNKNOWN),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Runtime>, D::Error> {
        super::cell::deserialize(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(s: &str) -> Option<String> {
        normalize_movie_runtime(Some(s)).unwrap().map(|r| r.encode())
    }

    fn series(s: &str) -> Option<String> {
        normalize_series_runtime(Some(s)).map(|r| r.encode())
    }

    fn decode_minutes(text: &str) -> Option<u32> {
        Runtime::decode(text).map(|r| r.minutes())
    }

    #[test]
    fn movie_plain_minutes() {
        for n in [1, 42, 97, 240] {
            assert_eq!(movie(&format!("{} min", n)), Some(format!("minutes:{}", n)));
        }
        assert_eq!(movie("96 min."), Some("minutes:96".into()));
    }

    #[test]
    fn movie_hours_and_minutes() {
        for (h, m) in [(1, 30), (2, 5), (0, 45), (3, 0)] {
            assert_eq!(
                movie(&format!("{}h {}min", h, m)),
                Some(format!("minutes:{}", h * 60 + m))
            );
        }
        assert_eq!(movie("2h"), Some("minutes:120".into()));
        assert_eq!(movie("h 45min"), Some("minutes:45".into()));
    }

    #[test]
    fn movie_missing_values() {
        assert_eq!(normalize_movie_runtime(None), Ok(None));
        assert_eq!(movie(""), None);
        assert_eq!(movie("   "), None);
        assert_eq!(movie("unknown"), None);
        assert_eq!(movie("min"), None);
    }

    #[test]
    fn movie_strict_rejects_junk() {
        let err = normalize_movie_runtime(Some("about 90 min")).unwrap_err();
        assert_eq!(err.text, "about 90 min");
        assert!(normalize_movie_runtime(Some("1h 2h")).is_err());
        assert!(normalize_movie_runtime(Some("Unknown")).is_err());
        assert!(normalize_movie_runtime(Some("-5")).is_err());
    }

    #[test]
    fn movie_lenient_maps_junk_to_missing() {
        assert_eq!(
            normalize_movie_runtime_with(Some("about 90 min"), ParsePolicy::Lenient),
            Ok(None)
        );
        assert!(normalize_movie_runtime_with(Some("about 90 min"), ParsePolicy::Strict).is_err());
        assert_eq!(
            normalize_movie_runtime_with(Some("1h 30min"), ParsePolicy::Lenient),
            Ok(Some(Runtime::Single { minutes: 90 }))
        );
    }

    #[test]
    fn movie_overflow_is_an_error() {
        assert!(normalize_movie_runtime(Some("99999999999h")).is_err());
        assert!(normalize_movie_runtime(Some("71582789h 59min")).is_err());
    }

    #[test]
    fn series_single_value() {
        for n in [22, 45, 60] {
            assert_eq!(
                series(&format!("{} min.", n)),
                Some(format!("min:{n},max:{n},avg:{n}"))
            );
        }
    }

    #[test]
    fn series_ranges() {
        assert_eq!(series("24–52"), Some("min:24,max:52,avg:38".into()));
        assert_eq!(series("42–150 min."), Some("min:42,max:150,avg:96".into()));
        assert_eq!(series("21-25 min"), Some("min:21,max:25,avg:23".into()));
        // truncating mean
        assert_eq!(series("45–60"), Some("min:45,max:60,avg:52".into()));
    }

    #[test]
    fn series_lenient_fallbacks() {
        assert_eq!(normalize_series_runtime(None), None);
        assert_eq!(series("TBA"), None);
        assert_eq!(series(""), None);
        assert_eq!(series("22–44–66 min"), None);
    }

    #[test]
    fn decode_both_encodings() {
        assert_eq!(decode_minutes("minutes:97"), Some(97));
        assert_eq!(decode_minutes("min:24,max:52,avg:38"), Some(38));
        assert_eq!(
            Runtime::decode("min:24,max:52,avg:38"),
            Some(Runtime::Range { min: 24, max: 52, avg: 38 })
        );
        assert_eq!(decode_minutes("avg:40"), Some(40));
    }

    #[test]
    fn decode_rejects_other_forms() {
        assert_eq!(decode_minutes("97"), None);
        assert_eq!(decode_minutes("Unknown"), None);
        assert_eq!(decode_minutes(""), None);
        assert_eq!(decode_minutes("minutes:abc"), None);
        assert_eq!(decode_minutes("min:1,max:2,avg:"), None);
    }

    #[test]
    fn raw_to_encoded_to_minutes() {
        let r = normalize_movie_runtime(Some("1h 30min")).unwrap().unwrap();
        assert_eq!(r.encode(), "minutes:90");
        assert_eq!(decode_minutes(&r.encode()), Some(90));

        let r = normalize_series_runtime(Some("24–52")).unwrap();
        assert_eq!(r.encode(), "min:24,max:52,avg:38");
        assert_eq!(Runtime::decode(&r.encode()), Some(r));
    }
}
