use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::clean::runtime::ParsePolicy;

pub const ENV_PREFIX: &str = "ORIGINALS";

/// Runtime knobs. Defaults, then `ORIGINALS_*` environment variables; CLI flags are
/// applied on top by `main`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub movie_runtime_policy: ParsePolicy,
    /// Partial year left out of the year-over-year views.
    pub excluded_year: u16,
    pub top_n: usize,
    #[serde(default)]
    pub charts_dir: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("data_dir", "data")?
            .set_default(
                "user_agent",
                concat!("originals_pipeline/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("timeout_secs", 30_i64)?
            .set_default("movie_runtime_policy", "strict")?
            .set_default("excluded_year", 2025_i64)?
            .set_default("top_n", 10_i64)?
            .add_source(env)
            .build()
            .context("building settings")?
            .try_deserialize()
            .context("invalid ORIGINALS_* settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn defaults() {
        let s = Settings::from_source(env(&[])).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.timeout_secs, 30);
        assert_eq!(s.movie_runtime_policy, ParsePolicy::Strict);
        assert_eq!(s.excluded_year, 2025);
        assert_eq!(s.top_n, 10);
        assert!(s.charts_dir.is_none());
    }

    #[test]
    fn environment_overrides() {
        let s = Settings::from_source(env(&[
            ("ORIGINALS_DATA_DIR", "/tmp/originals"),
            ("ORIGINALS_MOVIE_RUNTIME_POLICY", "lenient"),
            ("ORIGINALS_TOP_N", "5"),
        ]))
        .unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/tmp/originals"));
        assert_eq!(s.movie_runtime_policy, ParsePolicy::Lenient);
        assert_eq!(s.top_n, 5);
    }
}
