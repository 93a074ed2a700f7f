use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::reconciler::DEFAULT_MAX_RESULTS;

pub const DEFAULT_URL: &str = "https://megasena.com/en/quina/results";
pub const DEFAULT_DATA_FILE: &str = "data/results.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const SOURCE: &str = "megasena.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub data_file: PathBuf,
    pub max_results: usize,
    pub timeout: Duration,
    pub source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            source: SOURCE.to_string(),
        }
    }
}

pub fn load() -> Result<Config> {
    from_lookup(|key| env::var(key).ok())
}

/// Builds the config from any key lookup; `load` passes the environment.
pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let url = lookup("QUINA_URL").unwrap_or(defaults.url);
    let data_file = lookup("QUINA_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or(defaults.data_file);
    let max_results = parsed(&lookup, "QUINA_MAX_RESULTS")?.unwrap_or(defaults.max_results);
    let timeout = parsed(&lookup, "QUINA_TIMEOUT_SECS")?
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);

    if max_results == 0 {
        bail!("QUINA_MAX_RESULTS must be at least 1");
    }

    Ok(Config {
        url,
        data_file,
        max_results,
        timeout,
        source: defaults.source,
    })
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value {:?} for {}", raw, key))
        })
        .transpose()
}
