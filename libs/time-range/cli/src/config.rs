use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use time_range::{ResolveOptions, WeekStart};

pub const CONFIG_ENV: &str = "TIME_RANGE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./time-range.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml parsing failed")]
    Toml(#[from] toml::de::Error),
    #[error("unknown time zone {0}")]
    TimeZone(String),
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub relative_start: Option<String>,
    pub relative_end: Option<String>,
    pub week_start: WeekStart,
    /// IANA zone name. The system zone is used when unset.
    pub time_zone: Option<String>,
    /// Columns filtered by `filter` when none are given on the command line.
    pub time_range_cols: Vec<String>,
}

impl Config {
    /// Loads the first config found among the explicit path,
    /// `$TIME_RANGE_CONFIG` and `./time-range.toml`.
    ///
    /// An explicit path must exist. Falls back to defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        let candidates = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .into_iter()
            .chain([PathBuf::from(DEFAULT_CONFIG_PATH)]);
        for path in candidates {
            if path.is_file() {
                return Self::read(&path);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self, Error> {
        let config = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(?path, "loaded config");
        Self::parse(&config)
    }

    pub fn parse(config: &str) -> Result<Self, Error> {
        Ok(toml::from_str(config)?)
    }

    pub fn time_zone(&self) -> Result<TimeZone, Error> {
        match &self.time_zone {
            Some(name) => TimeZone::get(name).map_err(|_| Error::TimeZone(name.clone())),
            None => Ok(TimeZone::system()),
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            relative_start: self.relative_start.clone(),
            relative_end: self.relative_end.clone(),
            week_start: self.week_start,
        }
    }
}
