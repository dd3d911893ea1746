//! Process configuration.
//!
//! [`Config`] is the generic string-keyed parameter table a worker process is
//! started with. [`SessionConfig`] is the typed, immutable snapshot resolved
//! from it once, before any worker thread starts, and then shared by `Arc`
//! with every [`ThreadSession`](crate::session::ThreadSession). Worker threads
//! never write configuration.
//!
//! ```text
//!   Config { "page_size" => "4096", ... }
//!        │  SessionConfig::from_config (once, main thread)
//!        ▼
//!   Arc<SessionConfig { page_size: 4096 }> ──► worker 0, worker 1, ...
//! ```

use std::env;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::error::ConfigError;

/// Parameter naming the number of elements per page.
pub const PAGE_SIZE_KEY: &str = "page_size";

/// String-keyed configuration lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    params: FxHashMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(key, value)` pairs; later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.set_param(key, value);
        }
        config
    }

    /// Collects environment variables starting with `prefix`.
    ///
    /// `PAGEKIT_PAGE_SIZE=4096` with prefix `PAGEKIT_` becomes `page_size`.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, env::vars())
    }

    fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self::from_pairs(vars.into_iter().filter_map(|(key, value)| {
            key.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest.to_ascii_lowercase(), value))
        }))
    }

    /// Sets `key`, returning the previous value.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses `key` as `T`.
    ///
    /// A missing key and an unparsable value are both reported; nothing is
    /// defaulted silently.
    pub fn parse_param<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get_param(key).ok_or_else(|| ConfigError::missing(key))?;
        raw.trim()
            .parse()
            .map_err(|err| ConfigError::invalid(key, raw, err))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Immutable per-process snapshot consumed by worker sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    page_size: usize,
}

impl SessionConfig {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    /// Resolves [`PAGE_SIZE_KEY`] from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            page_size: config.parse_param(PAGE_SIZE_KEY)?,
        })
    }

    /// Element-count bound used to chunk a dataset into pages.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_param_returns_set_value() {
        let mut config = Config::new();
        assert_eq!(config.set_param("page_size", "64"), None);
        assert_eq!(config.set_param("page_size", "128"), Some("64".to_string()));
        assert_eq!(config.get_param("page_size"), Some("128"));
        assert_eq!(config.get_param("other"), None);
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn session_config_parses_page_size() {
        let config = Config::from_pairs([("page_size", " 4096 ")]);
        let session = SessionConfig::from_config(&config).unwrap();
        assert_eq!(session.page_size(), 4096);
    }

    #[test]
    fn missing_page_size_is_reported() {
        let err = SessionConfig::from_config(&Config::new()).unwrap_err();
        assert_eq!(err, ConfigError::missing(PAGE_SIZE_KEY));
    }

    #[test]
    fn unparsable_page_size_is_reported_not_zeroed() {
        for bad in ["abc", "-1", "", "12kb"] {
            let config = Config::from_pairs([("page_size", bad)]);
            match SessionConfig::from_config(&config) {
                Err(ConfigError::InvalidParam { key, value, .. }) => {
                    assert_eq!(key, PAGE_SIZE_KEY);
                    assert_eq!(value, bad);
                },
                other => panic!("expected InvalidParam for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_vars_strips_prefix_and_lowercases() {
        let vars = vec![
            ("PAGEKIT_PAGE_SIZE".to_string(), "32".to_string()),
            ("PAGEKIT_".to_string(), "ignored".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ];
        let config = Config::from_vars("PAGEKIT_", vars);
        assert_eq!(config.len(), 1);
        assert_eq!(config.parse_param::<usize>("page_size").unwrap(), 32);
    }
}
