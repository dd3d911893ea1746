//! Error types for pagekit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when configuration is invalid, either a cache
//!   parameter (zero capacity) or a session parameter such as `page_size`
//!   that is missing or cannot be parsed.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use pagekit::config::{Config, SessionConfig};
//! use pagekit::error::ConfigError;
//!
//! let config = Config::from_pairs([("page_size", "lots")]);
//! let err = SessionConfig::from_config(&config).unwrap_err();
//! assert!(matches!(err, ConfigError::InvalidParam { .. }));
//! ```

use thiserror::Error;

/// Error returned when cache or session configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A cache was asked to hold zero entries.
    #[error("capacity must be > 0")]
    ZeroCapacity,

    /// A required parameter is absent from the configuration table.
    #[error("missing configuration parameter `{key}`")]
    MissingParam { key: String },

    /// A parameter is present but its value does not parse.
    #[error("invalid value {value:?} for parameter `{key}`: {reason}")]
    InvalidParam {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingParam`].
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingParam { key: key.into() }
    }

    /// Shorthand for [`ConfigError::InvalidParam`].
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidParam {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the cache types. Carries a
/// human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
