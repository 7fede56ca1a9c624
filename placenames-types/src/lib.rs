//! Core types and errors for the place-name autosuggest index.
//!
//! This crate holds the types shared between the index core and the HTTP
//! server. Keeping them separate means:
//!
//! - **Small handles**: entries are referenced by a 32-bit [`EntryId`]
//! - **Shared errors**: the loader, query engine and server agree on one
//!   set of error types
//! - **Clean boundaries**: the server never reaches into index internals

#![warn(missing_docs)]

use core::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stable handle to an entry stored in the index arena.
///
/// Handles are assigned in insertion order, starting at zero. A handle is
/// only meaningful for the index that issued it.
pub type EntryId = u32;

/// A ranked suggestion returned to callers.
///
/// `name` carries display casing, which may differ from the stored name in
/// its leading code points (see the query engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Display name.
    pub name: String,
    /// Relevancy score in `[0.0, 1.0]`.
    pub relevancy: f64,
}

impl Suggestion {
    /// Creates a new suggestion.
    pub fn new(name: impl Into<String>, relevancy: f64) -> Self {
        Self {
            name: name.into(),
            relevancy,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.name, self.relevancy)
    }
}

/// Index and query configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestConfig {
    /// Number of entries retained per trie node (K).
    /// Also the largest limit a query may request.
    pub capacity_per_node: usize,
    /// Limit used when a caller does not ask for one.
    pub default_limit: usize,
    /// Maximum name length in bytes.
    pub max_name_length: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            capacity_per_node: 100,
            default_limit: 10,
            max_name_length: u16::MAX as usize,
        }
    }
}

impl SuggestConfig {
    /// Creates a configuration retaining `capacity_per_node` entries per node.
    pub fn with_capacity(capacity_per_node: usize) -> Self {
        Self {
            capacity_per_node,
            ..Self::default()
        }
    }

    /// The default limit, never larger than the per-node capacity.
    pub fn effective_default_limit(&self) -> usize {
        self.default_limit.min(self.capacity_per_node)
    }

    /// Checks that the configuration can serve queries.
    ///
    /// A zero capacity retains nothing and a zero default limit would turn
    /// every request without `max_results` into a validation error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_per_node == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.default_limit == 0 {
            return Err(ConfigError::ZeroDefaultLimit);
        }
        if self.max_name_length == 0 {
            return Err(ConfigError::ZeroNameLength);
        }
        Ok(())
    }
}

/// Errors from [`SuggestConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The per-node capacity is zero.
    #[error("top-k capacity must be at least 1")]
    ZeroCapacity,
    /// The default limit is zero.
    #[error("default limit must be at least 1")]
    ZeroDefaultLimit,
    /// The maximum name length is zero.
    #[error("maximum name length must be at least 1 byte")]
    ZeroNameLength,
}

/// Errors that abort an index build.
///
/// There is no partial index: the first malformed record fails the whole
/// build. Line numbers are 1-based and count the header row.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The data file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Reading or decompressing the input failed.
    #[error("failed to read input on line {line}: {source}")]
    Read {
        /// Line being read when the error occurred.
        line: u64,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The CSV layer rejected a record (for example an unclosed quote).
    #[error("failed to read CSV record on line {line}: {reason}")]
    Csv {
        /// Offending line.
        line: u64,
        /// Parser message.
        reason: String,
    },
    /// A record had fewer than the two required fields.
    #[error("invalid record on line {line}: expected at least 2 fields, got {found}")]
    MissingField {
        /// Offending line.
        line: u64,
        /// Number of fields present.
        found: usize,
    },
    /// The relevancy field is not a number.
    #[error("invalid relevancy value on line {line}: {value:?}")]
    InvalidRelevancy {
        /// Offending line.
        line: u64,
        /// Raw field text.
        value: String,
    },
    /// The relevancy is not finite, or (for data files) outside `[0, 1]`.
    #[error("relevancy on line {line} must be a finite number within [0, 1], got {value}")]
    RelevancyOutOfRange {
        /// Offending line.
        line: u64,
        /// Parsed value.
        value: f64,
    },
    /// The name field is empty.
    #[error("empty name on line {line}")]
    EmptyName {
        /// Offending line.
        line: u64,
    },
    /// The name exceeds the configured maximum length.
    #[error("name on line {line} is {len} bytes (max: {max} bytes)")]
    NameTooLong {
        /// Offending line.
        line: u64,
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },
    /// More entries than [`EntryId`] can address.
    #[error("too many entries: the index holds at most {max}")]
    TooManyEntries {
        /// Maximum number of entries.
        max: usize,
    },
}

/// Errors raised while validating a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The requested limit is outside `[1, max]`.
    #[error("limit must be a positive integer less than or equal to {max}, got {requested}")]
    LimitOutOfRange {
        /// Requested limit.
        requested: i64,
        /// Largest allowed limit.
        max: usize,
    },
    /// The limit text is not an integer.
    #[error("limit must be a positive integer less than or equal to {max}, got {raw:?}")]
    InvalidLimit {
        /// Raw limit text.
        raw: String,
        /// Largest allowed limit.
        max: usize,
    },
}

impl ValidationError {
    /// Largest limit the caller may request.
    pub fn max(&self) -> usize {
        match self {
            ValidationError::LimitOutOfRange { max, .. } => *max,
            ValidationError::InvalidLimit { max, .. } => *max,
        }
    }
}

/// Errors from the ordered scoring pool.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// The scorer failed for one name.
    #[error("failed to determine score for {name} ({index}): {reason}")]
    Scorer {
        /// Input position of the name.
        index: usize,
        /// The name being scored.
        name: String,
        /// Scorer message.
        reason: String,
    },
    /// The scorer returned something that is not a number.
    #[error("scorer returned a non-finite value for {name}")]
    NotFinite {
        /// The name being scored.
        name: String,
    },
    /// The pool was asked to run without workers.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// A worker exited without reporting a result.
    #[error("worker pool lost the result for input {index}")]
    Lost {
        /// Input position with no result.
        index: usize,
    },
    /// Writing the score table failed.
    #[error("failed to write scores: {0}")]
    Write(String),
}
