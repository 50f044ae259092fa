//! Common types shared across the Capitol crates.
//!
//! This crate holds the handful of vocabulary types every other crate needs
//! (the legislative [`Chamber`] and the [`RowFailurePolicy`]) plus the
//! [`observability`] helpers used by binaries and tests. It stays small so
//! config, HTTP and scraping crates can all depend on it.
//!
//! # Examples
//!
//! ```rust
//! use capitol_common::Chamber;
//!
//! let chamber: Chamber = "lower".parse().unwrap();
//! assert_eq!(chamber.label(), "House");
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod observability;

/// Logical chamber key used to request a scrape and to tag participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Upper,
    Lower,
    Other,
}

impl Chamber {
    pub const ALL: [Chamber; 3] = [Chamber::Upper, Chamber::Lower, Chamber::Other];

    /// Display label the weekly calendar prints in its chamber column.
    pub fn label(self) -> &'static str {
        match self {
            Chamber::Upper => "Senate",
            Chamber::Lower => "House",
            Chamber::Other => "Joint",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Chamber::Upper => "upper",
            Chamber::Lower => "lower",
            Chamber::Other => "other",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown chamber `{0}` (expected upper, lower or other)")]
pub struct ParseChamberError(pub String);

impl FromStr for Chamber {
    type Err = ParseChamberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper" => Ok(Chamber::Upper),
            "lower" => Ok(Chamber::Lower),
            "other" | "joint" => Ok(Chamber::Other),
            _ => Err(ParseChamberError(s.to_string())),
        }
    }
}

/// What a scrape does when a single calendar row cannot be turned into an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFailurePolicy {
    /// Abort the whole scrape call on the first failing row.
    #[default]
    FailFast,
    /// Log the failure, count it, and move on to the next row.
    Isolate,
}
