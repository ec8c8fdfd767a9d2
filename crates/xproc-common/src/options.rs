//! Round-scoped processing options.
//!
//! Drivers hand every round a flat set of string key/value pairs. The core
//! treats them as opaque; the typed readers below only save callers from
//! re-implementing the same parsing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionParseError {
    #[error("expected `key=value`, found `{0}`")]
    MissingSeparator(String),
    #[error("option key must not be empty in `{0}`")]
    EmptyKey(String),
}

/// Insertion-ordered string options for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingOptions {
    values: IndexMap<String, String>,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// `true` for `true`/`1`/`yes`/`on` (case-insensitive), `default` if unset
    /// or unrecognised.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::to_ascii_lowercase).as_deref() {
            Some("true" | "1" | "yes" | "on") => true,
            Some("false" | "0" | "no" | "off") => false,
            _ => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Later entries override earlier ones with the same key.
    pub fn merge(&mut self, other: &ProcessingOptions) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProcessingOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a single `key=value` assignment. The value may itself contain `=`.
pub fn parse_assignment(text: &str) -> Result<(String, String), OptionParseError> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| OptionParseError::MissingSeparator(text.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(OptionParseError::EmptyKey(text.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
