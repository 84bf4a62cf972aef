//! PropertySet implementation
//!
//! HashMap-backed key/value set with the file's parse and render rules.

use std::collections::hash_map;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};

/// In-memory contents of one properties file
///
/// Iteration and rendering order is unspecified. Callers must not rely on
/// the order lines come back in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: HashMap<String, String>,
}

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents
    ///
    /// Every line holding at least one `=` is split on the first `=` and both
    /// halves are trimmed. Other lines are skipped; malformed input is never
    /// an error. A repeated key keeps its last value.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        Self { entries }
    }

    /// Render to file contents, one `key=value` line per entry
    pub fn render(&self) -> String {
        let mut contents = String::new();
        for (key, value) in &self.entries {
            contents.push_str(key);
            contents.push('=');
            contents.push_str(value);
            contents.push('\n');
        }
        contents
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a key, replacing any previous value
    ///
    /// Key and value are trimmed the same way [`parse`](Self::parse) trims
    /// them, so the set matches what a reload of the saved file yields.
    /// Returns the previous value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<Option<String>> {
        let key = key.trim();
        let value = value.trim();
        validate_entry(key, value)?;
        Ok(self.entries.insert(key.to_string(), value.to_string()))
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in unspecified order
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.entries
    }
}

/// Reject entries the line format cannot represent
fn validate_entry(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        return Err(GateError::InvalidProperty("key must not be empty".to_string()));
    }
    if key.contains('=') {
        return Err(GateError::InvalidProperty(format!(
            "key {:?} contains '='",
            key
        )));
    }
    if key.contains(&['\r', '\n'][..]) || value.contains(&['\r', '\n'][..]) {
        return Err(GateError::InvalidProperty(format!(
            "line terminator in entry for {:?}",
            key
        )));
    }
    Ok(())
}

impl From<HashMap<String, String>> for PropertySet {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
