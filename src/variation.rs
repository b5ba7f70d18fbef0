//! Variation set and generation response types.
//!
//! A generation response is an opaque JSON object. The only shape this crate
//! relies on is its string-valued variation entries (id → ABC source);
//! everything else (descriptions, changed-bar lists, session metadata) is
//! passed through untouched for the caller to interpret.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// The currently loaded variations, id → ABC source.
///
/// Populated wholesale from each generation response; the previous set is
/// discarded, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationSet {
    tunes: BTreeMap<String, String>,
}

impl VariationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, abc: impl Into<String>) {
        self.tunes.insert(id.into(), abc.into());
    }

    /// ABC source for a variation, if it is loaded.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.tunes.get(id).map(String::as_str)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tunes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tunes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tunes.is_empty()
    }
}

impl FromIterator<(String, String)> for VariationSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            tunes: iter.into_iter().collect(),
        }
    }
}

/// Keys the service uses for commentary rather than notation.
fn is_metadata_key(key: &str) -> bool {
    key.ends_with("_desc") || key == "error" || key == "message"
}

/// Parsed body of a generation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct GenerationResponse {
    fields: serde_json::Map<String, Value>,
}

impl GenerationResponse {
    /// ABC source for one variation, if the response carries it.
    pub fn variation(&self, id: &str) -> Option<&str> {
        self.fields.get(id).and_then(Value::as_str)
    }

    /// Collect the response's notation entries into a fresh [`VariationSet`].
    ///
    /// Every string-valued field is treated as notation except the service's
    /// commentary keys (`*_desc`, `error`, `message`).
    pub fn variations(&self) -> VariationSet {
        self.fields
            .iter()
            .filter(|(key, _)| !is_metadata_key(key))
            .filter_map(|(key, value)| {
                value.as_str().map(|abc| (key.clone(), abc.to_string()))
            })
            .collect()
    }

    /// Application-level error message, if the service reported one in an
    /// otherwise successful response.
    pub fn service_error(&self) -> Option<&str> {
        self.fields.get("error").and_then(Value::as_str)
    }

    /// The full response object, untouched.
    pub fn raw(&self) -> &serde_json::Map<String, Value> {
        &self.fields
    }
}
