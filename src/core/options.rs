//! String-keyed option maps for content-authored configuration.
//!
//! Skills, buffs and effects carry an option column written as
//! `key=value` pairs joined by `&`. Every consumer reads its keys with an
//! explicit default, so a missing key is never an error.
//!
//! ```
//! use pet_battle::core::OptionMap;
//!
//! let options = OptionMap::parse("who=op&add=50");
//! assert_eq!(options.get_or("who", "me"), "op");
//! assert_eq!(options.get_or("type", "skill"), "skill");
//! ```

use serde::{Deserialize, Serialize};

/// Placeholder written for an empty option column.
pub const EMPTY_OPTIONS: &str = "none";

/// Ordered string → string map.
///
/// Keeps insertion order so an option column written back out matches what
/// was read in. Maps are small, so lookup is linear.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionMap {
    entries: Vec<(String, String)>,
}

impl OptionMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key=value&key=value` option string.
    ///
    /// `none` and the empty string give an empty map. Pairs without `=`
    /// are skipped; a repeated key keeps its last value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::new();
        let raw = raw.trim();
        if raw.is_empty() || raw == EMPTY_OPTIONS {
            return map;
        }

        for pair in raw.split('&') {
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    map.set(key.trim(), value.trim());
                }
                _ => tracing::trace!(pair, "skipping malformed option pair"),
            }
        }
        map
    }

    /// Get a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a value, falling back to `default` when the key is absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render back to the option column format.
    #[must_use]
    pub fn to_option_string(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_OPTIONS.to_string();
        }
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<(String, String)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Parse a `/`-separated integer list such as `1/3/5`.
///
/// Returns `None` if any element fails to parse. Empty input gives an
/// empty list.
#[must_use]
pub fn parse_int_list(raw: &str, separator: char) -> Option<Vec<i32>> {
    if raw.trim().is_empty() {
        return Some(Vec::new());
    }
    raw.split(separator).map(|s| s.trim().parse().ok()).collect()
}

/// Parse a `/`-separated float list such as `30/70`.
#[must_use]
pub fn parse_float_list(raw: &str, separator: char) -> Option<Vec<f64>> {
    if raw.trim().is_empty() {
        return Some(Vec::new());
    }
    raw.split(separator).map(|s| s.trim().parse().ok()).collect()
}

/// Parse a content boolean (`true`/`false`, case-insensitive).
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let map = OptionMap::parse("id=12&turn=3&value=me.atk/2");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("id"), Some("12"));
        assert_eq!(map.get("value"), Some("me.atk/2"));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_parse_none_is_empty() {
        assert!(OptionMap::parse("none").is_empty());
        assert!(OptionMap::parse("").is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let map = OptionMap::parse("a=1&garbage&=2&b=3");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("b"), Some("3"));
    }

    #[test]
    fn test_set_keeps_order() {
        let mut map = OptionMap::parse("a=1&b=2");
        map.set("a", "9");
        map.set("c", "3");
        assert_eq!(map.to_option_string(), "a=9&b=2&c=3");
    }

    #[test]
    fn test_remove() {
        let mut map = OptionMap::parse("a=1&b=2");
        assert_eq!(map.remove("a"), Some("1".to_string()));
        assert_eq!(map.remove("a"), None);
        assert_eq!(map.to_option_string(), "b=2");
    }

    #[test]
    fn test_empty_renders_none() {
        assert_eq!(OptionMap::new().to_option_string(), "none");
    }

    #[test]
    fn test_int_list() {
        assert_eq!(parse_int_list("1/3/5", '/'), Some(vec![1, 3, 5]));
        assert_eq!(parse_int_list("1/x", '/'), None);
        assert_eq!(parse_int_list("", '/'), Some(vec![]));
    }

    #[test]
    fn test_float_list() {
        assert_eq!(parse_float_list("30/70", '/'), Some(vec![30.0, 70.0]));
        assert_eq!(parse_float_list("30/", '/'), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
