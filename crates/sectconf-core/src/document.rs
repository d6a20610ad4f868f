//! Parsed configuration document
//!
//! A [`Document`] is a flat map from composite key (`"<section>.<option>"`)
//! to [`Value`]. Options that appear before any section header, or under
//! `[global]` or `[]`, live in the `global` section. Entries keep the order in
//! which each key was first defined; a later definition of the same key
//! replaces the value in place.

use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::value::Value;

/// Name of the section that holds options outside any named section
pub const GLOBAL_SECTION: &str = "global";

/// Immutable result of parsing a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

impl Document {
    /// Parse configuration text into a document
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::parse(text)
    }

    pub(crate) fn from_entries(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Look up a composite key such as `"mysql.user"`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check whether a composite key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored options
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(composite key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over composite keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Distinct section names in the order they were first seen
    pub fn sections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (section, _) in self.entries.keys().filter_map(|k| split_key(k)) {
            if !seen.contains(&section) {
                seen.push(section);
            }
        }
        seen
    }

    /// Iterate over `(option, value)` pairs of one section
    pub fn section<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.entries.iter().filter_map(move |(k, v)| match split_key(k) {
            Some((section, option)) if section == name => Some((option, v)),
            _ => None,
        })
    }
}

/// Split a composite key at its last `.`; section names may contain dots,
/// option names never do.
fn split_key(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once('.')
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        let mut entries = IndexMap::new();
        entries.insert("global.x".to_string(), Value::Integer(4));
        entries.insert("app-config.x".to_string(), Value::from("25"));
        entries.insert("global.second".to_string(), Value::Integer(2));
        entries.insert("v1.2.port".to_string(), Value::Integer(80));
        Document::from_entries(entries)
    }

    #[test]
    fn test_get_and_contains() {
        let doc = sample();
        assert_eq!(doc.get("global.x"), Some(&Value::Integer(4)));
        assert!(doc.contains_key("app-config.x"));
        assert!(!doc.contains_key("x"));
        assert_eq!(doc.len(), 4);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let doc = sample();
        let keys: Vec<&str> = doc.keys().collect();
        assert_eq!(
            keys,
            vec!["global.x", "app-config.x", "global.second", "v1.2.port"]
        );
    }

    #[test]
    fn test_sections() {
        let doc = sample();
        assert_eq!(doc.sections(), vec!["global", "app-config", "v1.2"]);
    }

    #[test]
    fn test_section_entries() {
        let doc = sample();
        let global: Vec<(&str, &Value)> = doc.section("global").collect();
        assert_eq!(
            global,
            vec![("x", &Value::Integer(4)), ("second", &Value::Integer(2))]
        );
        let dotted: Vec<(&str, &Value)> = doc.section("v1.2").collect();
        assert_eq!(dotted, vec![("port", &Value::Integer(80))]);
        assert_eq!(doc.section("missing").count(), 0);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::default();
        assert!(doc.is_empty());
        assert!(doc.sections().is_empty());
    }

    #[test]
    fn test_from_str() {
        let doc: Document = "x:4\n".parse().unwrap();
        assert_eq!(doc.get("global.x"), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_serialize_as_flat_map() {
        let doc = Document::parse("b = 1\n[s]\nflag = true\nname = \"x\"\nnothing = null\n").unwrap();
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"global.b":1,"s.flag":true,"s.name":"x","s.nothing":null}"#
        );
    }
}
