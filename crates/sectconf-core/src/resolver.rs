//! Section-aware key lookup
//!
//! A bare option name is resolved against an ordered [`SearchPath`] of
//! section prefixes. Each prefix is prepended to the key and probed in the
//! document; the first hit wins. The empty prefix probes the key verbatim,
//! which is what makes qualified lookups like `"mysql.user"` work.

use crate::document::{Document, GLOBAL_SECTION};
use crate::value::Value;

/// Ordered list of section prefixes probed during lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    prefixes: Vec<String>,
}

impl SearchPath {
    /// Use `prefixes` exactly as given, e.g. `["db.", "global.", ""]`
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Search the named sections in order, then `global`, then qualified keys
    pub fn from_sections<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes: Vec<String> = sections
            .into_iter()
            .map(|s| format!("{}.", s.as_ref()))
            .collect();
        prefixes.push(format!("{}.", GLOBAL_SECTION));
        prefixes.push(String::new());
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Iterate over the composite keys probed for `key`, in order
    pub fn candidates<'a>(&'a self, key: &'a str) -> impl Iterator<Item = String> + 'a {
        self.prefixes
            .iter()
            .map(move |prefix| format!("{}{}", prefix, key))
    }
}

impl Default for SearchPath {
    /// `global` first, then qualified keys
    fn default() -> Self {
        Self::from_sections(std::iter::empty::<&str>())
    }
}

/// First non-null value found for `key` along `search_path`
///
/// An option explicitly set to `null` does not count as set, so the search
/// moves on to the next section.
pub fn lookup<'d>(document: &'d Document, search_path: &SearchPath, key: &str) -> Option<&'d Value> {
    for candidate in search_path.candidates(key) {
        match document.get(&candidate) {
            Some(Value::Null) => log::trace!("Skipping null '{}'", candidate),
            Some(value) => {
                log::trace!("Resolved '{}' as '{}'", key, candidate);
                return Some(value);
            }
            None => {}
        }
    }
    None
}

/// Value for `key` along `search_path`, or `default` if no section defines it
pub fn resolve(document: &Document, search_path: &SearchPath, key: &str, default: Value) -> Value {
    lookup(document, search_path, key)
        .cloned()
        .unwrap_or(default)
}

/// Check whether any section along `search_path` sets `key` to a non-null value
pub fn is_defined(document: &Document, search_path: &SearchPath, key: &str) -> bool {
    lookup(document, search_path, key).is_some()
}
