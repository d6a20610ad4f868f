//! Main Config type for sectconf
//!
//! A [`Config`] couples a parsed [`Document`] with the [`SearchPath`] used to
//! resolve bare option names, and offers typed accessors on top of
//! [`resolver::resolve`] and [`resolver::is_defined`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::locate;
use crate::resolver::{self, SearchPath};
use crate::value::Value;

/// Configuration options for loading configs
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Sections to search; derived from the directory layout when unset
    pub search_path: Option<SearchPath>,
    /// Where the upward file search starts; the working directory when unset
    pub start_dir: Option<PathBuf>,
}

impl ConfigOptions {
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = Some(search_path);
        self
    }

    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }
}

/// A parsed configuration file with its lookup order
#[derive(Debug, Clone)]
pub struct Config {
    document: Arc<Document>,
    search_path: SearchPath,
    source: Option<PathBuf>,
}

impl Config {
    /// Create a Config from an already parsed document
    pub fn new(document: Document, search_path: SearchPath) -> Self {
        Self {
            document: Arc::new(document),
            search_path,
            source: None,
        }
    }

    /// Parse configuration text, resolving keys in `global` and as qualified names
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_search_path(text, SearchPath::default())
    }

    /// Parse configuration text with an explicit search path
    pub fn parse_with_search_path(text: &str, search_path: SearchPath) -> Result<Self> {
        Ok(Self::new(Document::parse(text)?, search_path))
    }

    /// Locate, read and parse a configuration file
    ///
    /// A relative `name` is searched for from `options.start_dir` upwards.
    /// Unless `options.search_path` is set, the sections to search are the
    /// directories from the file's location down to the start directory.
    pub fn load(name: impl AsRef<Path>, options: &ConfigOptions) -> Result<Self> {
        let name = name.as_ref();
        let start_dir = match &options.start_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| Error::io(name, &e))?,
        };

        let path = locate::locate_file(name, &start_dir).ok_or_else(|| Error::not_found(name))?;
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, &e))?;
        let document = Document::parse(&content).map_err(|e| e.with_path(&path))?;

        let search_path = match &options.search_path {
            Some(search_path) => search_path.clone(),
            None => locate::search_path_for(&path, &start_dir),
        };
        log::debug!(
            "Loaded {} with search path {:?}",
            path.display(),
            search_path.prefixes()
        );

        Ok(Self {
            document: Arc::new(document),
            search_path,
            source: Some(path),
        })
    }

    /// Value of `key` from the first section along the search path that defines it
    pub fn get(&self, key: &str) -> Option<&Value> {
        resolver::lookup(&self.document, &self.search_path, key)
    }

    /// Value of `key`, or `default` if it is not defined
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        resolver::resolve(&self.document, &self.search_path, key, default.into())
    }

    /// Check if `key` is defined in any section along the search path
    pub fn is_defined(&self, key: &str) -> bool {
        resolver::is_defined(&self.document, &self.search_path, key)
    }

    /// String value of `key`; None if missing or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Float value of `key`; integers are widened
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// File the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Same document with a different search path
    pub fn with_search_path(&self, search_path: SearchPath) -> Self {
        Self {
            document: Arc::clone(&self.document),
            search_path,
            source: self.source.clone(),
        }
    }
}
