//! sectconf-core: INI-style configuration files with section-aware lookup
//!
//! This crate parses configuration text made of `[section]` headers and
//! `name = value` options into a flat [`Document`], and resolves bare option
//! names through an ordered list of sections.
//!
//! # Example
//!
//! ```rust
//! use sectconf_core::{Config, SearchPath, Value};
//!
//! let text = r#"
//! ## database settings
//! [global]
//! port = 5432
//!
//! [staging]
//! host = "db.staging"
//! motd = <<<END
//! Maintenance at 02:00
//! END
//! "#;
//!
//! let config = Config::parse_with_search_path(text, SearchPath::from_sections(["staging"])).unwrap();
//! assert_eq!(config.get_str("host"), Some("db.staging"));
//! assert_eq!(config.get("port"), Some(&Value::Integer(5432)));
//! assert_eq!(config.get_str("motd"), Some("Maintenance at 02:00"));
//! ```

pub mod cache;
pub mod coerce;
pub mod comment;
pub mod document;
pub mod error;
pub mod locate;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod value;

mod config;

pub use cache::ConfigCache;
pub use config::{Config, ConfigOptions};
pub use document::Document;
pub use error::{Construct, Error, ErrorKind, Result};
pub use parser::parse;
pub use resolver::{is_defined, lookup, resolve, SearchPath};
pub use value::Value;
