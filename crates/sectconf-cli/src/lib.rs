//! sectconf CLI library
//!
//! This module exposes the CLI entry point so the binary stays a thin
//! wrapper.

mod cli;

pub use cli::run;
