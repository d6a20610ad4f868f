//! Error types for sectconf
//!
//! Parsing is all-or-nothing: any of these errors aborts the parse and no
//! partial document is returned. Errors carry the byte offset into the
//! LF-normalized text, a short excerpt of the input at that offset and,
//! when known, the file the text came from.

use std::fmt;
use std::path::{Path, PathBuf};

/// Result type alias for sectconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Number of characters of input quoted in a parse error
pub const EXCERPT_CHARS: usize = 15;

/// Main error type for sectconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Byte offset into the normalized input
    pub offset: Option<usize>,
    /// Up to [`EXCERPT_CHARS`] characters of input starting at `offset`
    pub excerpt: Option<String>,
    /// Line and column of `offset`
    pub location: Option<SourceLocation>,
    /// File being read when the error occurred
    pub path: Option<PathBuf>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// 1-based position in the parsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Compute the line and column of a byte offset in `text`
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(0);
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
        Self { line, column }
    }
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// End of input reached inside a construct
    #[error("Unexpected end of input in {0}")]
    UnterminatedConstruct(Construct),
    /// A character that is not legal in the current parser state
    #[error("Invalid character")]
    InvalidCharacter,
    /// I/O error while reading a configuration file
    #[error("I/O error")]
    Io,
    /// Configuration file could not be located
    #[error("Configuration file not found")]
    NotFound,
}

/// Syntactic constructs that can be left open at end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Construct {
    #[error("section header")]
    SectionHeader,
    #[error("option name")]
    OptionName,
    #[error("quoted string")]
    QuotedString,
    #[error("comment")]
    Comment,
    #[error("multi-line block")]
    MultilineBlock,
}

impl Error {
    fn bare(kind: ErrorKind) -> Self {
        Self {
            kind,
            offset: None,
            excerpt: None,
            location: None,
            path: None,
            help: None,
            cause: None,
        }
    }

    /// Create an unterminated construct error for a construct opened at `offset`
    pub fn unterminated(construct: Construct, text: &str, offset: usize) -> Self {
        let help = match construct {
            Construct::SectionHeader => "Close the section header with ']'",
            Construct::OptionName => "Follow the option name with ':' or '='",
            Construct::QuotedString => "Close the string with '\"'",
            Construct::Comment => "Close the comment with '*/'",
            Construct::MultilineBlock => {
                "End the block with its terminator at the start of a line"
            }
        };
        Self::at_offset(ErrorKind::UnterminatedConstruct(construct), text, offset).with_help(help)
    }

    /// Create an invalid character error at `offset`
    pub fn invalid_character(text: &str, offset: usize) -> Self {
        Self::at_offset(ErrorKind::InvalidCharacter, text, offset)
    }

    fn at_offset(kind: ErrorKind, text: &str, offset: usize) -> Self {
        Self {
            offset: Some(offset),
            excerpt: Some(excerpt(text, offset)),
            ..Self::bare(kind)
        }
    }

    /// Create an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self {
            path: Some(path.into()),
            cause: Some(err.to_string()),
            ..Self::bare(ErrorKind::Io)
        }
    }

    /// Create a file not found error
    pub fn not_found(name: impl Into<PathBuf>) -> Self {
        let name: PathBuf = name.into();
        Self::bare(ErrorKind::NotFound)
            .with_path(name)
            .with_help("Place the file in the start directory or one of its ancestors, or pass an absolute path")
    }

    /// Add file path context to the error
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add source location to the error
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True if parsing stopped because the input ended early
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnterminatedConstruct(_))
    }
}

/// Up to [`EXCERPT_CHARS`] characters starting at `offset`
fn excerpt(text: &str, offset: usize) -> String {
    let mut start = offset.min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    text[start..].chars().take(EXCERPT_CHARS).collect()
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(offset) = self.offset {
            write!(f, " at offset {}", offset)?;
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path.display())?;
            if let Some(loc) = &self.location {
                write!(f, ":{}:{}", loc.line, loc.column)?;
            }
        } else if let Some(loc) = &self.location {
            write!(f, "\n  Line: {}, column {}", loc.line, loc.column)?;
        }

        if let Some(excerpt) = &self.excerpt {
            write!(f, "\n  Near: {:?}", excerpt)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unterminated_error_display() {
        let err = Error::unterminated(Construct::QuotedString, "a = \"open", 4);
        let display = format!("{}", err);

        assert!(display.contains("Unexpected end of input in quoted string"));
        assert!(display.contains("at offset 4"));
        assert!(display.contains("Near: \"\\\"open\""));
        assert!(display.contains("Help:"));
        assert!(err.is_eof());
    }

    #[test]
    fn test_invalid_character_excerpt_is_bounded() {
        let text = "x = 1\n@@@@@@@@@@@@@@@@@@@@@@@@@@";
        let err = Error::invalid_character(text, 6);

        assert_eq!(err.kind, ErrorKind::InvalidCharacter);
        assert_eq!(err.offset, Some(6));
        assert_eq!(err.excerpt.as_deref(), Some("@@@@@@@@@@@@@@@"));
        assert!(!err.is_eof());
    }

    #[test]
    fn test_excerpt_at_end_of_input() {
        let err = Error::invalid_character("abc", 3);
        assert_eq!(err.excerpt.as_deref(), Some(""));
    }

    #[test]
    fn test_excerpt_multibyte() {
        let err = Error::invalid_character("ä@ö", 1);
        assert_eq!(err.excerpt.as_deref(), Some("ä@ö"));
    }

    #[test]
    fn test_source_location_from_offset() {
        let text = "a = 1\nbb = 2\nc";
        assert_eq!(
            SourceLocation::from_offset(text, 0),
            SourceLocation { line: 1, column: 1 }
        );
        assert_eq!(
            SourceLocation::from_offset(text, 9),
            SourceLocation { line: 2, column: 4 }
        );
        assert_eq!(
            SourceLocation::from_offset(text, 13),
            SourceLocation { line: 3, column: 1 }
        );
    }

    #[test]
    fn test_with_path_and_location() {
        let err = Error::invalid_character("x\n@", 2)
            .with_path("/etc/app.conf")
            .with_location(SourceLocation { line: 2, column: 1 });
        let display = format!("{}", err);

        assert!(display.contains("Path: /etc/app.conf:2:1"));
    }

    #[test]
    fn test_with_help() {
        let err = Error::invalid_character("@", 0).with_help("Remove the stray character");
        let display = format!("{}", err);

        assert!(display.contains("Help: Remove the stray character"));
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::not_found("server.conf");
        let display = format!("{}", err);

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(display.contains("Configuration file not found"));
        assert!(display.contains("Path: server.conf"));
        assert!(err.help.as_deref().is_some_and(|h| h.contains("absolute path")));
    }

    #[test]
    fn test_unterminated_help_names_closer() {
        let err = Error::unterminated(Construct::Comment, "/* open", 0);
        assert_eq!(err.help.as_deref(), Some("Close the comment with '*/'"));
        assert_eq!(err.offset, Some(0));
        assert_eq!(err.excerpt.as_deref(), Some("/* open"));
    }

    #[test]
    fn test_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("/root/app.conf", &io);
        let display = format!("{}", err);

        assert_eq!(err.kind, ErrorKind::Io);
        assert!(display.contains("I/O error"));
        assert!(display.contains("denied"));
    }
}
