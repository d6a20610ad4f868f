//! Comment recognition
//!
//! Three comment styles are understood anywhere a comment may appear:
//! `# ...` and `// ...` run to the end of the line (the newline itself is
//! not part of the comment), `/* ... */` may span lines.

use crate::error::{Construct, Error, Result};

/// Length in bytes of the comment starting at `offset`, or 0 if there is none
///
/// Fails only for a `/*` comment with no closing `*/` before end of input.
pub fn comment_len(text: &str, offset: usize) -> Result<usize> {
    let rest = match text.get(offset..) {
        Some(rest) => rest,
        None => return Ok(0),
    };

    if rest.starts_with('#') || rest.starts_with("//") {
        return Ok(rest.find('\n').unwrap_or(rest.len()));
    }

    if rest.starts_with("/*") {
        return match rest[2..].find("*/") {
            Some(end) => Ok(end + 4),
            None => Err(Error::unterminated(Construct::Comment, text, offset)),
        };
    }

    Ok(0)
}
