//! Character classes and cursor movement over the input buffer
//!
//! Every delimiter in the format is ASCII, so the cursor works on bytes and
//! only ever stops on character boundaries: runs are measured up to an ASCII
//! delimiter, and single-character steps advance by the full UTF-8 width.

/// Letters that may start or continue an option name
pub fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// Characters of an option name after the first
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Characters of section names and multi-line terminators
pub fn is_section_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// Space or tab
pub fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

/// Characters that end an unquoted value
pub fn is_unquoted_stop(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'/' | b'#' | b';')
}

/// Convert CRLF and lone CR line endings to LF
pub fn normalize_newlines(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains('\r') {
        return std::borrow::Cow::Borrowed(text);
    }
    std::borrow::Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Read position in a text buffer
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position, which must be a character boundary
    pub fn seek(&mut self, pos: usize) {
        debug_assert!(self.text.is_char_boundary(pos));
        self.pos = pos;
    }

    /// Current byte, or None at end of input
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Current character, or None at end of input
    pub fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Advance by `n` bytes
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Advance past the current character and return it
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Length of the run of bytes matching `pred` at the cursor
    pub fn span(&self, pred: impl Fn(u8) -> bool) -> usize {
        self.text.as_bytes()[self.pos..]
            .iter()
            .take_while(|&&b| pred(b))
            .count()
    }

    /// Consume the run of bytes matching `pred` and return it
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        self.pos += self.span(pred);
        &self.text[start..self.pos]
    }

    /// Consume the run of bytes not matching `pred` and return it
    pub fn take_until(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        self.take_while(|b| !pred(b))
    }

    /// Skip spaces and tabs
    pub fn skip_blanks(&mut self) {
        self.pos += self.span(is_blank);
    }

    /// Position of the next occurrence of `needle` at or after `from`
    pub fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.text.get(from..)?.find(needle).map(|i| from + i)
    }
}
