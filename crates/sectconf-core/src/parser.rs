//! Configuration file parser
//!
//! A single forward pass over the text drives an explicit state machine. Each
//! state has one handler that inspects the byte under the cursor, consumes
//! what it recognizes and returns the next state. The only backwards movement
//! is in multi-line blocks, where a candidate terminator that turns out to be
//! followed by other text is re-read as content.
//!
//! ```text
//! # comment            // comment            /* comment */
//! [section]
//! plain = value        ; several = 1; per = 2
//! quoted: "text with \" escapes"
//! block = <<<END
//! any text
//! END
//! ```

use indexmap::IndexMap;

use crate::coerce;
use crate::comment::comment_len;
use crate::document::{Document, GLOBAL_SECTION};
use crate::error::{Construct, Error, Result, SourceLocation};
use crate::scanner::{
    is_letter, is_name_char, is_section_char, is_unquoted_stop, normalize_newlines,
    Cursor,
};
use crate::value::Value;

/// Parse configuration text into a [`Document`]
///
/// CRLF and lone CR line endings are converted to LF first; offsets in
/// errors refer to the converted text.
pub fn parse(text: &str) -> Result<Document> {
    let text = normalize_newlines(text);
    let document = Parser::new(&text)
        .run()
        .map_err(|e| match e.offset {
            Some(offset) => e.with_location(SourceLocation::from_offset(&text, offset)),
            None => e,
        })?;
    log::debug!("Parsed configuration with {} options", document.len());
    Ok(document)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between options: blank lines, comments, section headers
    TopLevel,
    /// Inside `[...]`
    SectionName,
    /// Reading an option name
    OptionName,
    /// Blanks after an option name; only a separator or comment may follow
    AfterOptionName,
    /// After `:` or `=`, deciding what kind of value follows
    BeforeValue,
    /// Unquoted value text
    Unquoted,
    /// Blanks after an unquoted value
    AfterUnquoted,
    /// Inside `"..."`
    Quoted,
    /// After the closing quote
    AfterQuoted,
    /// Run of `<` that opens a multi-line block
    BlockOpen,
    /// Terminator name after the `<` run
    BlockTerminator,
    /// Blanks between the terminator name and the newline
    AfterBlockTerminator,
    /// Searching for the next candidate terminator
    BlockBody,
    /// Checking what follows a candidate terminator
    AfterBlockClose,
    /// Store the collected option, typing unquoted values when `coerce` is set
    Store { coerce: bool },
    Done,
}

struct Parser<'a> {
    cur: Cursor<'a>,
    section: String,
    option: String,
    value: String,
    terminator: String,
    /// Start of the construct being read, reported if input ends inside it
    start: usize,
    /// Position of the candidate terminator (its leading newline, if any)
    candidate: usize,
    entries: IndexMap<String, Value>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            cur: Cursor::new(text),
            section: String::new(),
            option: String::new(),
            value: String::new(),
            terminator: String::new(),
            start: 0,
            candidate: 0,
            entries: IndexMap::new(),
        }
    }

    fn run(mut self) -> Result<Document> {
        let mut state = State::TopLevel;
        loop {
            state = match state {
                State::TopLevel => self.top_level()?,
                State::SectionName => self.section_name()?,
                State::OptionName => self.option_name()?,
                State::AfterOptionName => self.after_option_name()?,
                State::BeforeValue => self.before_value()?,
                State::Unquoted => self.unquoted()?,
                State::AfterUnquoted => self.after_unquoted()?,
                State::Quoted => self.quoted()?,
                State::AfterQuoted => self.after_quoted()?,
                State::BlockOpen => self.block_open()?,
                State::BlockTerminator => self.block_terminator()?,
                State::AfterBlockTerminator => self.after_block_terminator()?,
                State::BlockBody => self.block_body()?,
                State::AfterBlockClose => self.after_block_close()?,
                State::Store { coerce } => self.store(coerce),
                State::Done => break,
            };
        }
        Ok(Document::from_entries(self.entries))
    }

    fn invalid(&self) -> Error {
        Error::invalid_character(self.cur.text(), self.cur.pos())
    }

    fn unterminated(&self, construct: Construct) -> Error {
        Error::unterminated(construct, self.cur.text(), self.start)
    }

    /// Skip a comment at the cursor; false if there is none
    fn skip_comment(&mut self) -> Result<bool> {
        let len = comment_len(self.cur.text(), self.cur.pos())?;
        self.cur.advance(len);
        Ok(len > 0)
    }

    /// Skip a comment at the cursor, which must be there
    fn expect_comment(&mut self) -> Result<()> {
        if self.skip_comment()? {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn top_level(&mut self) -> Result<State> {
        match self.cur.peek() {
            None => Ok(State::Done),
            Some(b' ' | b'\t' | b'\n') => {
                self.cur.take_while(|b| matches!(b, b' ' | b'\t' | b'\n'));
                Ok(State::TopLevel)
            }
            Some(b'[') => {
                self.start = self.cur.pos();
                self.cur.advance(1);
                self.section.clear();
                Ok(State::SectionName)
            }
            Some(b'#' | b'/') => {
                self.expect_comment()?;
                Ok(State::TopLevel)
            }
            Some(b';') => {
                self.cur.advance(1);
                Ok(State::TopLevel)
            }
            Some(b) if is_letter(b) => {
                self.start = self.cur.pos();
                self.option.clear();
                self.value.clear();
                Ok(State::OptionName)
            }
            Some(_) => Err(self.invalid()),
        }
    }

    fn section_name(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b']') => {
                self.cur.advance(1);
                Ok(State::TopLevel)
            }
            None => Err(self.unterminated(Construct::SectionHeader)),
            Some(_) => {
                let run = self.cur.take_while(is_section_char);
                if run.is_empty() {
                    return Err(self.invalid());
                }
                self.section.push_str(run);
                Ok(State::SectionName)
            }
        }
    }

    fn option_name(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b':' | b'=') => {
                self.cur.advance(1);
                Ok(State::BeforeValue)
            }
            Some(b' ' | b'\t') => Ok(State::AfterOptionName),
            Some(b'#' | b'/') => {
                self.expect_comment()?;
                Ok(State::OptionName)
            }
            Some(b'\n') => Err(self.invalid()),
            None => Err(self.unterminated(Construct::OptionName)),
            Some(_) => {
                let run = self.cur.take_while(is_name_char);
                if run.is_empty() {
                    return Err(self.invalid());
                }
                self.option.push_str(run);
                Ok(State::OptionName)
            }
        }
    }

    fn after_option_name(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b':' | b'=') => {
                self.cur.advance(1);
                Ok(State::BeforeValue)
            }
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                Ok(State::AfterOptionName)
            }
            Some(b'#' | b'/') => {
                self.expect_comment()?;
                Ok(State::AfterOptionName)
            }
            None => Err(self.unterminated(Construct::OptionName)),
            Some(_) => Err(self.invalid()),
        }
    }

    fn before_value(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                Ok(State::BeforeValue)
            }
            Some(b';' | b'\n') => {
                self.cur.advance(1);
                Ok(State::Store { coerce: true })
            }
            None => Ok(State::Store { coerce: true }),
            Some(b'"') => {
                self.start = self.cur.pos();
                self.cur.advance(1);
                Ok(State::Quoted)
            }
            Some(b'<') => {
                self.start = self.cur.pos();
                self.cur.advance(1);
                Ok(State::BlockOpen)
            }
            Some(b'#' | b'/') => {
                if self.skip_comment()? {
                    Ok(State::BeforeValue)
                } else {
                    Ok(State::Unquoted)
                }
            }
            Some(_) => Ok(State::Unquoted),
        }
    }

    fn unquoted(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b';' | b'\n') => {
                self.cur.advance(1);
                Ok(State::Store { coerce: true })
            }
            None => Ok(State::Store { coerce: true }),
            Some(b' ' | b'\t') => {
                self.cur.advance(1);
                Ok(State::AfterUnquoted)
            }
            Some(b @ (b'#' | b'/')) => {
                if !self.skip_comment()? {
                    // a slash that opens no comment is part of the value
                    self.value.push(b as char);
                    self.cur.advance(1);
                }
                Ok(State::Unquoted)
            }
            Some(_) => {
                let run = self.cur.take_until(is_unquoted_stop);
                self.value.push_str(run);
                Ok(State::Unquoted)
            }
        }
    }

    fn after_unquoted(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                Ok(State::AfterUnquoted)
            }
            Some(b';' | b'\n') => {
                self.cur.advance(1);
                Ok(State::Store { coerce: true })
            }
            None => Ok(State::Store { coerce: true }),
            Some(b'#' | b'/') => {
                self.expect_comment()?;
                Ok(State::AfterUnquoted)
            }
            Some(_) => Err(self.invalid()),
        }
    }

    fn quoted(&mut self) -> Result<State> {
        match self.cur.peek() {
            None => Err(self.unterminated(Construct::QuotedString)),
            Some(b'\\') => {
                self.cur.advance(1);
                // the escaped character is kept as is, whatever it is
                match self.cur.bump_char() {
                    Some(c) => self.value.push(c),
                    None => return Err(self.unterminated(Construct::QuotedString)),
                }
                Ok(State::Quoted)
            }
            Some(b'"') => {
                self.cur.advance(1);
                Ok(State::AfterQuoted)
            }
            Some(_) => {
                let run = self.cur.take_until(|b| b == b'\\' || b == b'"');
                self.value.push_str(run);
                Ok(State::Quoted)
            }
        }
    }

    fn after_quoted(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                Ok(State::AfterQuoted)
            }
            Some(b';' | b'\n') => {
                self.cur.advance(1);
                Ok(State::Store { coerce: false })
            }
            None => Ok(State::Store { coerce: false }),
            Some(b'#' | b'/') => {
                self.expect_comment()?;
                Ok(State::AfterQuoted)
            }
            Some(_) => Err(self.invalid()),
        }
    }

    fn block_open(&mut self) -> Result<State> {
        match self.cur.peek() {
            // <END, <<<END and <<<<<<END are all the same opener
            Some(b'<') => {
                self.cur.advance(1);
                Ok(State::BlockOpen)
            }
            Some(b' ' | b'\t' | b'\n') => Err(self.invalid()),
            None => Err(self.unterminated(Construct::MultilineBlock)),
            Some(_) => {
                self.terminator.clear();
                Ok(State::BlockTerminator)
            }
        }
    }

    fn block_terminator(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b' ' | b'\t') => Ok(State::AfterBlockTerminator),
            Some(b'\n') => {
                self.cur.advance(1);
                Ok(State::BlockBody)
            }
            None => Err(self.unterminated(Construct::MultilineBlock)),
            Some(_) => {
                let run = self.cur.take_while(is_section_char);
                if run.is_empty() {
                    return Err(self.invalid());
                }
                self.terminator.push_str(run);
                Ok(State::BlockTerminator)
            }
        }
    }

    fn after_block_terminator(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                Ok(State::AfterBlockTerminator)
            }
            Some(b'\n') => {
                self.cur.advance(1);
                Ok(State::BlockBody)
            }
            None => Err(self.unterminated(Construct::MultilineBlock)),
            Some(_) => Err(self.invalid()),
        }
    }

    fn block_body(&mut self) -> Result<State> {
        let pos = self.cur.pos();
        let needle = format!("\n{}", self.terminator);

        // Searching from one byte back lets the newline that ended the opener
        // line count, so a terminator on the first body line closes an empty
        // block.
        let found = match self.cur.find_from(pos.saturating_sub(1), &needle) {
            Some(found) => found,
            None => return Err(self.unterminated(Construct::MultilineBlock)),
        };

        if found > pos {
            self.value.push_str(&self.cur.text()[pos..found]);
            self.cur.seek(found);
        }

        self.candidate = self.cur.pos();
        if self.cur.peek() == Some(b'\n') {
            self.cur.advance(1);
        }
        self.cur.advance(self.terminator.len());
        Ok(State::AfterBlockClose)
    }

    fn after_block_close(&mut self) -> Result<State> {
        match self.cur.peek() {
            Some(b';' | b'\n') => {
                self.cur.advance(1);
                return Ok(State::Store { coerce: false });
            }
            None => return Ok(State::Store { coerce: false }),
            Some(b' ' | b'\t') => {
                self.cur.skip_blanks();
                return Ok(State::AfterBlockClose);
            }
            Some(b'#' | b'/') => {
                if self.skip_comment()? {
                    return Ok(State::AfterBlockClose);
                }
            }
            Some(_) => {}
        }

        // Text follows the candidate, so it was part of the body
        log::trace!(
            "False terminator '{}' at offset {}",
            self.terminator,
            self.candidate
        );
        self.cur.seek(self.candidate);
        if self.cur.peek() == Some(b'\n') {
            self.value.push('\n');
            self.cur.advance(1);
        }
        self.value.push_str(&self.terminator);
        self.cur.advance(self.terminator.len());
        Ok(State::BlockBody)
    }

    fn store(&mut self, coerce: bool) -> State {
        let raw = std::mem::take(&mut self.value);
        let value = if coerce {
            coerce::coerce(&raw)
        } else {
            Value::String(raw)
        };

        let section = if self.section.is_empty() || self.section == GLOBAL_SECTION {
            GLOBAL_SECTION
        } else {
            self.section.as_str()
        };
        let key = format!("{}.{}", section, self.option);

        log::trace!("{} = {:?}", key, value);
        self.entries.insert(key, value);
        State::TopLevel
    }
}
