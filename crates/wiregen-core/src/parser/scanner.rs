//! Character cursor over one comment fragment.
//!
//! Low-level recognizers (trivia, identifiers) are built on `nom`; the
//! cursor tracks a character offset so syntax errors can point at the exact
//! position inside the fragment. The tag scan walks characters directly
//! because a tag may be buried anywhere in surrounding prose.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{multispace1, not_line_ending},
    combinator::{recognize, value},
    multi::many0,
    sequence::{pair, preceded},
};

use crate::error::ParseError;

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Skippable items between tokens: whitespace or `//` line comments.
fn trivia(input: &str) -> IResult<&str, ()> {
    let comment = value((), preceded(tag("//"), not_line_ending));
    let ws = value((), multispace1);
    value((), many0(alt((ws, comment)))).parse(input)
}

/// An identifier: letter/underscore head, letters/digits/underscores after.
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_ident_start),
        take_while(is_ident_continue),
    ))
    .parse(input)
}

/// Cursor over the fragment being parsed.
pub struct Scanner<'a> {
    rest: &'a str,
    offset: usize,
    previous: Option<char>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            offset: 0,
            previous: None,
        }
    }

    /// Character offset of the cursor from the start of the fragment.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Consumes and returns the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        self.offset += 1;
        self.previous = Some(c);
        Some(c)
    }

    /// Moves the cursor to `remaining`, a suffix of the current rest.
    fn advance_to(&mut self, remaining: &'a str) {
        let consumed = &self.rest[..self.rest.len() - remaining.len()];
        self.offset += consumed.chars().count();
        self.previous = consumed.chars().last().or(self.previous);
        self.rest = remaining;
    }

    /// Skips whitespace and `//` line comments.
    pub fn skip_trivia(&mut self) {
        if let Ok((remaining, ())) = trivia(self.rest) {
            self.advance_to(remaining);
        }
    }

    /// Consumes `expected` or fails with a character mismatch.
    pub fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                let _ = self.bump();
                Ok(())
            }
            found => Err(ParseError::CharacterMismatch {
                expected,
                found,
                offset: self.offset,
            }),
        }
    }

    /// Consumes an identifier, or fails naming what was expected.
    pub fn expect_identifier(&mut self, description: &'static str) -> Result<String, ParseError> {
        match identifier(self.rest) {
            Ok((remaining, ident)) => {
                let ident = ident.to_owned();
                self.advance_to(remaining);
                Ok(ident)
            }
            Err(_) => Err(ParseError::IdentifierExpected {
                description,
                offset: self.offset,
            }),
        }
    }

    /// Scans forward until an occurrence of `tag_text` preceded by the start
    /// of input or whitespace, consuming it. Returns `false` when the rest of
    /// the fragment holds no such occurrence.
    ///
    /// The whitespace precondition prevents partial-token matches such as a
    /// `mywiring:` prose word matching the tag `wiring:`.
    pub fn skip_until_tag(&mut self, tag_text: &str) -> bool {
        debug_assert!(!tag_text.is_empty());
        let tag_chars: Vec<char> = tag_text.chars().collect();
        let mut matched = 0;

        while matched < tag_chars.len() {
            let Some(c) = self.peek() else {
                return false;
            };
            if c == tag_chars[matched] {
                if matched > 0 || self.previous.is_none_or(char::is_whitespace) {
                    matched += 1;
                }
            } else {
                matched = 0;
            }
            let _ = self.bump();
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_trivia_consumes_whitespace_and_comments() {
        let mut scanner = Scanner::new("  // note\n\t inject");
        scanner.skip_trivia();
        assert_eq!(scanner.peek(), Some('i'));
    }

    #[test]
    fn skip_trivia_handles_comment_at_end_of_input() {
        let mut scanner = Scanner::new("// only a comment");
        scanner.skip_trivia();
        assert_eq!(scanner.peek(), None);
    }

    #[test]
    fn offset_counts_characters_not_bytes() {
        let mut scanner = Scanner::new("é inject");
        let _ = scanner.bump();
        assert_eq!(scanner.offset(), 1);
    }

    #[test]
    fn expect_identifier_stops_at_non_identifier_character() {
        let mut scanner = Scanner::new("bind(");
        let ident = scanner.expect_identifier("command name").expect("should parse");
        assert_eq!(ident, "bind");
        assert_eq!(scanner.peek(), Some('('));
    }

    #[test]
    fn expect_identifier_allows_digits_after_head() {
        let mut scanner = Scanner::new("v2_impl rest");
        let ident = scanner.expect_identifier("argument").expect("should parse");
        assert_eq!(ident, "v2_impl");
    }

    #[test]
    fn expect_identifier_rejects_digit_head() {
        let mut scanner = Scanner::new("2fast");
        let err = scanner.expect_identifier("argument").unwrap_err();
        assert_eq!(
            err,
            ParseError::IdentifierExpected {
                description: "argument",
                offset: 0,
            }
        );
    }

    #[test]
    fn expect_char_reports_found_character_and_offset() {
        let mut scanner = Scanner::new("ab");
        let _ = scanner.bump();
        let err = scanner.expect_char('(').unwrap_err();
        assert_eq!(
            err,
            ParseError::CharacterMismatch {
                expected: '(',
                found: Some('b'),
                offset: 1,
            }
        );
    }

    #[test]
    fn tag_matches_at_start_of_input() {
        let mut scanner = Scanner::new("wiring: inject");
        assert!(scanner.skip_until_tag("wiring:"));
        scanner.skip_trivia();
        assert_eq!(scanner.peek(), Some('i'));
    }

    #[test]
    fn tag_matches_after_whitespace() {
        let mut scanner = Scanner::new("/// Some docs\n/// wiring: inject");
        assert!(scanner.skip_until_tag("wiring:"));
    }

    #[test]
    fn tag_embedded_in_word_is_not_matched() {
        let mut scanner = Scanner::new("see rewiring: not a command");
        assert!(!scanner.skip_until_tag("wiring:"));
    }

    #[test]
    fn tag_absent_returns_false() {
        let mut scanner = Scanner::new("just an ordinary comment");
        assert!(!scanner.skip_until_tag("wiring:"));
    }
}
