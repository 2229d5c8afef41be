//! Line-oriented parser for preference declarations.
//!
//! Input format:
//! ```text
//! // comment
//! user_pref("browser.uidensity", 1);       // trailing comment
//! user_pref("devtools.theme", "dark");
//! /* block comments may
//!    span several lines */
//! ```
//!
//! Each meaningful line holds exactly one declaration:
//! `function(key, value);` where `function` is one of `user_pref`, `pref`,
//! `lock_pref` or `sticky_pref`, `key` is a non-empty string literal and
//! `value` is a string, `true`/`false`, or a 32-bit integer.  Blank lines and
//! comment-only lines produce no declaration.
//!
//! # Why a hand-written cursor? (for beginners)
//!
//! Comment markers can legitimately appear *inside* strings
//! (`"https://mozilla.cloudflare-dns.com"` contains `//`), so a line cannot be
//! cleaned up with a simple `find("//")` before parsing.  The private `Cursor` walks
//! the line one token at a time and only treats `//` or `/*` as a comment when
//! it sits between tokens.

use thiserror::Error;

use crate::pref::value::{PrefKind, PrefValue};

// ── Errors ────────────────────────────────────────────────────────────────────

/// A malformed declaration, pinned to the 1-based source line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    /// 1-based line number in the source text.
    pub line: usize,
    /// What was wrong with the line.
    pub reason: ParseErrorReason,
}

/// The specific way a line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorReason {
    /// The identifier before `(` is not a recognised declaration function.
    #[error("unknown declaration function `{0}`")]
    UnknownFunction(String),

    /// A required token was missing.
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
    },

    /// A string literal ran to the end of the line without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A backslash escape inside a string literal was not recognised.
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),

    /// An integer literal does not fit in 32 bits.
    #[error("integer literal `{0}` is out of range")]
    IntegerOutOfRange(String),

    /// The key literal was `""`.
    #[error("preference key must not be empty")]
    EmptyKey,

    /// The source ended while a `/* ... */` comment was still open.
    #[error("unterminated block comment")]
    UnterminatedComment,
}

// ── Declarations ──────────────────────────────────────────────────────────────

/// One successfully parsed `function(key, value);` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: PrefKind,
    pub key: String,
    pub value: PrefValue,
    /// 1-based line number the declaration was read from.
    pub line: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses a single line with no surrounding context.
///
/// Returns `Ok(None)` for blank and comment-only lines.  A `/*` comment that is
/// left open at the end of the line is accepted and simply ends the line; use
/// [`Parser`] to carry that state into following lines.
///
/// # Errors
///
/// Returns [`ParseError`] with `line == line_no` if the line is not a
/// well-formed declaration.
///
/// # Examples
///
/// ```rust
/// use userprefs_core::pref::parser::parse_line;
/// use userprefs_core::PrefValue;
///
/// let decl = parse_line(1, r#"user_pref("browser.uidensity", 1);"#)
///     .unwrap()
///     .unwrap();
/// assert_eq!(decl.key, "browser.uidensity");
/// assert_eq!(decl.value, PrefValue::Int(1));
///
/// assert!(parse_line(2, "// just a comment").unwrap().is_none());
/// assert_eq!(parse_line(3, r#"user_pref("a", 1)"#).unwrap_err().line, 3);
/// ```
pub fn parse_line(line_no: usize, text: &str) -> Result<Option<Declaration>, ParseError> {
    Parser::new().parse_line(line_no, text)
}

/// Stateful line parser.
///
/// The only state carried between lines is whether a `/* ... */` block comment
/// is still open.  Feed lines in order, then call [`Parser::finish`] to detect
/// a comment left open at end of input.
#[derive(Debug, Default)]
pub struct Parser {
    /// Line on which the currently open block comment started, if any.
    open_comment_line: Option<usize>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while inside a multi-line block comment.
    pub fn in_block_comment(&self) -> bool {
        self.open_comment_line.is_some()
    }

    /// Parses the next line of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the line is not blank, not comment-only, and
    /// not a well-formed declaration.  The parser stays usable afterwards, so
    /// callers may skip the bad line and continue.
    pub fn parse_line(
        &mut self,
        line_no: usize,
        text: &str,
    ) -> Result<Option<Declaration>, ParseError> {
        let mut cur = Cursor::new(text, line_no);

        if self.open_comment_line.is_some() {
            if !cur.skip_past_comment_end() {
                return Ok(None);
            }
            self.open_comment_line = None;
        }

        if cur.skip_trivia() {
            self.open_comment_line = Some(line_no);
            return Ok(None);
        }
        if cur.at_end() || cur.peek() == Some('#') {
            return Ok(None);
        }

        let start = cur.pos;
        let decl = match parse_declaration(&mut cur) {
            Ok(decl) => decl,
            Err(e) => return Err(self.recover(&cur, start, e)),
        };

        // Only trivia may follow the semicolon.  A block comment opened here
        // continues onto the next line.
        if cur.skip_trivia() {
            self.open_comment_line = Some(line_no);
        } else if !cur.at_end() {
            let e = cur.expected("end of line");
            return Err(self.recover(&cur, start, e));
        }

        Ok(Some(decl))
    }

    /// Keeps block-comment state in step when a line is rejected.
    ///
    /// A malformed line can still open a `/*` that later lines rely on, so the
    /// line is rescanned from `start` before the error is handed back.
    fn recover(&mut self, cur: &Cursor<'_>, start: usize, err: ParseError) -> ParseError {
        if cur.leaves_comment_open(start) {
            self.open_comment_line = Some(err.line);
        }
        err
    }

    /// Signals end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorReason::UnterminatedComment`] (reported on the line
    /// where the comment opened) if a block comment was never closed.
    pub fn finish(self) -> Result<(), ParseError> {
        match self.open_comment_line {
            Some(line) => Err(ParseError {
                line,
                reason: ParseErrorReason::UnterminatedComment,
            }),
            None => Ok(()),
        }
    }
}

// ── Declaration grammar ───────────────────────────────────────────────────────

fn parse_declaration(cur: &mut Cursor<'_>) -> Result<Declaration, ParseError> {
    let function = cur.identifier();
    if function.is_empty() {
        return Err(cur.expected("declaration"));
    }
    let kind = PrefKind::try_from(function)
        .map_err(|_| cur.error(ParseErrorReason::UnknownFunction(function.to_string())))?;

    cur.skip_inline_trivia();
    cur.expect('(', "`(`")?;

    cur.skip_inline_trivia();
    if !matches!(cur.peek(), Some('"' | '\'')) {
        return Err(cur.expected("string key"));
    }
    let key = cur.string_literal()?;
    if key.is_empty() {
        return Err(cur.error(ParseErrorReason::EmptyKey));
    }

    cur.skip_inline_trivia();
    cur.expect(',', "`,`")?;

    cur.skip_inline_trivia();
    let value = parse_value(cur)?;

    cur.skip_inline_trivia();
    cur.expect(')', "`)`")?;

    cur.skip_inline_trivia();
    cur.expect(';', "`;`")?;

    Ok(Declaration {
        kind,
        key,
        value,
        line: cur.line,
    })
}

fn parse_value(cur: &mut Cursor<'_>) -> Result<PrefValue, ParseError> {
    match cur.peek() {
        Some('"' | '\'') => cur.string_literal().map(PrefValue::String),
        Some(c) if c == '-' || c.is_ascii_digit() => cur.integer_literal().map(PrefValue::Int),
        Some(c) if c.is_ascii_alphabetic() => match cur.identifier() {
            "true" => Ok(PrefValue::Bool(true)),
            "false" => Ok(PrefValue::Bool(false)),
            other => Err(cur.error(ParseErrorReason::Expected {
                expected: "value",
                found: format!("`{other}`"),
            })),
        },
        _ => Err(cur.expected("value")),
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// Byte-offset cursor over one line of text.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, line: usize) -> Self {
        // Tolerate CRLF input when callers split on '\n' only.
        let src = src.strip_suffix('\r').unwrap_or(src);
        Self { src, pos: 0, line }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, reason: ParseErrorReason) -> ParseError {
        ParseError {
            line: self.line,
            reason,
        }
    }

    fn expected(&self, expected: &'static str) -> ParseError {
        let found = match self.peek() {
            Some(c) => format!("`{c}`"),
            None => "end of line".to_string(),
        };
        self.error(ParseErrorReason::Expected { expected, found })
    }

    fn expect(&mut self, c: char, what: &'static str) -> Result<(), ParseError> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    /// Advances past the next `*/`.  Returns `false` (and consumes the rest of
    /// the line) if there is none.
    fn skip_past_comment_end(&mut self) -> bool {
        match self.rest().find("*/") {
            Some(i) => {
                self.pos += i + 2;
                true
            }
            None => {
                self.pos = self.src.len();
                false
            }
        }
    }

    /// Skips whitespace, `//` comments and `/* */` comments.
    ///
    /// Returns `true` if a block comment was opened and not closed on this
    /// line; the cursor is then at end of line.
    fn skip_trivia(&mut self) -> bool {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();

            if trimmed.starts_with("//") {
                self.pos = self.src.len();
                return false;
            }
            if trimmed.starts_with("/*") {
                self.pos += 2;
                if !self.skip_past_comment_end() {
                    return true;
                }
                continue;
            }
            return false;
        }
    }

    /// Scans the line from byte `from`, skipping string literals, and reports
    /// whether it ends inside an unclosed `/*` comment.
    fn leaves_comment_open(&self, from: usize) -> bool {
        let mut chars = self.src[from..].chars().peekable();
        let mut quote: Option<char> = None;
        let mut in_comment = false;

        while let Some(c) = chars.next() {
            if in_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_comment = false;
                }
                continue;
            }
            match (quote, c) {
                (Some(_), '\\') => {
                    chars.next();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '/') => match chars.peek() {
                    Some('/') => return false,
                    Some('*') => {
                        chars.next();
                        in_comment = true;
                    }
                    _ => {}
                },
                (None, _) => {}
            }
        }
        in_comment
    }

    /// Trivia inside a declaration.  An unclosed block comment here swallows
    /// the rest of the line, so the next `expect` reports "end of line".
    fn skip_inline_trivia(&mut self) {
        self.skip_trivia();
    }

    fn identifier(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn integer_literal(&mut self) -> Result<i32, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        let digits = self.rest();
        let len = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if len == 0 {
            return Err(self.expected("digit"));
        }
        self.pos += len;

        let literal = &self.src[start..self.pos];
        literal
            .parse::<i32>()
            .map_err(|_| self.error(ParseErrorReason::IntegerOutOfRange(literal.to_string())))
    }

    /// Parses a `"..."` or `'...'` literal, resolving escapes.
    fn string_literal(&mut self) -> Result<String, ParseError> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.expected("string")),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(ParseErrorReason::UnterminatedString)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ParseError> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some(c @ ('\\' | '"' | '\'')) => Ok(c),
            Some('x') => {
                let code = self.hex_digits('x', 2)?;
                // Two hex digits are always a valid scalar value.
                Ok(char::from(code as u8))
            }
            Some('u') => self.unicode_escape(),
            Some(other) => Err(self.error(ParseErrorReason::InvalidEscape(format!("\\{other}")))),
            None => Err(self.error(ParseErrorReason::UnterminatedString)),
        }
    }

    /// Decodes the digits after `\u`.  A high surrogate must be followed by a
    /// `\u` low surrogate; the pair encodes one non-BMP character.
    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        // The backslash and `u` are already consumed.
        let start = self.pos - 2;
        let high = self.hex_digits('u', 4)?;

        let code = match high {
            0xD800..=0xDBFF => {
                if !self.rest().starts_with("\\u") {
                    return Err(self.invalid_escape_from(start));
                }
                self.pos += 2;
                let low = self.hex_digits('u', 4)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.invalid_escape_from(start));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.invalid_escape_from(start)),
            other => other,
        };

        char::from_u32(code).ok_or_else(|| self.invalid_escape_from(start))
    }

    /// Reads exactly `width` hex digits.
    fn hex_digits(&mut self, marker: char, width: usize) -> Result<u32, ParseError> {
        let digits: String = self.rest().chars().take(width).collect();
        let invalid = || ParseErrorReason::InvalidEscape(format!("\\{marker}{digits}"));

        if digits.len() != width || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error(invalid()));
        }
        self.pos += width;

        u32::from_str_radix(&digits, 16).map_err(|_| self.error(invalid()))
    }

    fn invalid_escape_from(&self, start: usize) -> ParseError {
        self.error(ParseErrorReason::InvalidEscape(
            self.src[start..self.pos].to_string(),
        ))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
