//! Tokenizer for action text.
//!
//! An action (the text between `{{` and `}}`) is broken into a flat token
//! list in a single left-to-right pass.  The grammar is deliberately small:
//! symbols, `$variables`, identifiers, string and integer literals, dotted
//! field selectors, `/* comments */`, and whitespace.  There is no hex or
//! floating-point literal syntax.

use crate::error::{Error, Result};
use crate::value::Value;

// ── Tokens ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A string or number literal.
    Literal(Value),
    /// A bare identifier: keyword or function name.
    Ident(String),
    /// A field selector.  Empty string means the bare `.` (whole context);
    /// otherwise a `.`-joined path with the leading dot stripped.
    Dot(String),
    /// A `$name` reference.  The name may be empty.
    Var(String),
    LParen,
    RParen,
    /// `:=`
    Declare,
    /// `=`
    Assign,
    /// `|`
    Pipe,
    Comma,
}

impl Token {
    /// Short tag used in "leftover token" diagnostics.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Token::Literal(_) => "literal",
            Token::Ident(_) => "id",
            Token::Dot(_) => ".",
            Token::Var(_) => "$",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Declare => ":=",
            Token::Assign => "=",
            Token::Pipe => "|",
            Token::Comma => ",",
        }
    }
}

/// A consuming cursor over a token list.
///
/// The evaluator walks the stream destructively, occasionally pushing a
/// single token back when it reads past the end of an argument.
#[derive(Debug)]
pub struct Tokens {
    toks: Vec<Token>,
    pos: usize,
}

impl Tokens {
    pub fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos)
    }

    pub fn next(&mut self) -> Option<Token> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Undo the most recent `next`.
    pub fn backup(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos = self.pos.saturating_sub(1);
    }
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Syntax error carrying the unconsumed tail, anchored at `at`.
    fn err(&self, at: usize) -> Error {
        let rest = self
            .src
            .get(at..)
            .map(str::to_owned)
            .unwrap_or_else(|| String::from_utf8_lossy(&self.bytes[at..]).into_owned());
        Error::Syntax(format!("{rest} at {at}"))
    }

    /// Whether the byte before `at` ends a word.  Start of input counts as
    /// a non-word neighbour.
    fn word_before(&self, at: usize) -> bool {
        at > 0 && is_word(self.bytes[at - 1])
    }

    /// Whether the byte at `at` starts a word.  End of input counts as a
    /// non-word neighbour.
    fn word_after(&self, at: usize) -> bool {
        self.bytes.get(at).copied().is_some_and(is_word)
    }

    fn take_word_chars(&mut self) -> String {
        let start = self.pos;
        while self.peek_byte().is_some_and(is_word) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_owned()
    }

    fn lex_number(&mut self, start: usize) -> Result<Token> {
        if matches!(self.peek_byte(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        // A sign with no digits, or a digit run flush against a word
        // character, is not a number.
        if self.pos == digits_start || self.word_after(self.pos) {
            return Err(self.err(start));
        }
        let text = &self.src[start..self.pos];
        let n: f64 = text.parse().map_err(|_| self.err(start))?;
        Ok(Token::Literal(Value::Num(n)))
    }

    /// Back-quoted raw string: no escapes, runs to the next back-quote.
    fn lex_raw_string(&mut self, start: usize) -> Result<Token> {
        if self.word_before(start) {
            return Err(self.err(start));
        }
        self.pos += 1;
        let body_start = self.pos;
        while let Some(b) = self.peek_byte() {
            if b == b'`' {
                let body = self.src[body_start..self.pos].to_owned();
                self.pos += 1;
                if self.word_after(self.pos) {
                    return Err(self.err(start));
                }
                return Ok(Token::Literal(Value::Str(body)));
            }
            self.pos += 1;
        }
        Err(self.err(start))
    }

    /// Double-quoted string with a fixed escape set.  `\a` maps to the
    /// literal character `a`; unknown escapes are rejected.
    fn lex_quoted_string(&mut self, start: usize) -> Result<Token> {
        if self.word_before(start) {
            return Err(self.err(start));
        }
        self.pos += 1;
        let mut body = String::new();
        loop {
            let Some(rest) = self.src.get(self.pos..) else {
                return Err(self.err(start));
            };
            let Some(c) = rest.chars().next() else {
                return Err(self.err(start));
            };
            self.pos += c.len_utf8();
            match c {
                '"' => {
                    if self.word_after(self.pos) {
                        return Err(self.err(start));
                    }
                    return Ok(Token::Literal(Value::Str(body)));
                }
                '\\' => {
                    let Some(esc) = self.src[self.pos..].chars().next() else {
                        return Err(self.err(start));
                    };
                    self.pos += esc.len_utf8();
                    body.push(match esc {
                        'a' => 'a',
                        'b' => '\u{0008}',
                        'f' => '\u{000C}',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'v' => '\u{000B}',
                        '\\' | '\'' | '"' => esc,
                        other => return Err(Error::UnsupportedEscape(other)),
                    });
                }
                other => body.push(other),
            }
        }
    }

    /// `.` selector: either segments (`.foo.bar`) or the bare dot, which is
    /// only valid between non-word neighbours.
    fn lex_dot(&mut self, start: usize) -> Result<Token> {
        if self
            .bytes
            .get(self.pos + 1)
            .copied()
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            while self.peek_byte() == Some(b'.')
                && self
                    .bytes
                    .get(self.pos + 1)
                    .copied()
                    .is_some_and(|b| b.is_ascii_alphabetic())
            {
                self.pos += 2;
                while self.peek_byte().is_some_and(is_word) {
                    self.pos += 1;
                }
            }
            return Ok(Token::Dot(self.src[start + 1..self.pos].to_owned()));
        }
        if self.word_before(start) || self.word_after(start + 1) {
            return Err(self.err(start));
        }
        self.pos += 1;
        Ok(Token::Dot(String::new()))
    }

    /// `/* ... */` comment on a single line.  Terminates at the first `*/`.
    fn skip_comment(&mut self, start: usize) -> Result<()> {
        self.pos += 2;
        loop {
            match self.peek_byte() {
                Some(b'*') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some(b'\n') | None => return Err(self.err(start)),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn run(&mut self) -> Result<Vec<Token>> {
        let mut toks = Vec::new();
        while let Some(b) = self.peek_byte() {
            let start = self.pos;
            match b {
                b'(' => {
                    self.pos += 1;
                    toks.push(Token::LParen);
                }
                b')' => {
                    self.pos += 1;
                    toks.push(Token::RParen);
                }
                b',' => {
                    self.pos += 1;
                    toks.push(Token::Comma);
                }
                b'|' => {
                    self.pos += 1;
                    toks.push(Token::Pipe);
                }
                b'=' => {
                    self.pos += 1;
                    toks.push(Token::Assign);
                }
                b':' => {
                    if self.bytes.get(self.pos + 1) != Some(&b'=') {
                        return Err(self.err(start));
                    }
                    self.pos += 2;
                    toks.push(Token::Declare);
                }
                b'$' => {
                    self.pos += 1;
                    toks.push(Token::Var(self.take_word_chars()));
                }
                b'`' => toks.push(self.lex_raw_string(start)?),
                b'"' => toks.push(self.lex_quoted_string(start)?),
                b'/' => {
                    if self.bytes.get(self.pos + 1) != Some(&b'*') {
                        return Err(self.err(start));
                    }
                    self.skip_comment(start)?;
                }
                b'.' => toks.push(self.lex_dot(start)?),
                b'+' | b'-' | b'0'..=b'9' => toks.push(self.lex_number(start)?),
                b if b.is_ascii_alphabetic() => {
                    toks.push(Token::Ident(self.take_word_chars()));
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                b if b >= 0x80 => {
                    // Non-ASCII: whitespace is skipped, anything else is
                    // not part of the grammar.
                    let c = self.src[self.pos..]
                        .chars()
                        .next()
                        .ok_or_else(|| self.err(start))?;
                    if !c.is_whitespace() {
                        return Err(self.err(start));
                    }
                    self.pos += c.len_utf8();
                }
                _ => return Err(self.err(start)),
            }
        }
        Ok(toks)
    }
}

/// Tokenize one action's worth of text.
pub fn tokenize(action: &str) -> Result<Tokens> {
    let toks = Lexer::new(action).run()?;
    Ok(Tokens { toks, pos: 0 })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
