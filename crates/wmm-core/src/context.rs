//! Parsing context
//!
//! The forward-only cursor over the source text. Exactly one context lives
//! per minify call; it is owned by the tokenizer driving that call and is
//! never shared. Coordinates advance incrementally with the cursor so that
//! anchoring a diagnostic never rescans the document.

use crate::coords::{fragment_around, SourceCoordinates};

/// Default number of characters of context around an error position
const FRAGMENT_RADIUS: usize = 40;

/// Forward-only cursor over a borrowed source string
#[derive(Debug)]
pub struct ParsingContext<'src> {
    source: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> ParsingContext<'src> {
    /// Create a context at the start of `source`
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The full source text
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Unconsumed input
    pub fn remaining(&self) -> &'src str {
        &self.source[self.position..]
    }

    /// Number of unconsumed bytes
    pub fn remaining_len(&self) -> usize {
        self.source.len() - self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Snapshot of the current coordinates
    pub fn coordinates(&self) -> SourceCoordinates {
        SourceCoordinates::new(self.position, self.line, self.column)
    }

    /// Source excerpt around the current position, for diagnostics
    pub fn fragment(&self) -> String {
        fragment_around(self.source, self.coordinates(), FRAGMENT_RADIUS)
    }

    /// Next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Character `n` characters ahead of the cursor
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Whether the unconsumed input starts with `prefix`
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// ASCII case-insensitive prefix test
    pub fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        let rest = self.remaining().as_bytes();
        rest.len() >= prefix.len() && rest[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    }

    /// Consume one character, updating line/column tracking
    pub fn advance(&mut self) -> Option<char> {
        let c = self.remaining().chars().next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `count` characters (or until end of input)
    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume `len` bytes, assuming the span has already been inspected
    ///
    /// `len` must land on a character boundary.
    pub fn advance_bytes(&mut self, len: usize) {
        let end = (self.position + len).min(self.source.len());
        while self.position < end {
            self.advance();
        }
    }

    /// Consume characters while `pred` holds, returning the consumed span
    pub fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'src str {
        let start = self.position;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.position]
    }

    /// Consume a run of ASCII whitespace, returning it
    pub fn skip_whitespace(&mut self) -> &'src str {
        self.take_while(|c| c.is_ascii_whitespace())
    }
}
