//! Crockford-style JS minification
//!
//! A port of the classic jsmin two-symbol rewriter: `the_a`/`the_b` hold the
//! two characters under consideration, `the_x`/`the_y` remember the last two
//! significant characters so a `/` after an operator or opening bracket can
//! be recognized as the start of a regular-expression literal rather than
//! division.
//!
//! Unterminated strings, comments and regex literals abort this minifier
//! only; the markup engine catches the error and leaves the script verbatim.

use wmm_core::{JsMinifier, MinificationErrorInfo, MinifiedCode};

/// Sentinel for end of input
///
/// Safe because `get` normalizes every control character other than `\n`
/// to a space before anyone compares against it.
const EOF: char = '\0';

/// Fatal failure inside the JS rewriter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (line {line} column {column})")]
pub struct JsMinError {
    pub message: &'static str,
    pub line: u32,
    pub column: u32,
}

/// Characters that may appear inside an identifier or number
///
/// Backslash counts so escaped identifiers survive; so does anything outside
/// ASCII.
fn is_alphanum(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '\\' || c > '\u{7e}'
}

/// Whole scan state for one call, constructed fresh every time
struct Scan<'src> {
    chars: std::str::Chars<'src>,
    lookahead: char,
    the_a: char,
    the_b: char,
    the_x: char,
    the_y: char,
    out: String,
    line: u32,
    column: u32,
}

impl<'src> Scan<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            lookahead: EOF,
            the_a: EOF,
            the_b: EOF,
            the_x: EOF,
            the_y: EOF,
            out: String::with_capacity(source.len()),
            line: 1,
            column: 0,
        }
    }

    fn err(&self, message: &'static str) -> JsMinError {
        JsMinError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn put(&mut self, c: char) {
        self.out.push(c);
    }

    /// Next character, with control characters normalized
    ///
    /// Anything below space other than a newline becomes a space; CR becomes
    /// LF.
    fn get(&mut self) -> char {
        let c = if self.lookahead != EOF {
            std::mem::replace(&mut self.lookahead, EOF)
        } else {
            match self.chars.next() {
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                        self.column = 0;
                    } else {
                        self.column += 1;
                    }
                    c
                }
                None => EOF,
            }
        };
        if c >= ' ' || c == '\n' || c == EOF {
            c
        } else if c == '\r' {
            '\n'
        } else {
            ' '
        }
    }

    fn peek(&mut self) -> char {
        self.lookahead = self.get();
        self.lookahead
    }

    /// Next character, skipping comments
    ///
    /// A `//` comment yields the terminating newline; a `/* */` comment
    /// yields a single space.
    fn next(&mut self) -> Result<char, JsMinError> {
        let mut c = self.get();
        if c == '/' {
            match self.peek() {
                '/' => loop {
                    c = self.get();
                    if c <= '\n' {
                        break;
                    }
                },
                '*' => {
                    self.get();
                    while c != ' ' {
                        match self.get() {
                            '*' => {
                                if self.peek() == '/' {
                                    self.get();
                                    c = ' ';
                                }
                            }
                            EOF => return Err(self.err("unterminated comment")),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        self.the_y = self.the_x;
        self.the_x = c;
        Ok(c)
    }

    /// Perform one of the three steps of the rewrite loop
    ///
    /// 1. output `the_a` and shift; 2. shift without output (delete `the_a`);
    /// 3. fetch a new `the_b` (delete `the_b`). String and regex literals
    /// are copied through verbatim from inside the relevant step.
    fn action(&mut self, determined: u8) -> Result<(), JsMinError> {
        if determined <= 1 {
            self.put(self.the_a);
            if (self.the_y == '\n' || self.the_y == ' ')
                && matches!(self.the_a, '+' | '-' | '*' | '/')
                && matches!(self.the_b, '+' | '-' | '*' | '/')
            {
                self.put(self.the_y);
            }
        }
        if determined <= 2 {
            self.the_a = self.the_b;
            if matches!(self.the_a, '\'' | '"' | '`') {
                loop {
                    self.put(self.the_a);
                    self.the_a = self.get();
                    if self.the_a == self.the_b {
                        break;
                    }
                    if self.the_a == '\\' {
                        self.put(self.the_a);
                        self.the_a = self.get();
                    }
                    if self.the_a == EOF {
                        return Err(self.err("unterminated string literal"));
                    }
                }
            }
        }
        self.the_b = self.next()?;
        if self.the_b == '/'
            && matches!(
                self.the_a,
                '(' | ','
                    | '='
                    | ':'
                    | '['
                    | '!'
                    | '&'
                    | '|'
                    | '?'
                    | '+'
                    | '-'
                    | '~'
                    | '*'
                    | '/'
                    | '{'
                    | '\n'
            )
        {
            self.put(self.the_a);
            if self.the_a == '/' || self.the_a == '*' {
                self.put(' ');
            }
            self.put(self.the_b);
            loop {
                self.the_a = self.get();
                if self.the_a == '[' {
                    loop {
                        self.put(self.the_a);
                        self.the_a = self.get();
                        if self.the_a == ']' {
                            break;
                        }
                        if self.the_a == '\\' {
                            self.put(self.the_a);
                            self.the_a = self.get();
                        }
                        if self.the_a == EOF {
                            return Err(
                                self.err("unterminated set in regular expression literal")
                            );
                        }
                    }
                } else if self.the_a == '/' {
                    match self.peek() {
                        '/' | '*' => {
                            return Err(
                                self.err("unterminated set in regular expression literal")
                            )
                        }
                        _ => {}
                    }
                    break;
                } else if self.the_a == '\\' {
                    self.put(self.the_a);
                    self.the_a = self.get();
                }
                if self.the_a == EOF {
                    return Err(self.err("unterminated regular expression literal"));
                }
                self.put(self.the_a);
            }
            self.the_b = self.next()?;
        }
        Ok(())
    }

    /// The main rewrite loop
    fn run(&mut self) -> Result<(), JsMinError> {
        self.the_a = '\n';
        self.action(3)?;
        while self.the_a != EOF {
            match self.the_a {
                ' ' => {
                    if is_alphanum(self.the_b) {
                        self.action(1)?;
                    } else {
                        self.action(2)?;
                    }
                }
                '\n' => match self.the_b {
                    '{' | '[' | '(' | '+' | '-' | '!' | '~' => self.action(1)?,
                    ' ' => self.action(3)?,
                    _ => {
                        if is_alphanum(self.the_b) {
                            self.action(1)?;
                        } else {
                            self.action(2)?;
                        }
                    }
                },
                _ => match self.the_b {
                    ' ' => {
                        if is_alphanum(self.the_a) {
                            self.action(1)?;
                        } else {
                            self.action(3)?;
                        }
                    }
                    '\n' => match self.the_a {
                        '}' | ']' | ')' | '+' | '-' | '"' | '\'' | '`' => self.action(1)?,
                        _ => {
                            if is_alphanum(self.the_a) {
                                self.action(1)?;
                            } else {
                                self.action(3)?;
                            }
                        }
                    },
                    _ => self.action(1)?,
                },
            }
        }
        Ok(())
    }
}

/// The default JS backend
///
/// Stateless; every call builds its own scan state, so one instance can be
/// shared across threads and calls freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrockfordJsMinifier;

impl CrockfordJsMinifier {
    pub fn new() -> Self {
        Self
    }

    /// Minify a fragment of JavaScript
    ///
    /// # Errors
    ///
    /// Fails on an unterminated string, comment or regex literal, with the
    /// line/column where scanning stopped.
    pub fn minify(&self, code: &str) -> Result<String, JsMinError> {
        let code = code.strip_prefix('\u{feff}').unwrap_or(code);
        let mut scan = Scan::new(code);
        scan.run()?;
        Ok(scan.out.trim_matches(['\n', ' ']).to_string())
    }
}

impl JsMinifier for CrockfordJsMinifier {
    fn minify_js(&self, code: &str, _is_inline: bool) -> MinifiedCode {
        match self.minify(code) {
            Ok(minified) => MinifiedCode::clean(minified),
            Err(err) => {
                tracing::debug!(line = err.line, column = err.column, "jsmin failed: {err}");
                MinifiedCode {
                    code: code.to_string(),
                    errors: vec![MinificationErrorInfo::new(
                        err.message.to_string(),
                        err.line,
                        err.column,
                        String::new(),
                    )],
                    warnings: Vec::new(),
                }
            }
        }
    }
}
