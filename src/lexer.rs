//! Placeholder lexer.
//!
//! Splits a SQL template into literal text and named placeholders in a single
//! left-to-right pass. String literals, quoted identifiers and comments are
//! copied through untouched, so `'12:30'` or `-- :note` never produce
//! placeholders. Backend-specific quoting is selected with [`Syntax`].

use std::fmt;

/// A piece of a SQL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text copied verbatim into the compiled query.
    Literal { text: &'a str, offset: usize },
    /// A named placeholder. `offset` points at the delimiter and `index` is
    /// the 1-based occurrence number within the template.
    Placeholder {
        name: &'a str,
        offset: usize,
        index: usize,
    },
}

/// The template could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} starting at byte {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedLiteral,
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexErrorKind::UnterminatedLiteral => "unterminated string literal",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
        })
    }
}

/// Quoting and comment rules that differ between SQL backends.
///
/// Backtick-quoted identifiers are always skipped; no backend gives a
/// backtick any other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Syntax {
    /// A backslash escapes the next character inside `'...'` and `"..."`.
    pub backslash_escapes: bool,
    /// `#` starts a comment running to the end of the line.
    pub hash_comments: bool,
}

impl Syntax {
    /// ANSI quoting: quotes are escaped only by doubling them.
    pub const STANDARD: Syntax = Syntax {
        backslash_escapes: false,
        hash_comments: false,
    };

    /// MySQL and MariaDB in their default SQL mode.
    pub const MYSQL: Syntax = Syntax {
        backslash_escapes: true,
        hash_comments: true,
    };
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax::STANDARD
    }
}

/// Iterator over the [`Token`]s of a SQL template.
///
/// After yielding an error the lexer is exhausted.
///
/// # Examples
///
/// ```
/// use sqlx_named_params::lexer::{Lexer, Token};
///
/// let tokens = Lexer::new("id = :id", ':').collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Literal { text: "id = ", offset: 0 },
///         Token::Placeholder { name: "id", offset: 5, index: 1 },
///     ]
/// );
/// # Ok::<(), sqlx_named_params::lexer::LexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    delimiter: char,
    syntax: Syntax,
    pos: usize,
    index: usize,
    // placeholder found while scanning the preceding literal
    pending: Option<&'a str>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Lexes `src` with [`Syntax::STANDARD`] quoting.
    pub fn new(src: &'a str, delimiter: char) -> Self {
        Self::with_syntax(src, delimiter, Syntax::STANDARD)
    }

    pub fn with_syntax(src: &'a str, delimiter: char, syntax: Syntax) -> Self {
        #[cfg(test)]
        SCANS.with(|scans| scans.set(scans.get() + 1));

        Self {
            src,
            delimiter,
            syntax,
            pos: 0,
            index: 0,
            pending: None,
            failed: false,
        }
    }

    /// Returns the identifier of the placeholder starting at `at`, if any.
    fn placeholder_at(&self, at: usize) -> Option<&'a str> {
        let src = self.src;
        let rest = src[at..].strip_prefix(self.delimiter)?;
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    }

    /// Scans literal text from `start` up to the next placeholder or the end of input.
    fn literal_end(&self, start: usize) -> Result<(usize, Option<&'a str>), LexError> {
        let src = self.src;
        let mut i = start;
        while let Some(c) = src[i..].chars().next() {
            let rest = &src[i..];
            if c == '\'' || c == '"' {
                i = skip_quoted(src, i, c, self.syntax.backslash_escapes)?;
            } else if c == '`' {
                i = skip_quoted(src, i, c, false)?;
            } else if rest.starts_with("--") || (c == '#' && self.syntax.hash_comments) {
                i = rest.find('\n').map_or(src.len(), |n| i + n + 1);
            } else if rest.starts_with("/*") {
                let close = rest[2..].find("*/").ok_or(LexError {
                    kind: LexErrorKind::UnterminatedComment,
                    position: i,
                })?;
                i += close + 4;
            } else if c == self.delimiter {
                let width = c.len_utf8();
                if rest[width..].starts_with(self.delimiter) {
                    i += width * 2;
                } else if let Some(name) = self.placeholder_at(i) {
                    return Ok((i, Some(name)));
                } else {
                    i += width;
                }
            } else {
                i += c.len_utf8();
            }
        }
        Ok((src.len(), None))
    }

    fn emit_placeholder(&mut self, name: &'a str) -> Token<'a> {
        let offset = self.pos;
        self.pos += self.delimiter.len_utf8() + name.len();
        self.index += 1;
        Token::Placeholder {
            name,
            offset,
            index: self.index,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending.take() {
            return Some(Ok(self.emit_placeholder(name)));
        }
        if self.failed || self.pos >= self.src.len() {
            return None;
        }
        if let Some(name) = self.placeholder_at(self.pos) {
            return Some(Ok(self.emit_placeholder(name)));
        }

        let start = self.pos;
        match self.literal_end(start) {
            Ok((end, pending)) => {
                let src = self.src;
                self.pos = end;
                self.pending = pending;
                Some(Ok(Token::Literal {
                    text: &src[start..end],
                    offset: start,
                }))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Tokenizes `src` in one pass with [`Syntax::STANDARD`] quoting.
pub fn scan(src: &str, delimiter: char) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(src, delimiter).collect()
}

pub fn scan_with(src: &str, delimiter: char, syntax: Syntax) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::with_syntax(src, delimiter, syntax).collect()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Returns the byte offset just past the literal opened by `quote` at `open`.
/// A doubled quote inside the literal is an escaped quote, as is a
/// backslash-quote pair when `backslash_escapes` is set.
fn skip_quoted(
    src: &str,
    open: usize,
    quote: char,
    backslash_escapes: bool,
) -> Result<usize, LexError> {
    let body = open + quote.len_utf8();
    let mut chars = src[body..].char_indices().map(|(n, c)| (body + n, c));
    while let Some((at, c)) = chars.next() {
        if backslash_escapes && c == '\\' {
            chars.next();
        } else if c == quote {
            if src[at + quote.len_utf8()..].starts_with(quote) {
                chars.next();
            } else {
                return Ok(at + quote.len_utf8());
            }
        }
    }
    Err(LexError {
        kind: LexErrorKind::UnterminatedLiteral,
        position: open,
    })
}

#[cfg(test)]
thread_local! {
    static SCANS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of lexers created on the current thread.
#[cfg(test)]
pub(crate) fn scan_count() -> usize {
    SCANS.with(|scans| scans.get())
}
