use std::ops::Range;
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::lexer::{LexError, Lexer, Syntax, Token};

/// A SQL template rewritten to positional placeholders.
///
/// `names` holds one entry per placeholder occurrence, in order, so the
/// n-th marker in `sql` takes the value for `names[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    sql: Arc<str>,
    names: Vec<String>,
}

impl CompiledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn shared_sql(&self) -> Arc<str> {
        Arc::clone(&self.sql)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    name: String,
    // delimiter through the end of the identifier
    span: Range<usize>,
}

/// A lexed SQL template.
///
/// Rendering for another [`Dialect`] reuses the placeholder spans found by
/// [`Template::parse`] and never scans the text again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    placeholders: Vec<Placeholder>,
}

impl Template {
    /// Parses `raw` with [`Syntax::STANDARD`] quoting.
    pub fn parse<T>(raw: T, delimiter: char) -> Result<Self, LexError>
    where
        T: Into<String>,
    {
        Self::parse_with(raw, delimiter, Syntax::STANDARD)
    }

    pub fn parse_with<T>(raw: T, delimiter: char, syntax: Syntax) -> Result<Self, LexError>
    where
        T: Into<String>,
    {
        let raw = raw.into();
        let mut placeholders = Vec::new();
        for token in Lexer::with_syntax(&raw, delimiter, syntax) {
            if let Token::Placeholder { name, offset, .. } = token? {
                placeholders.push(Placeholder {
                    name: name.to_owned(),
                    span: offset..offset + delimiter.len_utf8() + name.len(),
                });
            }
        }
        Ok(Self { raw, placeholders })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in occurrence order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(|p| p.name.as_str())
    }

    pub fn render(&self, dialect: Dialect) -> CompiledQuery {
        let mut sql = String::with_capacity(self.raw.len());
        let mut copied = 0;
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            sql.push_str(&self.raw[copied..placeholder.span.start]);
            sql.push_str(&dialect.marker(i + 1));
            copied = placeholder.span.end;
        }
        sql.push_str(&self.raw[copied..]);

        CompiledQuery {
            sql: sql.into(),
            names: self.names().map(str::to_owned).collect(),
        }
    }
}

/// Converts named placeholders (`:name`) to the positional syntax of `dialect`.
///
/// The template is lexed with the quoting rules of [`Dialect::syntax`].
///
/// # Examples
///
/// ```
/// use sqlx_named_params::{compile, Dialect};
///
/// let query = compile("SELECT * FROM users WHERE id = :id AND name = :name", ':', Dialect::POSTGRES)?;
/// assert_eq!(query.sql(), "SELECT * FROM users WHERE id = $1 AND name = $2");
/// assert_eq!(query.names(), ["id", "name"]);
/// # Ok::<(), sqlx_named_params::lexer::LexError>(())
/// ```
pub fn compile(raw: &str, delimiter: char, dialect: Dialect) -> Result<CompiledQuery, LexError> {
    compile_with(raw, delimiter, dialect, dialect.syntax())
}

pub fn compile_with(
    raw: &str,
    delimiter: char,
    dialect: Dialect,
    syntax: Syntax,
) -> Result<CompiledQuery, LexError> {
    let compiled = Template::parse_with(raw, delimiter, syntax)?.render(dialect);
    tracing::trace!(placeholders = compiled.names.len(), "compiled named query");
    Ok(compiled)
}
