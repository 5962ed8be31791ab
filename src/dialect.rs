use std::borrow::Cow;

use crate::lexer::Syntax;

/// Positional placeholder syntax expected by a database driver.
///
/// # Examples
///
/// ```
/// use sqlx_named_params::Dialect;
///
/// assert_eq!(Dialect::POSTGRES.marker(3), "$3");
/// assert_eq!(Dialect::MYSQL.marker(3), "?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// The prefix followed by the 1-based occurrence index: `$1`, `$2`, ...
    Sequential(&'static str),
    /// The same marker for every occurrence.
    Fixed(&'static str),
}

impl Dialect {
    pub const POSTGRES: Dialect = Dialect::Sequential("$");
    pub const MYSQL: Dialect = Dialect::Fixed("?");
    pub const SQLITE: Dialect = Dialect::Fixed("?");
    pub const SQL_SERVER: Dialect = Dialect::Sequential("@p");
    pub const ORACLE: Dialect = Dialect::Sequential(":");

    /// Marker text for the `index`-th placeholder occurrence (1-based).
    pub fn marker(&self, index: usize) -> Cow<'static, str> {
        match *self {
            Dialect::Sequential(prefix) => Cow::Owned(format!("{prefix}{index}")),
            Dialect::Fixed(marker) => Cow::Borrowed(marker),
        }
    }

    /// Quoting rules assumed for templates compiled to this dialect.
    ///
    /// [`Dialect::SQLITE`] is the same value as [`Dialect::MYSQL`], so this
    /// returns [`Syntax::MYSQL`] for both; SQLite callers pass
    /// [`Syntax::STANDARD`] explicitly.
    pub fn syntax(&self) -> Syntax {
        if *self == Dialect::MYSQL {
            Syntax::MYSQL
        } else {
            Syntax::STANDARD
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::MYSQL
    }
}
