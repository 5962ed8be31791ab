use std::sync::Arc;

use crate::args::ArgumentSource;
use crate::compile::{compile_with, CompiledQuery};
use crate::dialect::Dialect;
use crate::lexer::Syntax;
use crate::naming::Naming;
use crate::prepared::{bind_compiled, BoundQuery, PreparedQuery};
use crate::Result;

/// Named-query configuration: placeholder delimiter, output dialect and
/// how record fields are matched to parameter names.
///
/// The configuration is fixed once built; `with_*` methods consume the value.
///
/// # Examples
///
/// ```
/// use sqlx_named_params::{params, Api, Dialect, Value};
///
/// let api = Api::new().with_lexer(':', Dialect::POSTGRES);
/// let bound = api.named_query_params(
///     "SELECT id FROM users WHERE id = :id",
///     &params! { id: "bob" },
/// )?;
/// assert_eq!(bound.sql(), "SELECT id FROM users WHERE id = $1");
/// assert_eq!(bound.values(), [Value::Text("bob".into())]);
/// # Ok::<(), sqlx_named_params::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    delimiter: char,
    dialect: Dialect,
    // None follows the dialect
    syntax: Option<Syntax>,
    naming: Naming,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            delimiter: ':',
            dialect: Dialect::default(),
            syntax: None,
            naming: Naming::default(),
        }
    }
}

impl Api {
    /// Delimiter `:`, [`Dialect::MYSQL`], tag key `db` and
    /// [`snake_case`](crate::naming::snake_case) field mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexer(mut self, delimiter: char, dialect: Dialect) -> Self {
        self.delimiter = delimiter;
        self.dialect = dialect;
        self
    }

    /// Overrides the quoting rules otherwise taken from
    /// [`Dialect::syntax`].
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn with_struct_tag_key<K>(mut self, tag_key: K) -> Self
    where
        K: Into<String>,
    {
        self.naming.set_tag_key(tag_key.into());
        self
    }

    pub fn with_name_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.naming.set_mapper(Arc::new(mapper));
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax.unwrap_or_else(|| self.dialect.syntax())
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    pub fn compile(&self, query: &str) -> Result<CompiledQuery> {
        Ok(compile_with(query, self.delimiter, self.dialect, self.syntax())?)
    }

    /// Compiles `query` and resolves its parameters from `arg` in one step.
    ///
    /// Nothing is cached; use [`prepare_named`](Self::prepare_named) for a
    /// query executed repeatedly.
    pub fn named_query_params<S>(&self, query: &str, arg: &S) -> Result<BoundQuery>
    where
        S: ArgumentSource + ?Sized,
    {
        let compiled = self.compile(query)?;
        bind_compiled(&compiled, arg, &self.naming)
    }

    pub fn prepare_named(&self, query: &str) -> Result<PreparedQuery> {
        let compiled = self.compile(query)?;
        Ok(PreparedQuery::new(compiled, self.naming.clone()))
    }

    /// Like [`prepare_named`](Self::prepare_named), but fails right away if
    /// any of `examples` cannot supply every parameter.
    pub fn prepare_named_checked(
        &self,
        query: &str,
        examples: &[&dyn ArgumentSource],
    ) -> Result<PreparedQuery> {
        let prepared = self.prepare_named(query)?;
        for example in examples {
            prepared.check(*example)?;
        }
        Ok(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexErrorKind;
    use crate::{params, Error, Value};

    struct User {
        id: String,
        full_name: String,
        email: String,
        age: i32,
    }

    crate::record!(User {
        id(db = "user_id"),
        full_name,
        email,
        age,
    });

    struct Table {
        name: String,
    }

    crate::record!(Table { name });

    fn billy() -> User {
        User {
            id: "billy".into(),
            full_name: "Billy Bob".into(),
            email: "billy@example.com".into(),
            age: 50,
        }
    }

    #[test]
    fn test_end_to_end() {
        let api = Api::new().with_lexer(':', Dialect::POSTGRES);
        let compiled = api.compile("SELECT id FROM users WHERE id=:id").unwrap();
        assert_eq!(compiled.sql(), "SELECT id FROM users WHERE id=$1");
        assert_eq!(compiled.names(), ["id"]);

        let bound = api
            .named_query_params("SELECT id FROM users WHERE id=:id", &params! { id: "bob" })
            .unwrap();
        assert_eq!(bound.values(), [Value::Text("bob".into())]);
    }

    #[test]
    fn test_named_query_params_from_record() {
        let api = Api::new().with_lexer(':', Dialect::POSTGRES);
        let bound = api
            .named_query_params(
                "INSERT INTO users (full_name, email, age, user_id) VALUES (:full_name, :email, :age, :user_id)",
                &billy(),
            )
            .unwrap();

        assert_eq!(
            bound.sql(),
            "INSERT INTO users (full_name, email, age, user_id) VALUES ($1, $2, $3, $4)"
        );
        assert_eq!(
            bound.values(),
            [
                Value::Text("Billy Bob".into()),
                Value::Text("billy@example.com".into()),
                Value::Int(50),
                Value::Text("billy".into()),
            ]
        );
    }

    #[test]
    fn test_named_query_params_unknown_parameter() {
        let err = Api::new()
            .named_query_params("SELECT * FROM :table", &Table { name: "users".into() })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "table"));
    }

    #[test]
    fn test_named_query_params_lex_error() {
        let err = Api::new()
            .named_query_params("SELECT ':name", &params! { name: 1 })
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Lex(e) if e.kind == LexErrorKind::UnterminatedLiteral && e.position == 7
        ));
    }

    #[test]
    fn test_custom_tag_key_and_mapper() {
        let api = Api::new()
            .with_struct_tag_key("json")
            .with_name_mapper(|field: &str| format!("p_{field}"));
        assert_eq!(api.naming().tag_key(), "json");

        let bound = api
            .named_query_params("SELECT :p_full_name, :p_id", &billy())
            .unwrap();
        assert_eq!(
            bound.values(),
            [Value::Text("Billy Bob".into()), Value::Text("billy".into())]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let api = Api::new().with_lexer('@', Dialect::SQL_SERVER);
        assert_eq!(api.delimiter(), '@');
        assert_eq!(api.dialect(), Dialect::SQL_SERVER);

        let bound = api
            .named_query_params("SELECT * FROM t WHERE a = @a AND b = ':b'", &params! { a: 1 })
            .unwrap();
        assert_eq!(bound.sql(), "SELECT * FROM t WHERE a = @p1 AND b = ':b'");
    }

    #[test]
    fn test_syntax_follows_dialect_unless_set() {
        let sql = r"SELECT 'C:\' AS dir, :a";
        assert_eq!(Api::new().syntax(), Syntax::MYSQL);
        assert!(Api::new().compile(sql).is_err());

        let api = Api::new().with_lexer(':', Dialect::POSTGRES);
        assert_eq!(api.syntax(), Syntax::STANDARD);
        assert_eq!(api.compile(sql).unwrap().sql(), r"SELECT 'C:\' AS dir, $1");

        let api = Api::new().with_syntax(Syntax::STANDARD);
        assert_eq!(api.compile(sql).unwrap().sql(), r"SELECT 'C:\' AS dir, ?");
    }

    #[test]
    fn test_mysql_quoting_in_default_api() {
        let bound = Api::new()
            .named_query_params(
                r"SELECT `t:x` FROM t WHERE note = 'it\'s :not' # :skip
                  AND id = :id",
                &params! { id: 1 },
            )
            .unwrap();
        assert_eq!(bound.values(), [Value::Int(1)]);
        assert!(bound.sql().ends_with("AND id = ?"));
    }

    #[test]
    fn test_prepare_named_checked() {
        let api = Api::new();
        let sql = "UPDATE users SET age = :age WHERE user_id = :user_id";
        let user = billy();

        let prepared = api.prepare_named_checked(sql, &[&user]).unwrap();
        assert_eq!(prepared.names(), ["age", "user_id"]);

        let partial = params! { age: 1 };
        let err = api.prepare_named_checked(sql, &[&user, &partial]).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "user_id"));
    }
}
