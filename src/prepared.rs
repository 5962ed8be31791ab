use std::sync::Arc;

use crate::args::{resolve, ArgumentSource};
use crate::compile::CompiledQuery;
use crate::naming::Naming;
use crate::value::Value;
use crate::Result;

/// A compiled query together with the values for its positional placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    sql: Arc<str>,
    values: Vec<Value>,
}

impl BoundQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_parts(self) -> (Arc<str>, Vec<Value>) {
        (self.sql, self.values)
    }
}

/// A named query compiled once and bound many times.
///
/// The SQL text is scanned when the query is prepared; [`bind`](Self::bind)
/// only resolves argument values against the stored parameter names.
/// `PreparedQuery` is `Send + Sync` and may be shared between threads.
///
/// # Examples
///
/// ```
/// use sqlx_named_params::{params, Api, Dialect, Value};
///
/// let api = Api::new().with_lexer(':', Dialect::POSTGRES);
/// let query = api.prepare_named("SELECT name FROM users WHERE id = :id")?;
///
/// for id in [1, 2] {
///     let bound = query.bind(&params! { id: id })?;
///     assert_eq!(bound.sql(), "SELECT name FROM users WHERE id = $1");
///     assert_eq!(bound.values(), [Value::Int(id)]);
/// }
/// # Ok::<(), sqlx_named_params::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    compiled: CompiledQuery,
    naming: Naming,
}

impl PreparedQuery {
    pub(crate) fn new(compiled: CompiledQuery, naming: Naming) -> Self {
        tracing::debug!(
            sql = compiled.sql(),
            params = compiled.names().len(),
            "prepared named query"
        );
        Self { compiled, naming }
    }

    pub fn sql(&self) -> &str {
        self.compiled.sql()
    }

    /// Parameter names in placeholder order, duplicates included.
    pub fn names(&self) -> &[String] {
        self.compiled.names()
    }

    /// Resolves the parameter values from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`](crate::Error::UnknownParameter) if
    /// `source` cannot supply one of the names.
    pub fn bind<S>(&self, source: &S) -> Result<BoundQuery>
    where
        S: ArgumentSource + ?Sized,
    {
        bind_compiled(&self.compiled, source, &self.naming)
    }

    /// Checks that `source` can supply every parameter without keeping the values.
    pub fn check<S>(&self, source: &S) -> Result<()>
    where
        S: ArgumentSource + ?Sized,
    {
        resolve(self.compiled.names(), source, &self.naming).map(drop)
    }
}

pub(crate) fn bind_compiled<S>(
    compiled: &CompiledQuery,
    source: &S,
    naming: &Naming,
) -> Result<BoundQuery>
where
    S: ArgumentSource + ?Sized,
{
    let values = resolve(compiled.names(), source, naming)?;
    Ok(BoundQuery {
        sql: compiled.shared_sql(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, params, Api, Dialect, Error};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_prepared_query_is_send_sync() {
        assert_send_sync::<PreparedQuery>();
        assert_send_sync::<BoundQuery>();
    }

    #[test]
    fn test_prepared_query_placeholder_order() {
        let query = Api::new()
            .prepare_named("SELECT * FROM users WHERE id = :id AND name = :name")
            .unwrap();

        assert_eq!(query.names(), ["id", "name"]);
        assert_eq!(query.sql(), "SELECT * FROM users WHERE id = ? AND name = ?");
    }

    #[test]
    fn test_bind_does_not_rescan() {
        let api = Api::new().with_lexer(':', Dialect::POSTGRES);
        let query = api.prepare_named("SELECT * FROM t WHERE a = :a OR b = :b OR c = :a").unwrap();
        let scans = lexer::scan_count();

        let first = query.bind(&params! { a: 1, b: 2 }).unwrap();
        let second = query.bind(&params! { a: "x", b: "y" }).unwrap();

        assert_eq!(lexer::scan_count(), scans);
        assert_eq!(first.values(), [Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(
            second.values(),
            [
                Value::Text("x".into()),
                Value::Text("y".into()),
                Value::Text("x".into())
            ]
        );
        assert_eq!(first.sql(), "SELECT * FROM t WHERE a = $1 OR b = $2 OR c = $3");
        assert_eq!(first.sql(), second.sql());
    }

    #[test]
    fn test_bind_missing_parameter() {
        let query = Api::new().prepare_named("SELECT :a, :b").unwrap();
        let err = query.bind(&params! { a: 1 }).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "b"));
    }

    #[test]
    fn test_check() {
        let query = Api::new().prepare_named("SELECT :a").unwrap();
        assert!(query.check(&params! { a: 1 }).is_ok());
        assert!(query.check(&params! { b: 1 }).is_err());
    }

    #[test]
    fn test_concurrent_binds() {
        let query = std::sync::Arc::new(Api::new().prepare_named("SELECT :n, :n").unwrap());
        let handles: Vec<_> = (0..4i64)
            .map(|n| {
                let query = std::sync::Arc::clone(&query);
                std::thread::spawn(move || query.bind(&params! { n: n }).unwrap())
            })
            .collect();

        for (n, handle) in handles.into_iter().enumerate() {
            let bound = handle.join().unwrap();
            let n = n as i64;
            assert_eq!(bound.values(), [Value::Int(n), Value::Int(n)]);
        }
    }
}
