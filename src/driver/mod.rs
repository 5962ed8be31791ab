//! Running bound queries on sqlx executors.
//!
//! Each enabled backend gets a module with the same surface: free functions
//! taking a [`BoundQuery`](crate::BoundQuery) (for example one produced by
//! [`PreparedQuery::bind`](crate::PreparedQuery::bind)), and an `Api` that
//! compiles, binds and runs a named query in one call. Any
//! `sqlx::Executor` works: pools, connections and `&mut *transaction`.

mod rows;

pub use rows::Rows;

#[cfg(any(feature = "mysql", feature = "postgres", feature = "sqlite"))]
macro_rules! bind_values {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                $crate::Value::Null(kind) => match kind {
                    $crate::ValueKind::Bool => query.bind(None::<bool>),
                    $crate::ValueKind::Int => query.bind(None::<i64>),
                    $crate::ValueKind::Float => query.bind(None::<f64>),
                    $crate::ValueKind::Text => query.bind(None::<&str>),
                    $crate::ValueKind::Bytes => query.bind(None::<&[u8]>),
                },
                $crate::Value::Bool(v) => query.bind(*v),
                $crate::Value::Int(v) => query.bind(*v),
                $crate::Value::Float(v) => query.bind(*v),
                $crate::Value::Text(v) => query.bind(v.as_str()),
                $crate::Value::Bytes(v) => query.bind(v.as_slice()),
            };
        }
        query
    }};
}

macro_rules! sqlx_driver {
    (
        $(#[$meta:meta])*
        $module:ident {
            database: $db:ty,
            row: $row:ty,
            result: $result:ty,
            dialect: $dialect:expr,
            syntax: $syntax:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        pub mod $module {
            use sqlx::{Executor, FromRow};

            use crate::driver::Rows;
            use crate::{ArgumentSource, BoundQuery, Dialect, Error, Operation, Result, Syntax};

            /// Placeholder syntax this backend expects.
            pub const DIALECT: Dialect = $dialect;

            /// Quoting rules of this backend's SQL.
            pub const SYNTAX: Syntax = $syntax;

            /// Executes a statement and returns the driver's result summary.
            pub async fn execute<'e, E>(executor: E, query: &BoundQuery) -> Result<$result>
            where
                E: Executor<'e, Database = $db>,
            {
                tracing::debug!(sql = query.sql(), params = query.values().len(), "exec");
                let q = bind_values!(sqlx::query::<$db>(query.sql()), query.values());
                q.execute(executor)
                    .await
                    .map_err(|err| Error::execution(Operation::Exec, err))
            }

            /// Runs a query and returns its rows undecoded.
            ///
            /// [`Rows::columns`] is empty when no rows match.
            pub async fn query<'e, E>(executor: E, query: &BoundQuery) -> Result<Rows<$row>>
            where
                E: Executor<'e, Database = $db>,
            {
                tracing::debug!(sql = query.sql(), params = query.values().len(), "query");
                let q = bind_values!(sqlx::query::<$db>(query.sql()), query.values());
                let rows = q
                    .fetch_all(executor)
                    .await
                    .map_err(|err| Error::execution(Operation::Query, err))?;
                Ok(Rows::new(rows))
            }

            /// Runs a query and decodes every row.
            pub async fn fetch_all<'e, R, E>(executor: E, query: &BoundQuery) -> Result<Vec<R>>
            where
                for<'row> R: FromRow<'row, $row> + Send + Unpin,
                E: Executor<'e, Database = $db>,
            {
                tracing::debug!(sql = query.sql(), params = query.values().len(), "query");
                let q = bind_values!(sqlx::query_as::<$db, R>(query.sql()), query.values());
                q.fetch_all(executor)
                    .await
                    .map_err(|err| Error::execution(Operation::Query, err))
            }

            /// Runs a query and decodes its first row.
            ///
            /// # Errors
            ///
            /// Returns [`Error::NotFound`] if the query returned no rows.
            pub async fn fetch_one<'e, R, E>(executor: E, query: &BoundQuery) -> Result<R>
            where
                for<'row> R: FromRow<'row, $row> + Send + Unpin,
                E: Executor<'e, Database = $db>,
            {
                fetch_optional(executor, query).await?.ok_or(Error::NotFound)
            }

            /// Runs a query and decodes its first row, if any.
            pub async fn fetch_optional<'e, R, E>(
                executor: E,
                query: &BoundQuery,
            ) -> Result<Option<R>>
            where
                for<'row> R: FromRow<'row, $row> + Send + Unpin,
                E: Executor<'e, Database = $db>,
            {
                tracing::debug!(sql = query.sql(), params = query.values().len(), "query");
                let q = bind_values!(sqlx::query_as::<$db, R>(query.sql()), query.values());
                q.fetch_optional(executor)
                    .await
                    .map_err(|err| Error::execution(Operation::Query, err))
            }

            /// Named-query front end for this backend.
            ///
            /// Wraps a core [`Api`](crate::Api); the default one uses [`DIALECT`]
            /// and [`SYNTAX`].
            #[derive(Debug, Clone)]
            pub struct Api {
                inner: crate::Api,
            }

            impl Default for Api {
                fn default() -> Self {
                    Self::new(crate::Api::new().with_lexer(':', DIALECT).with_syntax(SYNTAX))
                }
            }

            impl Api {
                pub fn new(inner: crate::Api) -> Self {
                    Self { inner }
                }

                pub fn inner(&self) -> &crate::Api {
                    &self.inner
                }

                /// Executes a named statement, taking parameter values from `arg`.
                pub async fn exec_named<'e, E, S>(
                    &self,
                    executor: E,
                    query: &str,
                    arg: &S,
                ) -> Result<$result>
                where
                    E: Executor<'e, Database = $db>,
                    S: ArgumentSource + ?Sized,
                {
                    let bound = self.inner.named_query_params(query, arg)?;
                    execute(executor, &bound).await
                }

                /// Runs a named query and returns its rows undecoded.
                ///
                /// [`Rows::columns`] is empty when no rows match.
                pub async fn query_named<'e, E, S>(
                    &self,
                    executor: E,
                    query: &str,
                    arg: &S,
                ) -> Result<Rows<$row>>
                where
                    E: Executor<'e, Database = $db>,
                    S: ArgumentSource + ?Sized,
                {
                    let bound = self.inner.named_query_params(query, arg)?;
                    self::query(executor, &bound).await
                }

                /// Runs a named query and decodes every row.
                pub async fn select_named<'e, R, E, S>(
                    &self,
                    executor: E,
                    query: &str,
                    arg: &S,
                ) -> Result<Vec<R>>
                where
                    for<'row> R: FromRow<'row, $row> + Send + Unpin,
                    E: Executor<'e, Database = $db>,
                    S: ArgumentSource + ?Sized,
                {
                    let bound = self.inner.named_query_params(query, arg)?;
                    fetch_all(executor, &bound).await
                }

                /// Runs a named query that must return a row.
                ///
                /// # Errors
                ///
                /// Returns [`Error::NotFound`] if the query returned no rows.
                pub async fn get_named<'e, R, E, S>(
                    &self,
                    executor: E,
                    query: &str,
                    arg: &S,
                ) -> Result<R>
                where
                    for<'row> R: FromRow<'row, $row> + Send + Unpin,
                    E: Executor<'e, Database = $db>,
                    S: ArgumentSource + ?Sized,
                {
                    let bound = self.inner.named_query_params(query, arg)?;
                    fetch_one(executor, &bound).await
                }
            }
        }
    };
}

sqlx_driver! {
    /// MySQL and MariaDB.
    #[cfg(feature = "mysql")]
    mysql {
        database: sqlx::mysql::MySql,
        row: sqlx::mysql::MySqlRow,
        result: sqlx::mysql::MySqlQueryResult,
        dialect: Dialect::MYSQL,
        syntax: Syntax::MYSQL,
    }
}

sqlx_driver! {
    /// PostgreSQL.
    #[cfg(feature = "postgres")]
    postgres {
        database: sqlx::postgres::Postgres,
        row: sqlx::postgres::PgRow,
        result: sqlx::postgres::PgQueryResult,
        dialect: Dialect::POSTGRES,
        syntax: Syntax::STANDARD,
    }
}

sqlx_driver! {
    /// SQLite.
    #[cfg(feature = "sqlite")]
    sqlite {
        database: sqlx::sqlite::Sqlite,
        row: sqlx::sqlite::SqliteRow,
        result: sqlx::sqlite::SqliteQueryResult,
        dialect: Dialect::SQLITE,
        syntax: Syntax::STANDARD,
    }
}

#[cfg(test)]
mod tests {
    use crate::Dialect;

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_default_api() {
        let api = super::mysql::Api::default();
        assert_eq!(api.inner().dialect(), Dialect::MYSQL);
        assert_eq!(api.inner().delimiter(), ':');
        assert_eq!(super::mysql::DIALECT, Dialect::MYSQL);
        assert_eq!(api.inner().syntax(), crate::Syntax::MYSQL);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_postgres_default_api() {
        let api = super::postgres::Api::default();
        assert_eq!(api.inner().dialect(), Dialect::POSTGRES);
        let bound = api
            .inner()
            .named_query_params("SELECT :a, :b", &crate::params! { a: 1, b: 2 })
            .unwrap();
        assert_eq!(bound.sql(), "SELECT $1, $2");
        assert_eq!(api.inner().syntax(), crate::Syntax::STANDARD);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_default_api() {
        let api = super::sqlite::Api::default();
        assert_eq!(api.inner().syntax(), crate::Syntax::STANDARD);
        let bound = api
            .inner()
            .named_query_params(r"SELECT 'C:\', :a # 1", &crate::params! { a: 1 })
            .unwrap();
        assert_eq!(bound.sql(), r"SELECT 'C:\', ? # 1");
    }
}
