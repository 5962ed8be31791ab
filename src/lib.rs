//! # sqlx-named-params
//!
//! Named placeholders for SQLx. Write `:user_id` in your SQL, bind values from
//! a struct or a map, and run the query with the positional syntax your driver
//! expects (`$1, $2, ...` or `?`).
//!
//! ## Features
//!
//! - **Quote-aware rewriting**: placeholders inside string literals, quoted
//!   identifiers and comments are left alone, and `::` casts survive; MySQL
//!   backslash escapes and `#` comments are honoured on the MySQL dialect
//! - **Dialects**: sequential (`$1`, `@p1`, `:1`) or fixed (`?`) markers
//! - **Struct and map arguments**: register a struct with [`record!`], or pass
//!   a `HashMap`/`BTreeMap` (see [`params!`])
//! - **Prepared queries**: scan the SQL once, bind it many times
//! - **Generic executor support**: pools, connections and transactions through
//!   `sqlx::Executor` for MySQL (default), PostgreSQL and SQLite
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! sqlx = { version = "0.8", features = ["mysql", "runtime-tokio"] }
//! sqlx-named-params = "0.1"
//! ```
//!
//! ## Examples
//!
//! ### Compiling a query
//!
//! ```rust
//! use sqlx_named_params::{params, Api, Dialect, Value};
//!
//! let api = Api::new().with_lexer(':', Dialect::POSTGRES);
//! let bound = api.named_query_params(
//!     "SELECT * FROM users WHERE id = :id OR parent_id = :id AND note <> ':id'",
//!     &params! { id: 7 },
//! )?;
//!
//! assert_eq!(
//!     bound.sql(),
//!     "SELECT * FROM users WHERE id = $1 OR parent_id = $2 AND note <> ':id'"
//! );
//! assert_eq!(bound.values(), [Value::Int(7), Value::Int(7)]);
//! # Ok::<(), sqlx_named_params::Error>(())
//! ```
//!
//! ### Executing with struct arguments
//!
//! ```rust,no_run
//! use sqlx::{FromRow, MySqlPool};
//! use sqlx_named_params::{driver::mysql, record};
//!
//! #[derive(FromRow)]
//! struct User {
//!     #[sqlx(rename = "user_id")]
//!     id: String,
//!     full_name: String,
//!     age: i32,
//! }
//!
//! record!(User {
//!     id(db = "user_id"),
//!     full_name,
//!     age,
//! });
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = MySqlPool::connect("mysql://localhost/test").await?;
//! let api = mysql::Api::default();
//!
//! let user = User { id: "billy".into(), full_name: "Billy Bob".into(), age: 50 };
//! api.exec_named(
//!     &pool,
//!     "INSERT INTO users (user_id, full_name, age) VALUES (:user_id, :full_name, :age)",
//!     &user,
//! )
//! .await?;
//!
//! let found: User = api
//!     .get_named(&pool, "SELECT user_id, full_name, age FROM users WHERE user_id = :user_id", &user)
//!     .await?;
//! println!("{} is {}", found.full_name, found.age);
//! # Ok(())
//! # }
//! ```
//!
//! ### Prepared queries in a transaction
//!
//! ```rust,no_run
//! use sqlx::MySqlPool;
//! use sqlx_named_params::{driver::mysql, params, Api};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let pool = MySqlPool::connect("mysql://localhost/test").await?;
//! let debit = Api::new().prepare_named(
//!     "UPDATE accounts SET balance = balance - :amount WHERE id = :id",
//! )?;
//!
//! let mut tx = pool.begin().await?;
//! for (id, amount) in [(1, 100), (2, 50)] {
//!     let bound = debit.bind(&params! { id: id, amount: amount })?;
//!     mysql::execute(&mut *tx, &bound).await?;
//! }
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! 1. **Lex**: split the SQL into literal text and `:name` placeholders in one pass
//! 2. **Compile**: replace each placeholder occurrence with the dialect's marker
//!    and record its name, so repeated names appear once per occurrence
//! 3. **Resolve**: look every recorded name up in the argument source, in order
//! 4. **Execute**: bind the values to a fresh SQLx query and run it
//!
//! ## License
//!
//! Licensed under either of Apache License, Version 2.0 or MIT license at your option.

pub mod api;
pub mod args;
pub mod compile;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod naming;
pub mod prepared;
pub mod value;

pub use api::Api;
pub use args::{resolve, ArgumentSource, FieldDecl, Record};
pub use compile::{compile, compile_with, CompiledQuery, Template};
pub use dialect::Dialect;
pub use error::{Error, Operation, Result};
pub use lexer::Syntax;
pub use naming::{NameMapper, Naming};
pub use prepared::{BoundQuery, PreparedQuery};
pub use value::{TypedValue, Value, ValueKind};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::{params, record};
    pub use crate::{Api, ArgumentSource, BoundQuery, Dialect, PreparedQuery, Syntax, Value};
}
