//! Fluent statement building and execution over pooled SQLite connections.
//!
//! The crate turns table- and column-level operations into parameterized SQL
//! text, binds values positionally, executes against a pooled connection, and
//! exposes results through cursor/row readers. Each terminal call owns its
//! connection for exactly the duration of the call: acquired from the pool,
//! prepared, bindings replayed, executed, and released on every exit path.
//!
//! ```no_run
//! use sql_fluent::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open("players.db").await?;
//! let players = db.table("players");
//! players
//!     .create_if_not_exists(&["id INTEGER PRIMARY KEY", "name TEXT", "coins INTEGER"])
//!     .await?;
//!
//! let mut insert = players.insert_into(&["id", "name", "coins"]);
//! insert.bind_i64(1).bind_text("Alice").bind_i64(100).add_batch();
//! insert.bind_i64(2).bind_text("Bob").bind_i64(200).add_batch();
//! insert.execute_batch().await?;
//!
//! let names = players
//!     .select_all()
//!     .fetch_all_rows(|row| row.value_named("name"))
//!     .await?;
//! # let _ = names;
//! # Ok(())
//! # }
//! ```

mod cursor;
mod database;
mod error;
mod executor;
mod statement;
mod table;
mod value;

pub mod prelude;

pub use cursor::{QueryCursor, SqlRow};
pub use database::{Database, DatabaseBuilder};
pub use error::SqlFluentError;
pub use statement::Statement;
pub use table::Table;
pub use value::SqlValue;

pub use deadpool_sqlite::Pool;
