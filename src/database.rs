//! Database facade: pool construction, ad-hoc execution, and handle creation.

use std::path::{Path, PathBuf};

use deadpool::managed::PoolConfig;
use deadpool_sqlite::{Config as SqliteConfig, Pool, Runtime};
use tracing::debug;

use crate::cursor::QueryCursor;
use crate::error::SqlFluentError;
use crate::statement::Statement;
use crate::table::Table;

/// A named handle to one SQLite database behind a connection pool.
///
/// The facade holds no connection itself; every operation borrows one from
/// the pool for its duration. Cloning is cheap and clones share the pool.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use sql_fluent::Database;
///
/// let db = Database::open("players.db").await?;
/// db.table("players")
///     .create_if_not_exists(&["id INTEGER PRIMARY KEY", "name TEXT NOT NULL"])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    pool: Pool,
}

/// Builder for [`Database`] when the defaults need adjusting.
#[derive(Debug)]
pub struct DatabaseBuilder {
    path: PathBuf,
    name: Option<String>,
    max_connections: Option<usize>,
}

impl DatabaseBuilder {
    /// Override the database name (defaults to the file stem).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Cap the pool at `max` concurrent connections.
    #[must_use]
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Create the pool and initialize the database file.
    ///
    /// # Errors
    ///
    /// Returns [`SqlFluentError::Config`] if the pool cannot be created and
    /// [`SqlFluentError::Acquire`]/[`SqlFluentError::Connection`] if the
    /// initial pragma setup fails.
    pub async fn open(self) -> Result<Database, SqlFluentError> {
        let name = self
            .name
            .unwrap_or_else(|| file_stem_of(&self.path));
        let mut cfg = SqliteConfig::new(self.path);
        if let Some(max) = self.max_connections {
            cfg.pool = Some(PoolConfig::new(max));
        }
        let pool = cfg
            .create_pool(Runtime::Tokio1)
            .map_err(|e| SqlFluentError::Config(format!("failed to create pool: {e}")))?;

        // WAL keeps concurrent readers from blocking behind the writer.
        {
            let conn = pool.get().await?;
            conn.interact(|conn| {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(SqlFluentError::Execute)
            })
            .await??;
        }

        debug!(name = %name, "database opened");
        Ok(Database { name, pool })
    }
}

impl Database {
    /// Open a database file with default pool settings; the name is taken
    /// from the file stem.
    ///
    /// # Errors
    ///
    /// See [`DatabaseBuilder::open`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SqlFluentError> {
        Self::builder(path).open().await
    }

    /// Start configuring a database handle for `path`.
    pub fn builder(path: impl AsRef<Path>) -> DatabaseBuilder {
        DatabaseBuilder {
            path: path.as_ref().to_path_buf(),
            name: None,
            max_connections: None,
        }
    }

    /// The database's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Build a statement for this database from finished SQL text.
    #[must_use]
    pub fn statement(&self, sql: impl Into<String>) -> Statement {
        Statement::new(self.pool.clone(), sql)
    }

    /// A handle to the table called `name` (which need not exist yet).
    #[must_use]
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::new(name, self.clone())
    }

    /// Execute ad-hoc SQL text, returning whether it produced a result set.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn execute(&self, sql: impl Into<String>) -> Result<bool, SqlFluentError> {
        self.statement(sql).execute().await
    }

    /// Execute ad-hoc DML text, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn execute_update(&self, sql: impl Into<String>) -> Result<usize, SqlFluentError> {
        self.statement(sql).execute_update().await
    }

    /// [`execute_update`](Database::execute_update) with a 64-bit count.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn execute_large_update(
        &self,
        sql: impl Into<String>,
    ) -> Result<u64, SqlFluentError> {
        self.statement(sql).execute_large_update().await
    }

    /// Execute ad-hoc query text, handing the open cursor to `reader` once.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind, including errors returned by `reader`.
    pub async fn execute_query<T, F>(
        &self,
        sql: impl Into<String>,
        reader: F,
    ) -> Result<T, SqlFluentError>
    where
        F: FnOnce(&mut QueryCursor<'_>) -> Result<T, SqlFluentError> + Send + 'static,
        T: Send + 'static,
    {
        self.statement(sql).execute_query(reader).await
    }

    /// Close the pool. In-flight calls finish; subsequent terminal calls fail
    /// with [`SqlFluentError::Acquire`].
    pub fn close(&self) {
        self.pool.close();
    }
}

fn file_stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
