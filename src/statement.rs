//! The fluent statement builder and its terminal calls.

use chrono::NaiveDateTime;
use deadpool_sqlite::{Pool, rusqlite};
use regex::Regex;
use tracing::debug;

use crate::cursor::{QueryCursor, SqlRow};
use crate::error::SqlFluentError;
use crate::executor;
use crate::value::SqlValue;

/// A deferred unit of work replayed against the prepared statement at
/// execution time. Insertion order is replay order.
#[derive(Debug, Clone)]
enum BindOp {
    /// Bind `value` at one-based placeholder `index`.
    Bind { index: usize, value: SqlValue },
    /// Close the current batch row.
    BatchBoundary,
}

/// A parameterized SQL statement with queued bindings.
///
/// Binding calls chain on `&mut self` and only record work; nothing touches
/// the database until a terminal call (`execute*`, `fetch*`) runs. Each
/// terminal call acquires one pooled connection, prepares the held SQL text,
/// replays every queued binding in order, performs exactly one driver
/// operation, and releases everything before returning.
///
/// Terminal calls do not consume the queued bindings: a second terminal call
/// replays the same sequence again unless [`clear_bindings`] is called first.
/// A `Statement` is meant for single-owner, serial use; distinct statements
/// may execute concurrently since each call owns its own connection.
///
/// ```no_run
/// # use sql_fluent::{Database, SqlFluentError};
/// # async fn demo(db: &Database) -> Result<(), SqlFluentError> {
/// let rows = db
///     .statement("UPDATE players SET coins = ? WHERE name = ?")
///     .bind_i64(100)
///     .bind_text("alice")
///     .execute_update()
///     .await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
///
/// [`clear_bindings`]: Statement::clear_bindings
#[derive(Debug, Clone)]
pub struct Statement {
    pool: Pool,
    sql: String,
    ops: Vec<BindOp>,
    next_index: usize,
}

impl Statement {
    pub(crate) fn new(pool: Pool, sql: impl Into<String>) -> Self {
        Self {
            pool,
            sql: sql.into(),
            ops: Vec::new(),
            next_index: 1,
        }
    }

    /// The SQL text this statement will prepare.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The placeholder index the next value bind will target (one-based).
    #[must_use]
    pub fn next_parameter_index(&self) -> usize {
        self.next_index
    }

    /// Queue `value` for the next placeholder and advance the index.
    ///
    /// There is no upper bound here; binding more values than the SQL text
    /// has placeholders surfaces as a [`SqlFluentError::Bind`] when the
    /// statement executes.
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        let index = self.next_index;
        self.ops.push(BindOp::Bind {
            index,
            value: value.into(),
        });
        self.next_index += 1;
        self
    }

    /// Queue a NULL for the next placeholder.
    pub fn bind_null(&mut self) -> &mut Self {
        self.bind(SqlValue::Null)
    }

    pub fn bind_bool(&mut self, value: bool) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.bind(value.into())
    }

    pub fn bind_i8(&mut self, value: i8) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_i16(&mut self, value: i16) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_i32(&mut self, value: i32) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_f32(&mut self, value: f32) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_f64(&mut self, value: f64) -> &mut Self {
        self.bind(value)
    }

    pub fn bind_blob(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
        self.bind(value.into())
    }

    pub fn bind_timestamp(&mut self, value: NaiveDateTime) -> &mut Self {
        self.bind(value)
    }

    /// Close the current batch row and reset the placeholder index to 1.
    ///
    /// Purely queues; rows run when [`execute_batch`] or
    /// [`execute_large_batch`] is called. The bindings of each row must match
    /// the statement's placeholder count or the driver rejects the row at
    /// execution time.
    ///
    /// [`execute_batch`]: Statement::execute_batch
    /// [`execute_large_batch`]: Statement::execute_large_batch
    pub fn add_batch(&mut self) -> &mut Self {
        self.ops.push(BindOp::BatchBoundary);
        self.next_index = 1;
        self
    }

    /// Rewrite the held SQL text, substituting every match of `pattern`
    /// (a regular expression) with `value`.
    ///
    /// Queued bindings and the placeholder index are untouched, so changing
    /// the placeholder count after bindings are queued leaves row alignment
    /// undefined.
    ///
    /// # Errors
    ///
    /// Returns [`SqlFluentError::Config`] if `pattern` is not a valid regex.
    pub fn replace(&mut self, pattern: &str, value: &str) -> Result<&mut Self, SqlFluentError> {
        let re = Regex::new(pattern).map_err(|e| {
            SqlFluentError::Config(format!("invalid replace pattern {pattern:?}: {e}"))
        })?;
        self.sql = re.replace_all(&self.sql, value).into_owned();
        Ok(self)
    }

    /// Discard all queued bindings and batch boundaries and reset the
    /// placeholder index, making the statement equivalent to a freshly
    /// built one with the same SQL text.
    pub fn clear_bindings(&mut self) {
        self.ops.clear();
        self.next_index = 1;
    }

    /// Execute the statement, returning whether it produced a result set.
    ///
    /// # Errors
    ///
    /// Any of [`SqlFluentError`]'s acquire/prepare/bind/execute kinds.
    pub async fn execute(&self) -> Result<bool, SqlFluentError> {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            replay(stmt, &ops)?;
            if stmt.column_count() > 0 {
                let mut rows = stmt.raw_query();
                rows.next().map_err(SqlFluentError::Execute)?;
                Ok(true)
            } else {
                stmt.raw_execute().map_err(SqlFluentError::Execute)?;
                Ok(false)
            }
        })
        .await
    }

    /// Execute a DML statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Any of [`SqlFluentError`]'s acquire/prepare/bind/execute kinds.
    pub async fn execute_update(&self) -> Result<usize, SqlFluentError> {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            replay(stmt, &ops)?;
            stmt.raw_execute().map_err(SqlFluentError::Execute)
        })
        .await
    }

    /// [`execute_update`] with a 64-bit affected-row count.
    ///
    /// # Errors
    ///
    /// Any of [`SqlFluentError`]'s acquire/prepare/bind/execute kinds.
    ///
    /// [`execute_update`]: Statement::execute_update
    pub async fn execute_large_update(&self) -> Result<u64, SqlFluentError> {
        self.execute_update().await.map(|n| n as u64)
    }

    /// Execute a query and hand the open cursor to `reader` exactly once.
    ///
    /// The reader drives cursor advancement itself and its return value
    /// becomes the call's result. The cursor is closed before this returns,
    /// whether the reader succeeded or failed.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind, including errors returned by `reader`.
    pub async fn execute_query<T, F>(&self, reader: F) -> Result<T, SqlFluentError>
    where
        F: FnOnce(&mut QueryCursor<'_>) -> Result<T, SqlFluentError> + Send + 'static,
        T: Send + 'static,
    {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            replay(stmt, &ops)?;
            let mut cursor = QueryCursor::new(stmt.raw_query());
            reader(&mut cursor)
        })
        .await
    }

    /// Execute a query and read at most the first row.
    ///
    /// `reader` is invoked once if a row exists and not at all otherwise;
    /// rows beyond the first are never touched.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind, including errors returned by `reader`.
    pub async fn fetch_row<T, F>(&self, reader: F) -> Result<Option<T>, SqlFluentError>
    where
        F: FnOnce(&SqlRow<'_>) -> Result<T, SqlFluentError> + Send + 'static,
        T: Send + 'static,
    {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            replay(stmt, &ops)?;
            let mut cursor = QueryCursor::new(stmt.raw_query());
            match cursor.advance()? {
                Some(row) => reader(&row).map(Some),
                None => Ok(None),
            }
        })
        .await
    }

    /// Execute a query and invoke `reader` once per row, in cursor order.
    ///
    /// An empty result yields zero invocations and `Ok(vec![])`. A reader
    /// error aborts the remaining rows and propagates after cleanup.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind, including errors returned by `reader`.
    pub async fn fetch_all_rows<T, F>(&self, mut reader: F) -> Result<Vec<T>, SqlFluentError>
    where
        F: FnMut(&SqlRow<'_>) -> Result<T, SqlFluentError> + Send + 'static,
        T: Send + 'static,
    {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            replay(stmt, &ops)?;
            let mut cursor = QueryCursor::new(stmt.raw_query());
            let mut out = Vec::new();
            while let Some(row) = cursor.advance()? {
                out.push(reader(&row)?);
            }
            Ok(out)
        })
        .await
    }

    /// Execute every queued batch row, returning per-row affected counts.
    ///
    /// Bindings are replayed in order; each batch boundary executes the row
    /// bound so far. Bindings queued after the last [`add_batch`] stay queued
    /// and are not executed. A failure on any row fails the whole call.
    ///
    /// # Errors
    ///
    /// Any of [`SqlFluentError`]'s acquire/prepare/bind/execute kinds.
    ///
    /// [`add_batch`]: Statement::add_batch
    pub async fn execute_batch(&self) -> Result<Vec<usize>, SqlFluentError> {
        let ops = self.ops.clone();
        self.run(move |stmt| {
            let mut counts = Vec::new();
            for op in &ops {
                match op {
                    BindOp::Bind { index, value } => apply_bind(stmt, *index, value)?,
                    BindOp::BatchBoundary => {
                        counts.push(stmt.raw_execute().map_err(SqlFluentError::Execute)?);
                    }
                }
            }
            debug!(rows = counts.len(), "batch executed");
            Ok(counts)
        })
        .await
    }

    /// [`execute_batch`] with 64-bit affected-row counts.
    ///
    /// # Errors
    ///
    /// Any of [`SqlFluentError`]'s acquire/prepare/bind/execute kinds.
    ///
    /// [`execute_batch`]: Statement::execute_batch
    pub async fn execute_large_batch(&self) -> Result<Vec<u64>, SqlFluentError> {
        let counts = self.execute_batch().await?;
        Ok(counts.into_iter().map(|n| n as u64).collect())
    }

    async fn run<T, F>(&self, action: F) -> Result<T, SqlFluentError>
    where
        F: FnOnce(&mut rusqlite::Statement<'_>) -> Result<T, SqlFluentError> + Send + 'static,
        T: Send + 'static,
    {
        executor::with_prepared(&self.pool, self.sql.clone(), action).await
    }
}

/// Replay value bindings against a prepared statement, skipping batch
/// boundaries. A later bind at the same index overwrites the earlier one.
fn replay(stmt: &mut rusqlite::Statement<'_>, ops: &[BindOp]) -> Result<(), SqlFluentError> {
    for op in ops {
        if let BindOp::Bind { index, value } = op {
            apply_bind(stmt, *index, value)?;
        }
    }
    Ok(())
}

fn apply_bind(
    stmt: &mut rusqlite::Statement<'_>,
    index: usize,
    value: &SqlValue,
) -> Result<(), SqlFluentError> {
    stmt.raw_bind_parameter(index, value.to_sqlite())
        .map_err(|source| SqlFluentError::Bind { index, source })
}
