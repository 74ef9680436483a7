//! Connection acquisition and statement preparation for terminal calls.
//!
//! Every terminal call funnels through [`with_prepared`]: one connection is
//! taken from the pool, the SQL text is prepared on it, the caller's action
//! runs against the prepared statement, and both the statement and the
//! connection are released before the outcome is reported. The release is
//! scope-driven, so it holds on the error paths too.

use deadpool_sqlite::{Pool, rusqlite};
use tracing::debug;

use crate::error::SqlFluentError;

/// Acquire a connection, prepare `sql`, and run `action` against it.
///
/// Protocol per call:
/// 1. `pool.get()` — a failure here is fatal to the call, no retry.
/// 2. Prepare the SQL text on the pooled connection's worker thread.
/// 3. Run `action` (parameter replay plus exactly one terminal operation).
/// 4. Drop the prepared statement, then hand the connection back to the pool.
///
/// Steps 2–3 run inside the pool's `interact` closure; the prepared statement
/// cannot outlive it. The pooled object is dropped when this function returns,
/// on success and on every failure kind alike.
pub(crate) async fn with_prepared<T, F>(
    pool: &Pool,
    sql: String,
    action: F,
) -> Result<T, SqlFluentError>
where
    F: FnOnce(&mut rusqlite::Statement<'_>) -> Result<T, SqlFluentError> + Send + 'static,
    T: Send + 'static,
{
    let conn = pool.get().await?;
    debug!(sql = %sql, "executing statement");
    let outcome = conn
        .interact(move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(SqlFluentError::Prepare)?;
            action(&mut stmt)
        })
        .await?;
    drop(conn);
    outcome
}
