use deadpool_sqlite::rusqlite;
use thiserror::Error;

/// Uniform failure surface for every terminal call.
///
/// Each variant corresponds to one stage of the execution protocol, so a
/// caller can tell whether the pool, the SQL text, a bound parameter, the
/// statement itself, or its own read callback was at fault. Resource cleanup
/// (cursor, prepared statement, connection) has always completed by the time
/// one of these is returned.
#[derive(Debug, Error)]
pub enum SqlFluentError {
    /// The pool could not hand out a connection.
    #[error("connection acquisition failed: {0}")]
    Acquire(#[from] deadpool_sqlite::PoolError),

    /// The SQL text was rejected at prepare time.
    #[error("statement preparation failed: {0}")]
    Prepare(#[source] rusqlite::Error),

    /// A queued parameter could not be bound to its placeholder.
    #[error("binding parameter {index} failed: {source}")]
    Bind {
        index: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// The driver reported a failure while executing the statement.
    #[error("statement execution failed: {0}")]
    Execute(#[source] rusqlite::Error),

    /// A column or row could not be read from the result cursor.
    #[error("row read failed: {0}")]
    Read(#[source] rusqlite::Error),

    /// A caller-supplied read callback signalled an error.
    #[error("callback error: {0}")]
    Callback(String),

    /// Pool or database configuration was invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The connection worker failed outside of statement execution.
    #[error("connection error: {0}")]
    Connection(String),
}

impl SqlFluentError {
    /// Build a [`SqlFluentError::Callback`] from any displayable error.
    ///
    /// Intended for read callbacks that need to abort row consumption:
    /// the error propagates out of the terminal call after cleanup.
    pub fn callback(message: impl std::fmt::Display) -> Self {
        SqlFluentError::Callback(message.to_string())
    }
}

impl From<deadpool_sqlite::InteractError> for SqlFluentError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        SqlFluentError::Connection(format!("connection worker failed: {err}"))
    }
}
