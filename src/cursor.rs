//! Read-side adapters over the driver's forward-only result cursor.

use deadpool_sqlite::rusqlite;

use crate::error::SqlFluentError;
use crate::value::SqlValue;

/// A forward-only, single-pass cursor over the rows of one query.
///
/// Handed to the callback of [`Statement::execute_query`]; the callback
/// decides how far to advance it. The cursor is closed when the terminal call
/// returns, whether or not the callback succeeded, and cannot be restarted.
///
/// [`Statement::execute_query`]: crate::Statement::execute_query
pub struct QueryCursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
}

impl<'stmt> QueryCursor<'stmt> {
    pub(crate) fn new(rows: rusqlite::Rows<'stmt>) -> Self {
        Self { rows }
    }

    /// Advance to the next row, returning `None` once the result is exhausted.
    ///
    /// The returned [`SqlRow`] borrows the cursor; drop it before advancing
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`SqlFluentError::Read`] if the driver fails while stepping.
    pub fn advance(&mut self) -> Result<Option<SqlRow<'_>>, SqlFluentError> {
        match self.rows.next() {
            Ok(Some(row)) => Ok(Some(SqlRow { row })),
            Ok(None) => Ok(None),
            Err(e) => Err(SqlFluentError::Read(e)),
        }
    }
}

/// One result row, positioned under a live cursor.
///
/// Columns can be read positionally (zero-based) or by name; values come back
/// as [`SqlValue`] so callers never handle driver types.
pub struct SqlRow<'a> {
    row: &'a rusqlite::Row<'a>,
}

impl SqlRow<'_> {
    /// Read the column at `index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`SqlFluentError::Read`] if the index is out of range.
    pub fn value(&self, index: usize) -> Result<SqlValue, SqlFluentError> {
        let value_ref = self.row.get_ref(index).map_err(SqlFluentError::Read)?;
        SqlValue::from_sqlite(value_ref)
    }

    /// Read the column called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlFluentError::Read`] if no column has that name.
    pub fn value_named(&self, name: &str) -> Result<SqlValue, SqlFluentError> {
        let value_ref = self.row.get_ref(name).map_err(SqlFluentError::Read)?;
        SqlValue::from_sqlite(value_ref)
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.row.as_ref().column_count()
    }

    /// Column names, in positional order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.row
            .as_ref()
            .column_names()
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}
