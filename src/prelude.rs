//! Convenient imports for common functionality.

pub use crate::{
    Database, DatabaseBuilder, QueryCursor, SqlFluentError, SqlRow, SqlValue, Statement, Table,
};
