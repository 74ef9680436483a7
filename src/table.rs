//! Table handles: fixed-template SQL text generation for one named table.
//!
//! Templates interpolate the table name, column lists, and caller-supplied
//! clause fragments literally. Nothing is parsed or validated here; a
//! malformed fragment surfaces as a prepare-time error from the driver.

use crate::error::SqlFluentError;
use crate::database::Database;
use crate::statement::Statement;

/// A handle to one table of a [`Database`].
///
/// DDL methods (`create`, `drop_table`, column alterations, `clear`) execute
/// immediately. DML builders (`insert*`, `update*`, `delete`, `select*`)
/// return a [`Statement`] so values can be bound before execution; builders
/// that take a column list or count emit a matching number of `?`
/// placeholders, keeping the text aligned with a subsequent bind sequence of
/// that length.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    database: Database,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>, database: Database) -> Self {
        Self {
            name: name.into(),
            database,
        }
    }

    /// The table's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The database this table belongs to.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// `CREATE TABLE` with the given column definitions.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn create(&self, columns: &[&str]) -> Result<(), SqlFluentError> {
        let sql = format!("CREATE TABLE {} ({});", self.name, columns.join(", "));
        self.database.execute(sql).await.map(|_| ())
    }

    /// `CREATE TABLE IF NOT EXISTS` with the given column definitions.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn create_if_not_exists(&self, columns: &[&str]) -> Result<(), SqlFluentError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            columns.join(", ")
        );
        self.database.execute(sql).await.map(|_| ())
    }

    /// `DROP TABLE`.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn drop_table(&self) -> Result<(), SqlFluentError> {
        let sql = format!("DROP TABLE {};", self.name);
        self.database.execute(sql).await.map(|_| ())
    }

    /// Rename the table; the handle tracks the new name on success.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn rename(&mut self, new_name: impl Into<String>) -> Result<(), SqlFluentError> {
        let new_name = new_name.into();
        let sql = format!("ALTER TABLE {} RENAME TO {};", self.name, new_name);
        self.database.execute(sql).await?;
        self.name = new_name;
        Ok(())
    }

    /// Delete every row, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn clear(&self) -> Result<usize, SqlFluentError> {
        let sql = format!("DELETE FROM {};", self.name);
        self.database.execute_update(sql).await
    }

    /// `ALTER TABLE … ADD` with a full column definition.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn add_column(&self, definition: &str) -> Result<(), SqlFluentError> {
        let sql = format!("ALTER TABLE {} ADD {};", self.name, definition);
        self.database.execute(sql).await.map(|_| ())
    }

    /// `ALTER TABLE … DROP COLUMN`.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn drop_column(&self, column: &str) -> Result<(), SqlFluentError> {
        let sql = format!("ALTER TABLE {} DROP COLUMN {};", self.name, column);
        self.database.execute(sql).await.map(|_| ())
    }

    /// `ALTER TABLE … RENAME COLUMN`.
    ///
    /// # Errors
    ///
    /// Any [`SqlFluentError`] kind raised by the terminal call.
    pub async fn rename_column(&self, old: &str, new: &str) -> Result<(), SqlFluentError> {
        let sql = format!("ALTER TABLE {} RENAME COLUMN {} TO {}", self.name, old, new);
        self.database.execute(sql).await.map(|_| ())
    }

    /// `INSERT INTO <table> <clause>` with a caller-written clause.
    #[must_use]
    pub fn insert(&self, clause: &str) -> Statement {
        self.statement(format!("INSERT INTO {} {};", self.name, clause))
    }

    /// `INSERT INTO <table> (cols…) VALUES (?, …)` with one placeholder per
    /// column.
    #[must_use]
    pub fn insert_into(&self, columns: &[&str]) -> Statement {
        self.statement(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.name,
            columns.join(", "),
            placeholders(columns.len())
        ))
    }

    /// `INSERT INTO <table> VALUES (v1, v2, …)` with literal values.
    #[must_use]
    pub fn insert_values(&self, values: &[&str]) -> Statement {
        self.statement(format!(
            "INSERT INTO {} VALUES ({});",
            self.name,
            values.join(", ")
        ))
    }

    /// `INSERT INTO <table> VALUES (?, …)` with `count` placeholders.
    #[must_use]
    pub fn insert_positional(&self, count: usize) -> Statement {
        self.statement(format!(
            "INSERT INTO {} VALUES ({});",
            self.name,
            placeholders(count)
        ))
    }

    /// `UPDATE <table> SET <clause>` with a caller-written clause.
    #[must_use]
    pub fn update(&self, clause: &str) -> Statement {
        self.statement(format!("UPDATE {} SET {}", self.name, clause))
    }

    /// `UPDATE <table> SET a1, a2, … <clause>`.
    #[must_use]
    pub fn update_where(&self, assignments: &[&str], clause: &str) -> Statement {
        self.statement(format!(
            "UPDATE {} SET {} {}",
            self.name,
            assignments.join(", "),
            clause
        ))
    }

    /// `DELETE FROM <table> <clause>`.
    #[must_use]
    pub fn delete(&self, clause: &str) -> Statement {
        self.statement(format!("DELETE FROM {} {};", self.name, clause))
    }

    /// `SELECT * FROM <table> <clause>`.
    #[must_use]
    pub fn select(&self, clause: &str) -> Statement {
        self.statement(format!("SELECT * FROM {} {};", self.name, clause))
    }

    /// `SELECT cols… FROM <table> <clause>`.
    #[must_use]
    pub fn select_columns(&self, columns: &[&str], clause: &str) -> Statement {
        self.statement(format!(
            "SELECT {} FROM {} {};",
            columns.join(", "),
            self.name,
            clause
        ))
    }

    /// `SELECT * FROM <table>`.
    #[must_use]
    pub fn select_all(&self) -> Statement {
        self.statement(format!("SELECT * FROM {};", self.name))
    }

    /// `SELECT cols… FROM <table>`.
    #[must_use]
    pub fn select_all_columns(&self, columns: &[&str]) -> Statement {
        self.statement(format!(
            "SELECT {} FROM {};",
            columns.join(", "),
            self.name
        ))
    }

    fn statement(&self, sql: String) -> Statement {
        self.database.statement(sql)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
