//! Contains the record store trait and its SQLite implementation.
//!
//! The store is deliberately sheet-shaped rather than relational: each
//! entity kind is an ordered list of rows of string cells, rows are
//! addressed by 1-based position, and deleting a row shifts the rows below
//! it up. This mirrors the spreadsheet the data was migrated from, which
//! the expense operations depend on for positional identity.

mod sqlite;

pub use sqlite::{SqliteRecordStore, initialize};

use crate::Error;

/// A single row of a table: one string cell per column.
pub type Row = Vec<String>;

/// The tables the application stores its entities in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Expense rows, one per installment. See [Table::column_count].
    Expenses,
    /// Net-worth snapshot rows: account name, USD balance, last updated.
    NetWorth,
    /// Investment rows: id, name, principal, rate, frequency, purchase
    /// date, maturity date, origin, notes.
    Investments,
    /// Inter-account transfer rows: id, date, source, destination, amount,
    /// note, savings flag.
    Transfers,
    /// Monthly income rows: month, year, amount.
    MonthlyIncome,
    /// Scalar config rows: key, value.
    Config,
}

impl Table {
    /// Every table, in the order they are created.
    pub const ALL: [Table; 6] = [
        Table::Expenses,
        Table::NetWorth,
        Table::Investments,
        Table::Transfers,
        Table::MonthlyIncome,
        Table::Config,
    ];

    /// The name of the table in the underlying database.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Expenses => "expense",
            Table::NetWorth => "net_worth",
            Table::Investments => "investment",
            Table::Transfers => "transfer",
            Table::MonthlyIncome => "monthly_income",
            Table::Config => "config",
        }
    }

    /// The number of columns in the table's fixed layout.
    pub fn column_count(&self) -> usize {
        match self {
            Table::Expenses => 12,
            Table::NetWorth => 3,
            Table::Investments => 9,
            Table::Transfers => 7,
            Table::MonthlyIncome => 3,
            Table::Config => 2,
        }
    }
}

/// Handles the storage and retrieval of rows for every entity kind.
///
/// Implementations must keep rows ordered and positions 1-based and
/// contiguous: appending a row to a table with `n` rows assigns it position
/// `n + 1`, and deleting a row decrements the position of every row below
/// it.
pub trait RecordStore {
    /// Retrieve every row of `table` in position order.
    fn list_rows(&self, table: Table) -> Result<Vec<Row>, Error>;

    /// Append a single row to `table` and return its assigned position.
    fn append_row(&mut self, table: Table, row: Row) -> Result<usize, Error>;

    /// Append `rows` to `table` in order and return their assigned
    /// positions.
    fn append_rows(&mut self, table: Table, rows: Vec<Row>) -> Result<Vec<usize>, Error>;

    /// Overwrite the cell at `column` (0-based) of the row at `position`
    /// (1-based).
    ///
    /// # Errors
    /// Returns [Error::RowOutOfRange] if `position` does not refer to an
    /// existing row.
    fn update_cell(
        &mut self,
        table: Table,
        position: usize,
        column: usize,
        value: String,
    ) -> Result<(), Error>;

    /// Delete the row at `position` (1-based), shifting later rows up.
    ///
    /// # Errors
    /// Returns [Error::RowOutOfRange] if `position` does not refer to an
    /// existing row.
    fn delete_row(&mut self, table: Table, position: usize) -> Result<(), Error>;

    /// Pad every row of `table` with empty cells up to `min_columns`.
    ///
    /// The legacy sheet grew columns over time, so old rows may be shorter
    /// than the current fixed layout. Writers call this before relying on
    /// the full column count.
    fn ensure_columns(&mut self, table: Table, min_columns: usize) -> Result<(), Error>;
}
