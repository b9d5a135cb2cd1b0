//! Implements a SQLite backed record store.
//!
//! Each entity table is stored as `(position INTEGER PRIMARY KEY, cells
//! TEXT)` with the cells serialized as a JSON array of strings. This keeps
//! the sheet semantics (ordered rows, positional identity, ragged column
//! counts) intact while giving the application a single durable file.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    store::{RecordStore, Row, Table},
};

/// Stores rows for every entity kind in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    connection: Arc<Mutex<Connection>>,
}

/// Create the table for every entity kind if it does not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if table creation fails.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    for table in Table::ALL {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (
                    position INTEGER PRIMARY KEY,
                    cells TEXT NOT NULL
                )",
                table.name()
            ),
            (),
        )?;
    }

    Ok(())
}

impl SqliteRecordStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn row_count(connection: &Connection, table: Table) -> Result<usize, Error> {
        let count: i64 = connection
            .prepare(&format!("SELECT COUNT(*) FROM \"{}\"", table.name()))?
            .query_row((), |row| row.get(0))?;

        Ok(count as usize)
    }

    fn encode_cells(row: &Row) -> Result<String, Error> {
        serde_json::to_string(row).map_err(|error| Error::SerializationError(error.to_string()))
    }

    fn decode_cells(cells: &str) -> Result<Row, Error> {
        serde_json::from_str(cells)
            .map_err(|error| Error::SerializationError(error.to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    /// Retrieve every row of `table` in position order.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error, or an
    /// [Error::SerializationError] if a stored row is corrupt.
    fn list_rows(&self, table: Table) -> Result<Vec<Row>, Error> {
        self.lock()?
            .prepare(&format!(
                "SELECT cells FROM \"{}\" ORDER BY position ASC",
                table.name()
            ))?
            .query_map((), |row| row.get::<_, String>(0))?
            .map(|maybe_cells| {
                maybe_cells
                    .map_err(Error::from)
                    .and_then(|cells| Self::decode_cells(&cells))
            })
            .collect()
    }

    fn append_row(&mut self, table: Table, row: Row) -> Result<usize, Error> {
        let connection = self.lock()?;
        let position = Self::row_count(&connection, table)? + 1;

        connection.execute(
            &format!(
                "INSERT INTO \"{}\" (position, cells) VALUES (?1, ?2)",
                table.name()
            ),
            (position as i64, Self::encode_cells(&row)?),
        )?;

        Ok(position)
    }

    fn append_rows(&mut self, table: Table, rows: Vec<Row>) -> Result<Vec<usize>, Error> {
        let connection = self.lock()?;
        let start = Self::row_count(&connection, table)? + 1;

        let tx = connection.unchecked_transaction()?;
        let mut positions = Vec::with_capacity(rows.len());

        {
            let mut statement = tx.prepare(&format!(
                "INSERT INTO \"{}\" (position, cells) VALUES (?1, ?2)",
                table.name()
            ))?;

            for (offset, row) in rows.iter().enumerate() {
                let position = start + offset;
                statement.execute((position as i64, Self::encode_cells(row)?))?;
                positions.push(position);
            }
        }

        tx.commit()?;
        Ok(positions)
    }

    fn update_cell(
        &mut self,
        table: Table,
        position: usize,
        column: usize,
        value: String,
    ) -> Result<(), Error> {
        let connection = self.lock()?;

        let cells: String = connection
            .prepare(&format!(
                "SELECT cells FROM \"{}\" WHERE position = ?1",
                table.name()
            ))?
            .query_row((position as i64,), |row| row.get(0))
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::RowOutOfRange(position),
                error => error.into(),
            })?;

        let mut row = Self::decode_cells(&cells)?;
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value;

        connection.execute(
            &format!(
                "UPDATE \"{}\" SET cells = ?1 WHERE position = ?2",
                table.name()
            ),
            (Self::encode_cells(&row)?, position as i64),
        )?;

        Ok(())
    }

    /// Delete the row at `position`, shifting the rows below it up by one.
    ///
    /// # Errors
    /// Returns [Error::RowOutOfRange] if `position` does not refer to an
    /// existing row, or an [Error::SqlError] for any other SQL error.
    fn delete_row(&mut self, table: Table, position: usize) -> Result<(), Error> {
        let connection = self.lock()?;

        let tx = connection.unchecked_transaction()?;
        let deleted = tx.execute(
            &format!("DELETE FROM \"{}\" WHERE position = ?1", table.name()),
            (position as i64,),
        )?;

        if deleted == 0 {
            return Err(Error::RowOutOfRange(position));
        }

        tx.execute(
            &format!(
                "UPDATE \"{}\" SET position = position - 1 WHERE position > ?1",
                table.name()
            ),
            (position as i64,),
        )?;

        tx.commit()?;
        Ok(())
    }

    fn ensure_columns(&mut self, table: Table, min_columns: usize) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows: Vec<(i64, String)> = connection
            .prepare(&format!(
                "SELECT position, cells FROM \"{}\"",
                table.name()
            ))?
            .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        for (position, cells) in rows {
            let mut row = Self::decode_cells(&cells)?;

            if row.len() < min_columns {
                row.resize(min_columns, String::new());
                connection.execute(
                    &format!(
                        "UPDATE \"{}\" SET cells = ?1 WHERE position = ?2",
                        table.name()
                    ),
                    (Self::encode_cells(&row)?, position),
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod sqlite_record_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        store::{RecordStore, Table},
    };

    use super::{SqliteRecordStore, initialize};

    fn get_store() -> SqliteRecordStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteRecordStore::new(Arc::new(Mutex::new(connection)))
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn append_assigns_sequential_positions() {
        let mut store = get_store();

        let first = store.append_row(Table::Config, row(&["a", "1"])).unwrap();
        let second = store.append_row(Table::Config, row(&["b", "2"])).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn append_rows_returns_all_positions() {
        let mut store = get_store();
        store.append_row(Table::Expenses, row(&["existing"])).unwrap();

        let positions = store
            .append_rows(Table::Expenses, vec![row(&["a"]), row(&["b"]), row(&["c"])])
            .unwrap();

        assert_eq!(positions, vec![2, 3, 4]);
    }

    #[test]
    fn list_rows_preserves_insertion_order() {
        let mut store = get_store();
        store.append_row(Table::Transfers, row(&["1", "first"])).unwrap();
        store.append_row(Table::Transfers, row(&["2", "second"])).unwrap();

        let rows = store.list_rows(Table::Transfers).unwrap();

        assert_eq!(rows, vec![row(&["1", "first"]), row(&["2", "second"])]);
    }

    #[test]
    fn update_cell_overwrites_single_column() {
        let mut store = get_store();
        store
            .append_row(Table::NetWorth, row(&["BBVA", "100", "yesterday"]))
            .unwrap();

        store
            .update_cell(Table::NetWorth, 1, 1, "250.5".to_string())
            .unwrap();

        let rows = store.list_rows(Table::NetWorth).unwrap();
        assert_eq!(rows[0], row(&["BBVA", "250.5", "yesterday"]));
    }

    #[test]
    fn update_cell_fails_on_missing_row() {
        let mut store = get_store();

        let result = store.update_cell(Table::NetWorth, 3, 0, "x".to_string());

        assert_eq!(result, Err(Error::RowOutOfRange(3)));
    }

    #[test]
    fn delete_row_shifts_later_rows_up() {
        let mut store = get_store();
        store.append_row(Table::Investments, row(&["1"])).unwrap();
        store.append_row(Table::Investments, row(&["2"])).unwrap();
        store.append_row(Table::Investments, row(&["3"])).unwrap();

        store.delete_row(Table::Investments, 2).unwrap();

        let rows = store.list_rows(Table::Investments).unwrap();
        assert_eq!(rows, vec![row(&["1"]), row(&["3"])]);

        // The shifted row is addressable at its new position.
        store.update_cell(Table::Investments, 2, 0, "4".to_string()).unwrap();
        assert_eq!(store.list_rows(Table::Investments).unwrap()[1], row(&["4"]));
    }

    #[test]
    fn delete_row_fails_on_out_of_range_position() {
        let mut store = get_store();
        store.append_row(Table::Expenses, row(&["only"])).unwrap();

        assert_eq!(
            store.delete_row(Table::Expenses, 2),
            Err(Error::RowOutOfRange(2))
        );
        assert_eq!(
            store.delete_row(Table::Expenses, 0),
            Err(Error::RowOutOfRange(0))
        );
    }

    #[test]
    fn ensure_columns_pads_short_rows() {
        let mut store = get_store();
        store.append_row(Table::Expenses, row(&["ts", "2024-01-01"])).unwrap();

        store.ensure_columns(Table::Expenses, 12).unwrap();

        let rows = store.list_rows(Table::Expenses).unwrap();
        assert_eq!(rows[0].len(), 12);
        assert_eq!(rows[0][1], "2024-01-01");
        assert_eq!(rows[0][11], "");
    }
}
