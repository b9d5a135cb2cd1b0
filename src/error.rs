//! Defines the app level error type and its conversion from SQL errors.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The table for an entity kind is missing from the database.
    ///
    /// The shipped SQLite store creates its tables up front, so this should
    /// only occur when pointing the server at a database file created by
    /// something else.
    #[error("the table \"{0}\" could not be found")]
    TableMissing(String),

    /// A row position outside the current extent of a table was used to
    /// update or delete a row.
    #[error("row {0} is out of range")]
    RowOutOfRange(usize),

    /// Tried to update an expense row that does not exist.
    #[error("tried to update an expense that is not in the store")]
    UpdateMissingExpense,

    /// Tried to delete an expense row that does not exist.
    #[error("tried to delete an expense that is not in the store")]
    DeleteMissingExpense,

    /// Tried to update an investment that does not exist.
    #[error("tried to update an investment that is not in the store")]
    UpdateMissingInvestment,

    /// Tried to delete an investment that does not exist.
    #[error("tried to delete an investment that is not in the store")]
    DeleteMissingInvestment,

    /// The request named an action that is not part of the API.
    #[error("unrecognized action: {0}")]
    UnrecognizedAction(String),

    /// The request payload could not be parsed for the named action.
    #[error("invalid payload for action {0}: {1}")]
    InvalidPayload(String, String),

    /// A value could not be serialized to or deserialized from JSON, either
    /// a row's stored cells or a response payload.
    #[error("could not serialize as JSON: {0}")]
    SerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(_, Some(ref desc)) if desc.contains("no such table") => {
                let table = desc
                    .rsplit(' ')
                    .next()
                    .unwrap_or_default()
                    .trim_end_matches(':')
                    .to_owned();

                Error::TableMissing(table)
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
