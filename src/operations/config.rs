//! The scalar config operations. The config table holds one key/value row
//! per setting; the only known setting is the dollars held as savings.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::parse_amount,
    operations::cell,
    store::{RecordStore, Table},
};

const COL_KEY: usize = 0;
const COL_VALUE: usize = 1;

/// The config key for the dollars-held-as-savings figure.
const SAVINGS_DOLLARS_KEY: &str = "Dólares Ahorro";

/// The scalar config values as reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ConfigValues {
    /// The dollars currently held as savings.
    #[serde(rename = "dolaresAhorro")]
    pub savings_dollars: f64,
}

/// The payload for setting the dollars held as savings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SavingsUpdate {
    /// The new savings figure.
    pub amount: f64,
}

/// Read the scalar config values, defaulting missing keys to zero.
pub fn get_config<S: RecordStore>(store: &S) -> Result<ConfigValues, Error> {
    let rows = store.list_rows(Table::Config)?;

    let savings_dollars = rows
        .iter()
        .find(|row| cell(row, COL_KEY) == SAVINGS_DOLLARS_KEY)
        .map(|row| parse_amount(cell(row, COL_VALUE)))
        .unwrap_or(0.0);

    Ok(ConfigValues { savings_dollars })
}

/// Set the dollars-held-as-savings figure, updating the existing row or
/// appending one.
pub fn set_savings_dollars<S: RecordStore>(store: &mut S, amount: f64) -> Result<(), Error> {
    let rows = store.list_rows(Table::Config)?;

    let existing = rows
        .iter()
        .position(|row| cell(row, COL_KEY) == SAVINGS_DOLLARS_KEY);

    match existing {
        Some(index) => store.update_cell(Table::Config, index + 1, COL_VALUE, amount.to_string()),
        None => store
            .append_row(
                Table::Config,
                vec![SAVINGS_DOLLARS_KEY.to_string(), amount.to_string()],
            )
            .map(|_| ()),
    }
}
