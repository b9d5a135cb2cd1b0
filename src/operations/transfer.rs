//! The transfer ("movimiento") operations.

use crate::{
    Error,
    models::{NewTransfer, Transfer, parse_amount},
    operations::{cell, now_millis},
    store::{RecordStore, Table},
};

const COL_ID: usize = 0;
const COL_DATE: usize = 1;
const COL_SOURCE: usize = 2;
const COL_DEST: usize = 3;
const COL_AMOUNT: usize = 4;
const COL_NOTE: usize = 5;
const COL_IS_SAVINGS: usize = 6;

/// List every transfer, skipping rows without a parseable id.
pub fn get_transfers<S: RecordStore>(store: &S) -> Result<Vec<Transfer>, Error> {
    let rows = store.list_rows(Table::Transfers)?;

    let transfers = rows
        .iter()
        .filter_map(|row| {
            let id = cell(row, COL_ID).trim().parse::<i64>().ok()?;

            Some(Transfer {
                id,
                date: cell(row, COL_DATE).to_string(),
                source: cell(row, COL_SOURCE).to_string(),
                dest: cell(row, COL_DEST).to_string(),
                amount: parse_amount(cell(row, COL_AMOUNT)),
                note: cell(row, COL_NOTE).to_string(),
                is_savings: cell(row, COL_IS_SAVINGS) == "TRUE",
            })
        })
        .collect();

    Ok(transfers)
}

/// Create a transfer, assigning it a millisecond-timestamp id.
///
/// Returns the assigned id.
pub fn add_transfer<S: RecordStore>(store: &mut S, new: NewTransfer) -> Result<i64, Error> {
    let id = now_millis();

    store.append_row(
        Table::Transfers,
        vec![
            id.to_string(),
            new.date,
            new.source,
            new.dest,
            new.amount.to_string(),
            new.note,
            if new.is_savings { "TRUE" } else { "FALSE" }.to_string(),
        ],
    )?;

    Ok(id)
}
