//! The investment operations. Investments are identified by a time-based
//! id stored in the first column, not by row position.

use crate::{
    Error,
    models::{Investment, NewInvestment, parse_amount},
    operations::{cell, now_millis},
    store::{RecordStore, Table},
};

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_PRINCIPAL: usize = 2;
const COL_RATE: usize = 3;
const COL_FREQUENCY: usize = 4;
const COL_PURCHASE_DATE: usize = 5;
const COL_MATURITY_DATE: usize = 6;
const COL_ORIGIN: usize = 7;
const COL_NOTES: usize = 8;

/// List every investment, skipping rows without a parseable id.
pub fn get_investments<S: RecordStore>(store: &S) -> Result<Vec<Investment>, Error> {
    let rows = store.list_rows(Table::Investments)?;

    let investments = rows
        .iter()
        .filter_map(|row| {
            let id = cell(row, COL_ID).trim().parse::<i64>().ok()?;

            Some(Investment {
                id,
                name: cell(row, COL_NAME).to_string(),
                principal: parse_amount(cell(row, COL_PRINCIPAL)),
                rate: parse_amount(cell(row, COL_RATE)),
                frequency: cell(row, COL_FREQUENCY).to_string(),
                purchase_date: cell(row, COL_PURCHASE_DATE).to_string(),
                maturity_date: cell(row, COL_MATURITY_DATE).to_string(),
                origin: cell(row, COL_ORIGIN).to_string(),
                notes: cell(row, COL_NOTES).to_string(),
            })
        })
        .collect();

    Ok(investments)
}

/// Create an investment, assigning it a millisecond-timestamp id.
///
/// Returns the assigned id.
pub fn add_investment<S: RecordStore>(store: &mut S, new: NewInvestment) -> Result<i64, Error> {
    let id = now_millis();

    store.append_row(
        Table::Investments,
        vec![
            id.to_string(),
            new.name,
            new.principal.to_string(),
            new.rate.to_string(),
            new.frequency,
            new.purchase_date,
            new.maturity_date,
            new.origin,
            new.notes,
        ],
    )?;

    Ok(id)
}

/// Update the investment whose id matches `investment.id`.
///
/// # Errors
/// Returns an [Error::UpdateMissingInvestment] if no row carries the id.
pub fn update_investment<S: RecordStore>(
    store: &mut S,
    investment: Investment,
) -> Result<(), Error> {
    let position =
        find_by_id(store, investment.id)?.ok_or(Error::UpdateMissingInvestment)?;

    let updates = [
        (COL_NAME, investment.name),
        (COL_PRINCIPAL, investment.principal.to_string()),
        (COL_RATE, investment.rate.to_string()),
        (COL_FREQUENCY, investment.frequency),
        (COL_PURCHASE_DATE, investment.purchase_date),
        (COL_MATURITY_DATE, investment.maturity_date),
        (COL_ORIGIN, investment.origin),
        (COL_NOTES, investment.notes),
    ];

    for (column, value) in updates {
        store.update_cell(Table::Investments, position, column, value)?;
    }

    Ok(())
}

/// Delete the investment whose id matches `id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingInvestment] if no row carries the id.
pub fn delete_investment<S: RecordStore>(store: &mut S, id: i64) -> Result<(), Error> {
    let position = find_by_id(store, id)?.ok_or(Error::DeleteMissingInvestment)?;

    store.delete_row(Table::Investments, position)
}

/// The 1-based position of the investment row with the given id, if any.
fn find_by_id<S: RecordStore>(store: &S, id: i64) -> Result<Option<usize>, Error> {
    let rows = store.list_rows(Table::Investments)?;
    let id = id.to_string();

    Ok(rows
        .iter()
        .position(|row| cell(row, COL_ID).trim() == id)
        .map(|index| index + 1))
}
