//! The net-worth operations: reading and updating per-account balances.

use crate::{
    Error,
    models::{NetWorth, NetWorthUpdate, parse_amount},
    operations::{cell, timestamp_cell},
    store::{RecordStore, Table},
};

const COL_ACCOUNT: usize = 0;
const COL_BALANCE: usize = 1;
const COL_UPDATED: usize = 2;

/// The account rows seeded when the table is first written.
const ACCOUNT_NAMES: [&str; 3] = ["BBVA", "Caja Seguridad", "Efectivo"];

/// Read the balance of each known account.
///
/// Rows are matched by case-insensitive substring of the account name;
/// unknown accounts are ignored and missing accounts report zero, so an
/// empty table yields all-zero balances rather than an error.
pub fn get_net_worth<S: RecordStore>(store: &S) -> Result<NetWorth, Error> {
    let rows = store.list_rows(Table::NetWorth)?;
    let mut net_worth = NetWorth::default();

    for row in &rows {
        let account = cell(row, COL_ACCOUNT).to_lowercase();
        let balance = parse_amount(cell(row, COL_BALANCE));

        if account.contains("bbva") {
            net_worth.bbva = balance;
        } else if account.contains("caja") {
            net_worth.caja = balance;
        } else if account.contains("efectivo") {
            net_worth.efectivo = balance;
        }
    }

    Ok(net_worth)
}

/// Update the balances named in `update`, stamping each touched row with
/// the current time.
///
/// An empty table is seeded with the three known account rows first, so an
/// update against a fresh database creates the snapshot it describes.
///
/// # Errors
/// Returns an [Error::TableMissing] or [Error::SqlError] if the store
/// cannot be written.
pub fn update_net_worth<S: RecordStore>(
    store: &mut S,
    update: NetWorthUpdate,
) -> Result<(), Error> {
    let rows = store.list_rows(Table::NetWorth)?;

    if rows.is_empty() {
        let balances = [
            update.bbva.unwrap_or(0.0),
            update.caja.unwrap_or(0.0),
            update.efectivo.unwrap_or(0.0),
        ];

        for (name, balance) in ACCOUNT_NAMES.iter().zip(balances) {
            store.append_row(
                Table::NetWorth,
                vec![name.to_string(), balance.to_string(), timestamp_cell()],
            )?;
        }

        return Ok(());
    }

    for (index, row) in rows.iter().enumerate() {
        let account = cell(row, COL_ACCOUNT).to_lowercase();
        let position = index + 1;

        let new_balance = if account.contains("bbva") {
            update.bbva
        } else if account.contains("caja") {
            update.caja
        } else if account.contains("efectivo") {
            update.efectivo
        } else {
            None
        };

        if let Some(balance) = new_balance {
            store.update_cell(Table::NetWorth, position, COL_BALANCE, balance.to_string())?;
            store.update_cell(Table::NetWorth, position, COL_UPDATED, timestamp_cell())?;
        }
    }

    Ok(())
}
