//! The operations behind each API action: reads and writes against the
//! record store, invoking the billing scheduler where expenses are
//! involved.

mod config;
mod expense;
mod income;
mod investment;
mod net_worth;
mod transfer;

pub use config::{ConfigValues, SavingsUpdate, get_config, set_savings_dollars};
pub use expense::{
    ExpenseReceipt, InstallmentReceipt, add_expense, add_installment_purchase, delete_expense,
    get_expenses, update_expense,
};
pub use income::{get_monthly_income, set_monthly_income};
pub use investment::{add_investment, delete_investment, get_investments, update_investment};
pub use net_worth::{get_net_worth, update_net_worth};
pub use transfer::{add_transfer, get_transfers};

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    models::{Expense, Investment, NetWorth, Transfer},
    store::{RecordStore, Table},
};

/// Everything the front-end needs to render its dashboard, in one response.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    /// Every expense row.
    pub expenses: Vec<Expense>,
    /// The net-worth balances.
    pub patrimonio: NetWorth,
    /// Every investment.
    pub inversiones: Vec<Investment>,
    /// Every transfer.
    pub movimientos: Vec<Transfer>,
    /// Income by `YYYY-MM` month.
    #[serde(rename = "monthlyIncome")]
    pub monthly_income: BTreeMap<String, f64>,
    /// The scalar config values.
    pub config: ConfigValues,
}

/// Read every entity kind in one call.
///
/// # Errors
/// Propagates the first error of any of the individual reads.
pub fn get_all<S: RecordStore>(store: &S) -> Result<Snapshot, Error> {
    Ok(Snapshot {
        expenses: get_expenses(store)?,
        patrimonio: get_net_worth(store)?,
        inversiones: get_investments(store)?,
        movimientos: get_transfers(store)?,
        monthly_income: get_monthly_income(store)?,
        config: get_config(store)?,
    })
}

/// The shape of one table in a [DebugReport].
#[derive(Debug, Serialize)]
pub struct TableReport {
    /// The table name.
    pub name: &'static str,
    /// How many rows the table currently holds.
    pub rows: usize,
    /// The table's fixed column count.
    pub columns: usize,
}

/// A diagnostic view of the store, for the `debug` action.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    /// One entry per entity table.
    pub tables: Vec<TableReport>,
}

/// Report the row and column counts of every table.
pub fn debug_report<S: RecordStore>(store: &S) -> Result<DebugReport, Error> {
    let tables = Table::ALL
        .iter()
        .map(|&table| {
            Ok(TableReport {
                name: table.name(),
                rows: store.list_rows(table)?.len(),
                columns: table.column_count(),
            })
        })
        .collect::<Result<_, Error>>()?;

    Ok(DebugReport { tables })
}

/// Milliseconds since the Unix epoch, used for time-based unique ids.
pub(crate) fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// The current UTC time as a timestamp cell.
pub(crate) fn timestamp_cell() -> String {
    OffsetDateTime::now_utc().to_string()
}

/// Read a cell by column index, treating missing cells as empty.
pub(crate) fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}
