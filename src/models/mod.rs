//! The domain models: the entities the tracker records and the payloads the
//! API accepts for them.

mod expense;
mod income;
mod investment;
mod net_worth;
mod transfer;

pub use expense::{
    Currency, Expense, ExpenseRef, ExpenseUpdate, InstallmentPurchase, NewExpense,
    normalize_category, normalize_payment_method,
};
pub use income::MonthlyIncomeUpdate;
pub use investment::{Investment, InvestmentRef, NewInvestment};
pub use net_worth::{NetWorth, NetWorthUpdate};
pub use transfer::{NewTransfer, Transfer};

/// Parse a numeric cell, coercing blank or malformed values to zero.
///
/// The legacy sheet favors availability over validation: a row with a
/// garbled amount is still listed, with the amount read as zero.
pub(crate) fn parse_amount(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(0.0)
}

/// Parse an integer cell, coercing blank or malformed values to `default`.
pub(crate) fn parse_count(cell: &str, default: u32) -> u32 {
    cell.trim().parse().unwrap_or(default)
}
