//! Defines the monthly income payload.

use serde::Deserialize;

/// The payload for setting the income of one month.
///
/// At most one row exists per `(month, year)` pair: setting the income of a
/// month that already has a row overwrites its amount.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MonthlyIncomeUpdate {
    /// The calendar month, 1-based.
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// The income for that month.
    pub amount: f64,
}
