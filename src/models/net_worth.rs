//! Defines the net-worth snapshot types.

use serde::{Deserialize, Serialize};

/// The USD balance of each known account.
///
/// Accounts are matched against store rows by case-insensitive substring of
/// the account name, e.g. any row whose name contains "bbva" reports as
/// [NetWorth::bbva].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetWorth {
    /// The balance of the BBVA bank account.
    pub bbva: f64,
    /// The balance of the safe-deposit box ("caja de seguridad").
    pub caja: f64,
    /// Cash on hand ("efectivo").
    pub efectivo: f64,
}

/// The payload for updating net-worth balances.
///
/// Absent fields leave the corresponding account untouched.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NetWorthUpdate {
    /// The new BBVA balance, if changed.
    #[serde(default)]
    pub bbva: Option<f64>,
    /// The new safe-deposit balance, if changed.
    #[serde(default)]
    pub caja: Option<f64>,
    /// The new cash balance, if changed.
    #[serde(default)]
    pub efectivo: Option<f64>,
}
