//! Defines the inter-account transfer ("movimiento") types.

use serde::{Deserialize, Serialize};

/// A transfer of money between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// A time-based unique id (milliseconds since the Unix epoch at
    /// creation).
    pub id: i64,
    /// The transfer date as `YYYY-MM-DD`.
    #[serde(rename = "fecha")]
    pub date: String,
    /// The account the money left.
    #[serde(rename = "origen")]
    pub source: String,
    /// The account the money arrived in.
    #[serde(rename = "destino")]
    pub dest: String,
    /// The transferred amount in USD.
    #[serde(rename = "monto")]
    pub amount: f64,
    /// A free-form note.
    #[serde(default, rename = "nota")]
    pub note: String,
    /// Whether the transfer counts as savings.
    #[serde(default, rename = "esAhorro")]
    pub is_savings: bool,
}

/// The payload for creating a transfer. The id is assigned server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransfer {
    /// The transfer date as `YYYY-MM-DD`.
    #[serde(rename = "fecha")]
    pub date: String,
    /// The account the money left.
    #[serde(rename = "origen")]
    pub source: String,
    /// The account the money arrived in.
    #[serde(rename = "destino")]
    pub dest: String,
    /// The transferred amount in USD.
    #[serde(rename = "monto")]
    pub amount: f64,
    /// A free-form note.
    #[serde(default, rename = "nota")]
    pub note: String,
    /// Whether the transfer counts as savings.
    #[serde(default, rename = "esAhorro")]
    pub is_savings: bool,
}
