//! Defines the investment types.

use serde::{Deserialize, Serialize};

/// An investment position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// A time-based unique id (milliseconds since the Unix epoch at
    /// creation).
    pub id: i64,
    /// A short display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// The invested principal in USD.
    #[serde(rename = "monto")]
    pub principal: f64,
    /// The interest rate, in percent.
    #[serde(rename = "tasa")]
    pub rate: f64,
    /// How often interest is paid (free text, e.g. "mensual").
    #[serde(rename = "frecuencia")]
    pub frequency: String,
    /// The purchase date as `YYYY-MM-DD`.
    #[serde(rename = "fechaCompra")]
    pub purchase_date: String,
    /// The maturity date as `YYYY-MM-DD`.
    #[serde(rename = "vencimiento")]
    pub maturity_date: String,
    /// Where the money came from (free text).
    #[serde(default, rename = "origen")]
    pub origin: String,
    /// Free-form notes.
    #[serde(default, rename = "notas")]
    pub notes: String,
}

/// The payload for creating an investment. The id is assigned server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewInvestment {
    /// A short display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// The invested principal in USD.
    #[serde(rename = "monto")]
    pub principal: f64,
    /// The interest rate, in percent.
    #[serde(rename = "tasa")]
    pub rate: f64,
    /// How often interest is paid.
    #[serde(default, rename = "frecuencia")]
    pub frequency: String,
    /// The purchase date as `YYYY-MM-DD`.
    #[serde(default, rename = "fechaCompra")]
    pub purchase_date: String,
    /// The maturity date as `YYYY-MM-DD`.
    #[serde(default, rename = "vencimiento")]
    pub maturity_date: String,
    /// Where the money came from.
    #[serde(default, rename = "origen")]
    pub origin: String,
    /// Free-form notes.
    #[serde(default, rename = "notas")]
    pub notes: String,
}

/// The payload for deleting an investment by id.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InvestmentRef {
    /// The id of the investment.
    pub id: i64,
}
