//! This file defines the expense types, the core entities of the tracker.
//!
//! An expense row is one installment of a purchase: single-installment
//! purchases produce one row, multi-installment purchases produce one row
//! per installment, all sharing a group id.

use serde::{Deserialize, Serialize};

/// The currencies the tracker records amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Argentine pesos.
    ARS,
    /// US dollars.
    USD,
}

impl Currency {
    /// Normalize a raw currency cell.
    ///
    /// Anything mentioning dollars maps to [Currency::USD]; everything
    /// else, including the empty string, maps to [Currency::ARS].
    pub fn normalize(value: &str) -> Self {
        let uppercased = value.to_uppercase();

        if uppercased.contains("USD")
            || uppercased.contains("DOLAR")
            || uppercased.contains("DÓLAR")
        {
            Currency::USD
        } else {
            Currency::ARS
        }
    }

    /// The currency code as stored in the expense table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::ARS => "ARS",
            Currency::USD => "USD",
        }
    }
}

/// An expense row as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The 1-based position of the row in the expense table.
    pub id: usize,
    /// The legacy sheet row index (`id + 1`, counting the header row).
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
    /// The purchase date as `YYYY-MM-DD`.
    pub date: String,
    /// The expense category, capitalized.
    pub category: String,
    /// The amount of this installment.
    pub amount: f64,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// The canonicalized payment method.
    pub payment: String,
    /// A text description of the purchase.
    pub description: String,
    /// Which installment of the purchase this row is (1-based).
    #[serde(rename = "cuotaActual")]
    pub installment_index: u32,
    /// How many installments the purchase was split into.
    #[serde(rename = "totalCuotas")]
    pub installment_count: u32,
    /// The token shared by every installment of one purchase, if any.
    #[serde(rename = "idGrupo")]
    pub group_id: Option<String>,
    /// The `YYYY-MM` month this installment is billed in.
    #[serde(rename = "mesPago")]
    pub billing_month: String,
}

/// The payload for creating an expense.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewExpense {
    /// The purchase date as `YYYY-MM-DD`.
    pub date: String,
    /// The expense category.
    pub category: String,
    /// The full purchase amount.
    pub amount: f64,
    /// The currency the amount is denominated in.
    #[serde(default)]
    pub currency: Option<String>,
    /// The payment method used.
    #[serde(default)]
    pub payment: Option<String>,
    /// A text description of the purchase.
    #[serde(default)]
    pub description: String,
    /// How many installments to split the purchase into. Defaults to 1.
    #[serde(default = "default_installment_count", rename = "cuotas")]
    pub installment_count: u32,
    /// A client-computed billing month. Computed from the purchase date and
    /// payment method when absent.
    #[serde(default, rename = "mesPago")]
    pub billing_month: Option<String>,
}

fn default_installment_count() -> u32 {
    1
}

/// The payload for creating an expense split into installments, with an
/// optional client-computed billing-month list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstallmentPurchase {
    /// The purchase to split.
    pub expense: NewExpense,
    /// How many installments to split the purchase into.
    #[serde(rename = "cuotas")]
    pub installment_count: u32,
    /// The billing month of each installment, in order. Computed from the
    /// purchase date and payment method when absent.
    #[serde(default, rename = "mesesPago")]
    pub billing_months: Option<Vec<String>>,
}

/// The payload for updating an expense row in place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseUpdate {
    /// The legacy sheet row index of the row to update.
    #[serde(default, rename = "rowIndex")]
    pub row_index: Option<usize>,
    /// The 1-based position of the row, used when `rowIndex` is absent.
    #[serde(default)]
    pub id: Option<usize>,
    /// The new purchase date.
    pub date: String,
    /// The new category.
    pub category: String,
    /// The new amount.
    pub amount: f64,
    /// The new currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// The new payment method.
    #[serde(default)]
    pub payment: Option<String>,
    /// The new description.
    #[serde(default)]
    pub description: String,
    /// The new billing month. Left unchanged when absent.
    #[serde(default, rename = "mesPago")]
    pub billing_month: Option<String>,
}

/// The payload for deleting an expense row by its legacy sheet row index.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExpenseRef {
    /// The legacy sheet row index of the row to delete.
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
}

/// Canonicalize a raw payment-method cell by brand substring.
///
/// Unrecognized non-empty methods pass through unchanged; the empty string
/// defaults to cash.
pub fn normalize_payment_method(value: &str) -> String {
    let lowered = value.to_lowercase();

    if lowered.contains("visa") {
        "VISA (8043)".to_string()
    } else if lowered.contains("master") {
        "MASTER (9714)".to_string()
    } else if lowered.contains("débito") || lowered.contains("debito") || lowered.contains("transfere")
    {
        "Débito/Transferencia".to_string()
    } else if lowered.contains("efectivo") || value.is_empty() {
        "Efectivo".to_string()
    } else {
        value.to_string()
    }
}

/// Capitalize a raw category cell: first letter upper, rest lower.
///
/// The empty string maps to "Otros".
pub fn normalize_category(value: &str) -> String {
    if value.is_empty() {
        return "Otros".to_string();
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => "Otros".to_string(),
    }
}
