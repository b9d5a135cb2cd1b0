//! The expense operations: listing, creation (with synchronous installment
//! expansion), in-place updates and positional deletion.
//!
//! The expense table keeps the legacy sheet's fixed 12-column layout, and
//! the API keeps its row addressing: the wire `rowIndex` counts the sheet's
//! header row, so row position `n` in the store is `rowIndex n + 1` on the
//! wire.

use serde::Serialize;

use crate::{
    Error,
    billing::{PaymentClass, billing_month, billing_months},
    models::{
        Currency, Expense, ExpenseUpdate, InstallmentPurchase, NewExpense, normalize_category,
        normalize_payment_method, parse_amount, parse_count,
    },
    operations::{cell, now_millis, timestamp_cell},
    store::{RecordStore, Row, Table},
};

const COL_DATE: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_AMOUNT: usize = 3;
const COL_CURRENCY: usize = 4;
const COL_PAYMENT: usize = 5;
const COL_FORM_INSTALLMENTS: usize = 6;
const COL_DESCRIPTION: usize = 7;
const COL_INSTALLMENT_INDEX: usize = 8;
const COL_INSTALLMENT_COUNT: usize = 9;
const COL_BILLING_MONTH: usize = 10;
const COL_GROUP_ID: usize = 11;

/// What the API reports back after creating an expense.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExpenseReceipt {
    /// A single-installment expense: the position of the new row.
    Single {
        /// The 1-based position of the new row.
        id: usize,
    },
    /// A multi-installment purchase.
    Installments(InstallmentReceipt),
}

/// The rows and group id created for a multi-installment purchase.
#[derive(Debug, PartialEq, Serialize)]
pub struct InstallmentReceipt {
    /// The 1-based positions of the new rows, one per installment.
    pub ids: Vec<usize>,
    /// The group id shared by every installment.
    #[serde(rename = "groupId")]
    pub group_id: String,
}

/// List every expense row, normalizing legacy free-form cells.
///
/// Rows missing both a date and an amount are skipped (the sheet contains
/// blank filler rows). A row without a stored billing month gets one
/// computed from its date, payment method and installment index.
///
/// # Errors
/// Returns an [Error::TableMissing] or [Error::SqlError] if the store
/// cannot be read.
pub fn get_expenses<S: RecordStore>(store: &S) -> Result<Vec<Expense>, Error> {
    let rows = store.list_rows(Table::Expenses)?;

    let expenses = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !(cell(row, COL_DATE).is_empty() && cell(row, COL_AMOUNT).is_empty()))
        .map(|(index, row)| {
            let date = date_cell(cell(row, COL_DATE));
            let payment = normalize_payment_method(cell(row, COL_PAYMENT));
            let installment_index = parse_count(cell(row, COL_INSTALLMENT_INDEX), 1).max(1);

            let stored_count = parse_count(cell(row, COL_INSTALLMENT_COUNT), 0);
            let form_count = parse_count(cell(row, COL_FORM_INSTALLMENTS), 0);
            let installment_count = if stored_count > 0 {
                stored_count
            } else if form_count > 0 {
                form_count
            } else {
                1
            };

            let stored_month = cell(row, COL_BILLING_MONTH).trim();
            let billing_month = if stored_month.is_empty() {
                billing_month(&date, PaymentClass::classify(&payment), installment_index)
            } else {
                stored_month.to_string()
            };

            let group_id = cell(row, COL_GROUP_ID).trim();

            Expense {
                id: index + 1,
                row_index: index + 2,
                date,
                category: normalize_category(cell(row, COL_CATEGORY)),
                amount: parse_amount(cell(row, COL_AMOUNT)),
                currency: Currency::normalize(cell(row, COL_CURRENCY)),
                payment,
                description: cell(row, COL_DESCRIPTION).to_string(),
                installment_index,
                installment_count,
                group_id: (!group_id.is_empty()).then(|| group_id.to_string()),
                billing_month,
            }
        })
        .collect();

    Ok(expenses)
}

/// Record a new expense.
///
/// A single-installment expense appends one row. An expense with an
/// installment count above one is expanded synchronously in this same call:
/// this replaces the legacy sheet's insert trigger, which expanded rows in
/// the background and could briefly expose a half-expanded purchase.
///
/// # Errors
/// Returns an [Error::TableMissing] or [Error::SqlError] if the store
/// cannot be written.
pub fn add_expense<S: RecordStore>(
    store: &mut S,
    new: NewExpense,
) -> Result<ExpenseReceipt, Error> {
    if new.installment_count > 1 {
        let installment_count = new.installment_count;

        return add_installment_purchase(
            store,
            InstallmentPurchase {
                expense: new,
                installment_count,
                billing_months: None,
            },
        )
        .map(ExpenseReceipt::Installments);
    }

    store.ensure_columns(Table::Expenses, Table::Expenses.column_count())?;

    let payment = new.payment.clone().unwrap_or_default();
    let billing_month = match new.billing_month.filter(|month| !month.is_empty()) {
        Some(month) => month,
        None => billing_month(&new.date, PaymentClass::classify(&payment), 1),
    };

    let row = vec![
        timestamp_cell(),
        new.date,
        new.category,
        new.amount.to_string(),
        new.currency.unwrap_or_default(),
        payment,
        "1".to_string(),
        new.description,
        "1".to_string(),
        "1".to_string(),
        billing_month,
        String::new(),
    ];

    let id = store.append_row(Table::Expenses, row)?;

    Ok(ExpenseReceipt::Single { id })
}

/// Record a purchase split into installments.
///
/// The amount is divided into equal shares rounded to two decimals; the
/// rounding drift against the original total is accepted, not corrected.
/// Every row shares one freshly generated group id, carries its own index,
/// count and billing month, and gets a ` (cuota i/N)` description suffix.
///
/// A client-supplied billing-month list is honored when it covers every
/// installment; otherwise the months are computed from the purchase date
/// and payment method.
///
/// # Errors
/// Returns an [Error::TableMissing] or [Error::SqlError] if the store
/// cannot be written.
pub fn add_installment_purchase<S: RecordStore>(
    store: &mut S,
    purchase: InstallmentPurchase,
) -> Result<InstallmentReceipt, Error> {
    store.ensure_columns(Table::Expenses, Table::Expenses.column_count())?;

    let expense = purchase.expense;
    let count = purchase.installment_count.max(1);
    let share = round_to_cents(expense.amount / count as f64);
    let group_id = format!("GRP_{}", now_millis());

    let payment = expense.payment.clone().unwrap_or_default();
    let months = match purchase.billing_months {
        Some(months) if months.len() >= count as usize => months,
        _ => billing_months(&expense.date, PaymentClass::classify(&payment), count),
    };

    let rows: Vec<Row> = (1..=count)
        .map(|index| {
            let base_description = if expense.description.is_empty() {
                &expense.category
            } else {
                &expense.description
            };

            vec![
                timestamp_cell(),
                expense.date.clone(),
                expense.category.clone(),
                share.to_string(),
                expense.currency.clone().unwrap_or_default(),
                payment.clone(),
                count.to_string(),
                format!("{base_description} (cuota {index}/{count})"),
                index.to_string(),
                count.to_string(),
                months.get(index as usize - 1).cloned().unwrap_or_default(),
                group_id.clone(),
            ]
        })
        .collect();

    let ids = store.append_rows(Table::Expenses, rows)?;

    Ok(InstallmentReceipt { ids, group_id })
}

/// Update an expense row in place, addressed by wire `rowIndex` (or `id`
/// when the index is absent).
///
/// The timestamp, installment bookkeeping and group id columns are left
/// untouched; the billing month is only overwritten when the payload
/// carries one.
///
/// # Errors
/// Returns an [Error::UpdateMissingExpense] if the row does not exist.
pub fn update_expense<S: RecordStore>(store: &mut S, update: ExpenseUpdate) -> Result<(), Error> {
    let position = match (update.row_index, update.id) {
        (Some(row_index), _) if row_index > 1 => row_index - 1,
        (None, Some(id)) if id > 0 => id,
        _ => return Err(Error::UpdateMissingExpense),
    };

    let updates = [
        (COL_DATE, Some(update.date)),
        (COL_CATEGORY, Some(update.category)),
        (COL_AMOUNT, Some(update.amount.to_string())),
        (COL_CURRENCY, update.currency),
        (COL_PAYMENT, update.payment),
        (COL_DESCRIPTION, Some(update.description)),
        (COL_BILLING_MONTH, update.billing_month),
    ];

    for (column, value) in updates {
        let Some(value) = value else { continue };

        store
            .update_cell(Table::Expenses, position, column, value)
            .map_err(|error| match error {
                Error::RowOutOfRange(_) => Error::UpdateMissingExpense,
                error => error,
            })?;
    }

    Ok(())
}

/// Delete an expense row, addressed by wire `rowIndex`.
///
/// # Errors
/// Returns an [Error::DeleteMissingExpense] if the index does not refer to
/// an existing row (including index 1, the sheet header).
pub fn delete_expense<S: RecordStore>(store: &mut S, row_index: usize) -> Result<(), Error> {
    if row_index <= 1 {
        return Err(Error::DeleteMissingExpense);
    }

    store
        .delete_row(Table::Expenses, row_index - 1)
        .map_err(|error| match error {
            Error::RowOutOfRange(_) => Error::DeleteMissingExpense,
            error => error,
        })
}

/// Strip the time component from a legacy datetime cell.
fn date_cell(value: &str) -> String {
    value.split(['T', ' ']).next().unwrap_or_default().to_string()
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod expense_operations_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        models::{Currency, ExpenseUpdate, InstallmentPurchase, NewExpense},
        store::{RecordStore, SqliteRecordStore, Table, initialize},
    };

    use super::{
        ExpenseReceipt, add_expense, add_installment_purchase, delete_expense, get_expenses,
        update_expense,
    };

    fn get_store() -> SqliteRecordStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteRecordStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_expense(amount: f64, installment_count: u32) -> NewExpense {
        NewExpense {
            date: "2024-03-15".to_string(),
            category: "comida".to_string(),
            amount,
            currency: Some("ARS".to_string()),
            payment: Some("VISA (8043)".to_string()),
            description: "Supermercado".to_string(),
            installment_count,
            billing_month: None,
        }
    }

    #[test]
    fn add_single_expense_computes_billing_month() {
        let mut store = get_store();

        let receipt = add_expense(&mut store, new_expense(1000.0, 1)).unwrap();

        assert_eq!(receipt, ExpenseReceipt::Single { id: 1 });

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].billing_month, "2024-04");
        assert_eq!(expenses[0].group_id, None);
        assert_eq!(expenses[0].installment_count, 1);
    }

    #[test]
    fn add_single_cash_expense_bills_in_purchase_month() {
        let mut store = get_store();
        let mut expense = new_expense(500.0, 1);
        expense.payment = Some("Efectivo".to_string());
        expense.date = "2024-07-10".to_string();

        add_expense(&mut store, expense).unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses[0].billing_month, "2024-07");
    }

    #[test]
    fn add_expense_with_installments_expands_synchronously() {
        let mut store = get_store();

        let receipt = add_expense(&mut store, new_expense(1000.0, 3)).unwrap();

        let ExpenseReceipt::Installments(receipt) = receipt else {
            panic!("expected an installment receipt");
        };
        assert_eq!(receipt.ids, vec![1, 2, 3]);
        assert!(receipt.group_id.starts_with("GRP_"));

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses.len(), 3);

        for (offset, expense) in expenses.iter().enumerate() {
            assert_eq!(expense.amount, 333.33);
            assert_eq!(expense.installment_index, offset as u32 + 1);
            assert_eq!(expense.installment_count, 3);
            assert_eq!(expense.group_id.as_deref(), Some(receipt.group_id.as_str()));
            assert_eq!(
                expense.description,
                format!("Supermercado (cuota {}/3)", offset + 1)
            );
        }

        let months: Vec<_> = expenses
            .iter()
            .map(|expense| expense.billing_month.clone())
            .collect();
        assert_eq!(months, vec!["2024-04", "2024-05", "2024-06"]);
    }

    #[test]
    fn installment_shares_tolerate_rounding_drift() {
        let mut store = get_store();

        add_expense(&mut store, new_expense(100.0, 3)).unwrap();

        let expenses = get_expenses(&store).unwrap();
        let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

        assert!(expenses.iter().all(|expense| expense.amount == 33.33));
        // 3 * 33.33 = 99.99: drift of at most one cent per extra share.
        assert!((total - 100.0).abs() <= 0.01 * 2.0 + 1e-9);
    }

    #[test]
    fn installment_expansion_falls_back_to_category_description() {
        let mut store = get_store();
        let mut expense = new_expense(300.0, 2);
        expense.description = String::new();

        add_installment_purchase(
            &mut store,
            InstallmentPurchase {
                expense,
                installment_count: 2,
                billing_months: None,
            },
        )
        .unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses[0].description, "comida (cuota 1/2)");
    }

    #[test]
    fn client_billing_months_are_honored_when_complete() {
        let mut store = get_store();

        add_installment_purchase(
            &mut store,
            InstallmentPurchase {
                expense: new_expense(200.0, 2),
                installment_count: 2,
                billing_months: Some(vec!["2030-01".to_string(), "2030-02".to_string()]),
            },
        )
        .unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses[0].billing_month, "2030-01");
        assert_eq!(expenses[1].billing_month, "2030-02");
    }

    #[test]
    fn incomplete_client_billing_months_are_recomputed() {
        let mut store = get_store();

        add_installment_purchase(
            &mut store,
            InstallmentPurchase {
                expense: new_expense(200.0, 2),
                installment_count: 2,
                billing_months: Some(vec!["2030-01".to_string()]),
            },
        )
        .unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses[0].billing_month, "2024-04");
        assert_eq!(expenses[1].billing_month, "2024-05");
    }

    #[test]
    fn get_expenses_skips_blank_rows_and_normalizes_cells() {
        let mut store = get_store();
        store
            .append_row(
                Table::Expenses,
                vec![
                    "ts".to_string(),
                    "2024-05-01T12:00:00".to_string(),
                    "SALIDAS".to_string(),
                    "abc".to_string(),
                    "dólares".to_string(),
                    "visa".to_string(),
                ],
            )
            .unwrap();
        store
            .append_row(Table::Expenses, vec!["ts".to_string()])
            .unwrap();

        let expenses = get_expenses(&store).unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].date, "2024-05-01");
        assert_eq!(expenses[0].category, "Salidas");
        assert_eq!(expenses[0].amount, 0.0);
        assert_eq!(expenses[0].currency, Currency::USD);
        assert_eq!(expenses[0].payment, "VISA (8043)");
        // No stored billing month: computed from date and card class.
        assert_eq!(expenses[0].billing_month, "2024-06");
    }

    #[test]
    fn update_expense_rewrites_row_cells() {
        let mut store = get_store();
        add_expense(&mut store, new_expense(1000.0, 1)).unwrap();

        update_expense(
            &mut store,
            ExpenseUpdate {
                row_index: Some(2),
                id: None,
                date: "2024-03-16".to_string(),
                category: "salidas".to_string(),
                amount: 1500.0,
                currency: Some("USD".to_string()),
                payment: Some("Efectivo".to_string()),
                description: "Cena".to_string(),
                billing_month: Some("2024-03".to_string()),
            },
        )
        .unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses[0].date, "2024-03-16");
        assert_eq!(expenses[0].category, "Salidas");
        assert_eq!(expenses[0].amount, 1500.0);
        assert_eq!(expenses[0].currency, Currency::USD);
        assert_eq!(expenses[0].payment, "Efectivo");
        assert_eq!(expenses[0].description, "Cena");
        assert_eq!(expenses[0].billing_month, "2024-03");
    }

    #[test]
    fn update_expense_fails_on_missing_row() {
        let mut store = get_store();
        add_expense(&mut store, new_expense(1000.0, 1)).unwrap();

        let result = update_expense(
            &mut store,
            ExpenseUpdate {
                row_index: Some(99),
                id: None,
                date: "2024-03-16".to_string(),
                category: "salidas".to_string(),
                amount: 1500.0,
                currency: None,
                payment: None,
                description: String::new(),
                billing_month: None,
            },
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_expense_removes_the_addressed_row() {
        let mut store = get_store();
        add_expense(&mut store, new_expense(100.0, 1)).unwrap();
        add_expense(&mut store, new_expense(200.0, 1)).unwrap();

        delete_expense(&mut store, 2).unwrap();

        let expenses = get_expenses(&store).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 200.0);
    }

    #[test]
    fn delete_expense_fails_on_out_of_range_index() {
        let mut store = get_store();
        add_expense(&mut store, new_expense(100.0, 1)).unwrap();

        assert_eq!(
            delete_expense(&mut store, 10),
            Err(Error::DeleteMissingExpense)
        );
        // Index 1 addresses the legacy header row, never a data row.
        assert_eq!(
            delete_expense(&mut store, 1),
            Err(Error::DeleteMissingExpense)
        );
    }
}
