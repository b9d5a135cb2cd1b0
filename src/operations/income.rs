//! The monthly income operations. Income is keyed by `(month, year)` with
//! at most one row per pair.

use std::collections::BTreeMap;

use crate::{
    Error,
    models::{MonthlyIncomeUpdate, parse_amount},
    operations::cell,
    store::{RecordStore, Table},
};

const COL_MONTH: usize = 0;
const COL_YEAR: usize = 1;
const COL_AMOUNT: usize = 2;

/// Read every recorded income as a `"YYYY-MM" -> amount` map.
///
/// Rows whose month or year cell does not parse are skipped.
pub fn get_monthly_income<S: RecordStore>(store: &S) -> Result<BTreeMap<String, f64>, Error> {
    let rows = store.list_rows(Table::MonthlyIncome)?;
    let mut income = BTreeMap::new();

    for row in &rows {
        let Ok(month) = cell(row, COL_MONTH).trim().parse::<u32>() else {
            continue;
        };
        let Ok(year) = cell(row, COL_YEAR).trim().parse::<i32>() else {
            continue;
        };

        income.insert(
            format!("{year}-{month:02}"),
            parse_amount(cell(row, COL_AMOUNT)),
        );
    }

    Ok(income)
}

/// Set the income of one month, overwriting the amount if the `(month,
/// year)` pair already has a row and appending one otherwise.
pub fn set_monthly_income<S: RecordStore>(
    store: &mut S,
    update: MonthlyIncomeUpdate,
) -> Result<(), Error> {
    let rows = store.list_rows(Table::MonthlyIncome)?;

    let existing = rows.iter().position(|row| {
        cell(row, COL_MONTH).trim().parse() == Ok(update.month)
            && cell(row, COL_YEAR).trim().parse() == Ok(update.year)
    });

    match existing {
        Some(index) => store.update_cell(
            Table::MonthlyIncome,
            index + 1,
            COL_AMOUNT,
            update.amount.to_string(),
        ),
        None => store
            .append_row(
                Table::MonthlyIncome,
                vec![
                    update.month.to_string(),
                    update.year.to_string(),
                    update.amount.to_string(),
                ],
            )
            .map(|_| ()),
    }
}

#[cfg(test)]
mod income_operations_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        models::MonthlyIncomeUpdate,
        store::{SqliteRecordStore, initialize},
    };

    use super::{get_monthly_income, set_monthly_income};

    fn get_store() -> SqliteRecordStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteRecordStore::new(Arc::new(Mutex::new(connection)))
    }

    #[test]
    fn income_keys_are_zero_padded() {
        let mut store = get_store();

        set_monthly_income(
            &mut store,
            MonthlyIncomeUpdate {
                month: 7,
                year: 2024,
                amount: 3000.0,
            },
        )
        .unwrap();

        let income = get_monthly_income(&store).unwrap();
        assert_eq!(income.get("2024-07"), Some(&3000.0));
    }

    #[test]
    fn setting_the_same_month_overwrites_the_amount() {
        let mut store = get_store();
        let update = MonthlyIncomeUpdate {
            month: 7,
            year: 2024,
            amount: 3000.0,
        };

        set_monthly_income(&mut store, update).unwrap();
        set_monthly_income(
            &mut store,
            MonthlyIncomeUpdate {
                amount: 3500.0,
                ..update
            },
        )
        .unwrap();

        let income = get_monthly_income(&store).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income.get("2024-07"), Some(&3500.0));
    }

    #[test]
    fn different_months_get_their_own_rows() {
        let mut store = get_store();

        for month in [1, 2] {
            set_monthly_income(
                &mut store,
                MonthlyIncomeUpdate {
                    month,
                    year: 2024,
                    amount: 1000.0 * month as f64,
                },
            )
            .unwrap();
        }

        let income = get_monthly_income(&store).unwrap();
        assert_eq!(income.len(), 2);
        assert_eq!(income.get("2024-01"), Some(&1000.0));
        assert_eq!(income.get("2024-02"), Some(&2000.0));
    }
}
