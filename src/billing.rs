//! The billing-cycle scheduler: maps a purchase date, payment method and
//! installment count to the calendar months in which each installment is
//! billed.
//!
//! Card statements in this household close on the last Thursday of each
//! month. A card purchase made on or before the closing day is billed the
//! following month; a purchase made after it skips a month. Cash and debit
//! purchases are always billed in the month of the purchase itself.
//!
//! All functions here are pure and never touch the record store.

use time::{Date, Duration, Month};

/// The two payment-method families that bill differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentClass {
    /// Cash, debit card or bank transfer. Billed in the purchase month.
    CashOrDebit,
    /// A credit card. Billed according to the statement-closing day.
    CreditCard,
}

impl PaymentClass {
    /// Classify a raw payment-method string.
    ///
    /// Any string mentioning a card brand or "tarjeta" is treated as a
    /// credit card; everything else (including the empty string) is
    /// cash/debit.
    pub fn classify(payment_method: &str) -> Self {
        let lowered = payment_method.to_lowercase();

        if lowered.contains("visa") || lowered.contains("master") || lowered.contains("tarjeta") {
            PaymentClass::CreditCard
        } else {
            PaymentClass::CashOrDebit
        }
    }
}

/// The statement-closing day for a month: its last Thursday.
///
/// Returns `None` only if the date arithmetic leaves the range supported by
/// [time::Date], which cannot happen for any realistic year.
pub fn statement_closing_date(year: i32, month: Month) -> Option<Date> {
    let last_day = Date::from_calendar_date(year, month, month.length(year)).ok()?;
    // Number of days between the last day of the month and the nearest
    // Thursday at or before it (Sunday = 0 .. Saturday = 6, Thursday = 4).
    let step_back = (last_day.weekday().number_days_from_sunday() + 3) % 7;

    last_day.checked_sub(Duration::days(step_back as i64))
}

/// The `YYYY-MM` month in which installment `installment_index` (1-based) of
/// a purchase is billed.
///
/// An unparseable or empty `purchase_date` yields an empty string rather
/// than an error: the legacy sheet contains rows with blank or free-form
/// dates and readers must not fail on them. An `installment_index` of zero
/// is treated as 1.
pub fn billing_month(purchase_date: &str, class: PaymentClass, installment_index: u32) -> String {
    let Some(date) = parse_date(purchase_date) else {
        return String::new();
    };
    let offset = match class {
        // Every installment of a cash/debit purchase bills in the same month.
        PaymentClass::CashOrDebit => 0,
        PaymentClass::CreditCard => installment_index.max(1) as i64 - 1,
    };

    match first_billing_month(date, class) {
        Some((year, month0)) => month_token(year, month0 + offset),
        None => String::new(),
    }
}

/// The ordered `YYYY-MM` months in which each of `installment_count`
/// installments is billed: consecutive calendar months for card purchases,
/// the purchase month repeated for cash/debit.
///
/// Agrees with [billing_month] for every index: the `k`-th element equals
/// `billing_month(purchase_date, class, k)`. An unparseable date yields an
/// empty sequence and an `installment_count` of zero is treated as 1.
pub fn billing_months(
    purchase_date: &str,
    class: PaymentClass,
    installment_count: u32,
) -> Vec<String> {
    let Some(date) = parse_date(purchase_date) else {
        return Vec::new();
    };
    let count = installment_count.max(1);

    let Some((year, month0)) = first_billing_month(date, class) else {
        return Vec::new();
    };

    (0..count)
        .map(|offset| match class {
            PaymentClass::CashOrDebit => month_token(year, month0),
            PaymentClass::CreditCard => month_token(year, month0 + offset as i64),
        })
        .collect()
}

/// The first billing month of a purchase as `(year, zero-based month)`.
///
/// Cash/debit purchases bill in their own month. Card purchases bill the
/// month after the purchase month if the purchase is on or before the
/// statement-closing day, and two months after otherwise.
fn first_billing_month(purchase: Date, class: PaymentClass) -> Option<(i32, i64)> {
    let year = purchase.year();
    let month0 = purchase.month() as i64 - 1;

    match class {
        PaymentClass::CashOrDebit => Some((year, month0)),
        PaymentClass::CreditCard => {
            let closing = statement_closing_date(year, purchase.month())?;

            if purchase <= closing {
                Some((year, month0 + 1))
            } else {
                Some((year, month0 + 2))
            }
        }
    }
}

/// Format a `(year, zero-based month)` pair as `YYYY-MM`, rolling month
/// overflow into the following years.
fn month_token(year: i32, month0: i64) -> String {
    let year = year + (month0 / 12) as i32;
    let month = month0 % 12 + 1;

    format!("{year}-{month:02}")
}

/// Parse a `YYYY-MM-DD` date, ignoring anything after a `T` or a space so
/// that datetime strings exported by the legacy sheet still parse.
pub fn parse_date(value: &str) -> Option<Date> {
    let date_part = value
        .split(['T', ' '])
        .next()
        .filter(|part| !part.is_empty())?;

    let mut parts = date_part.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u8>().ok()?;
    let day = parts.next()?.parse::<u8>().ok()?;

    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
