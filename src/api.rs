//! The request dispatcher: one tagged request type per API action, the
//! `{success, data?, error?}` response envelope, and the axum handlers
//! that translate between the two.
//!
//! In-band failures never fail the transport: malformed bodies, unknown
//! actions and store errors all produce an HTTP 200 with `success: false`,
//! which is what the front-end expects.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Error,
    models::{
        ExpenseRef, ExpenseUpdate, InstallmentPurchase, Investment, InvestmentRef,
        MonthlyIncomeUpdate, NetWorthUpdate, NewExpense, NewInvestment, NewTransfer,
    },
    operations::{
        self, SavingsUpdate, add_expense, add_installment_purchase, add_investment, add_transfer,
        delete_expense, delete_investment, get_expenses, get_investments,
        get_monthly_income, get_net_worth, get_transfers, set_monthly_income,
        set_savings_dollars, update_expense, update_investment, update_net_worth,
    },
    state::AppState,
    store::RecordStore,
};

/// A fully parsed API request: the action name selects the variant and the
/// `data` object carries the variant's payload.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum ApiRequest {
    /// Read every entity kind in one call.
    GetAll,
    /// List every expense row.
    GetExpenses,
    /// Read the net-worth balances.
    GetPatrimonio,
    /// List every investment.
    GetInversiones,
    /// List every transfer.
    GetMovimientos,
    /// Read the monthly income map.
    GetIngresos,
    /// Liveness check.
    Test,
    /// Report per-table row and column counts.
    Debug,
    /// Record an expense, expanding installments synchronously.
    AddExpense(NewExpense),
    /// Record a purchase split into installments.
    AddExpenseWithCuotas(InstallmentPurchase),
    /// Update an expense row in place.
    UpdateExpense(ExpenseUpdate),
    /// Delete an expense row by its sheet row index.
    DeleteExpense(ExpenseRef),
    /// Update the net-worth balances.
    UpdatePatrimonio(NetWorthUpdate),
    /// Create an investment.
    AddInversion(NewInvestment),
    /// Update an investment by id.
    UpdateInversion(Investment),
    /// Delete an investment by id.
    DeleteInversion(InvestmentRef),
    /// Create a transfer.
    AddMovimiento(NewTransfer),
    /// Set the income of one month.
    SetMonthlyIncome(MonthlyIncomeUpdate),
    /// Set the dollars-held-as-savings config value.
    SetDolaresAhorro(SavingsUpdate),
}

/// The envelope every API response is wrapped in.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// Whether the requested operation succeeded.
    pub success: bool,
    /// The operation's result, for reads and creations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// A human-readable description of what went wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    fn success(data: Value) -> Self {
        Self {
            success: true,
            data: (!data.is_null()).then_some(data),
            error: None,
        }
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Parse a raw request value into an [ApiRequest].
///
/// The legacy API accepted payload fields either nested under `data` or
/// inline next to `action`; inline fields are moved under `data` before
/// parsing so both shapes keep working.
///
/// # Errors
/// Returns an [Error::UnrecognizedAction] if the action name is missing or
/// not part of the API, or an [Error::InvalidPayload] if the payload does
/// not fit the action.
pub fn parse_request(mut value: Value) -> Result<ApiRequest, Error> {
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    if value.get("data").is_none()
        && let Some(fields) = value.as_object_mut()
    {
        let mut data = fields.clone();
        data.remove("action");

        if !data.is_empty() {
            fields.insert("data".to_owned(), Value::Object(data));
        }
    }

    serde_json::from_value(value).map_err(|error| {
        let message = error.to_string();

        if action.is_empty() || message.starts_with("unknown variant") {
            Error::UnrecognizedAction(action)
        } else {
            Error::InvalidPayload(action, message)
        }
    })
}

/// Run a parsed request against the store and serialize its result.
///
/// Mutating actions without a natural result produce [Value::Null], which
/// the envelope omits.
pub fn dispatch<S: RecordStore>(store: &mut S, request: ApiRequest) -> Result<Value, Error> {
    match request {
        ApiRequest::GetAll => to_value(operations::get_all(store)?),
        ApiRequest::GetExpenses => to_value(get_expenses(store)?),
        ApiRequest::GetPatrimonio => to_value(get_net_worth(store)?),
        ApiRequest::GetInversiones => to_value(get_investments(store)?),
        ApiRequest::GetMovimientos => to_value(get_transfers(store)?),
        ApiRequest::GetIngresos => to_value(get_monthly_income(store)?),
        ApiRequest::Test => Ok(json!({
            "message": "API online",
            "timestamp": operations::timestamp_cell(),
        })),
        ApiRequest::Debug => to_value(operations::debug_report(store)?),
        ApiRequest::AddExpense(new) => to_value(add_expense(store, new)?),
        ApiRequest::AddExpenseWithCuotas(purchase) => {
            to_value(add_installment_purchase(store, purchase)?)
        }
        ApiRequest::UpdateExpense(update) => update_expense(store, update).map(|_| Value::Null),
        ApiRequest::DeleteExpense(reference) => {
            delete_expense(store, reference.row_index).map(|_| Value::Null)
        }
        ApiRequest::UpdatePatrimonio(update) => {
            update_net_worth(store, update).map(|_| Value::Null)
        }
        ApiRequest::AddInversion(new) => to_value(json!({ "id": add_investment(store, new)? })),
        ApiRequest::UpdateInversion(investment) => {
            update_investment(store, investment).map(|_| Value::Null)
        }
        ApiRequest::DeleteInversion(reference) => {
            delete_investment(store, reference.id).map(|_| Value::Null)
        }
        ApiRequest::AddMovimiento(new) => to_value(json!({ "id": add_transfer(store, new)? })),
        ApiRequest::SetMonthlyIncome(update) => {
            set_monthly_income(store, update).map(|_| Value::Null)
        }
        ApiRequest::SetDolaresAhorro(update) => {
            set_savings_dollars(store, update.amount).map(|_| Value::Null)
        }
    }
}

/// Handle `POST /api`: a JSON body of `{action, data?}`.
pub async fn handle_post<S>(State(state): State<AppState<S>>, body: String) -> Json<ApiResponse>
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    let response = match serde_json::from_str::<Value>(&body) {
        Ok(value) => respond(state, value),
        Err(error) => ApiResponse::failure(format!("invalid request body: {error}")),
    };

    Json(response)
}

/// Handle `GET /api?action=...&data=...`: the legacy read path, with the
/// optional `data` parameter carrying URL-encoded JSON.
pub async fn handle_get<S>(
    State(state): State<AppState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ApiResponse>
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    let mut request = json!({
        "action": params.get("action").cloned().unwrap_or_default(),
    });

    if let Some(data) = params.get("data") {
        match serde_json::from_str::<Value>(data) {
            Ok(value) => request["data"] = value,
            Err(error) => {
                return Json(ApiResponse::failure(format!(
                    "invalid data parameter: {error}"
                )));
            }
        }
    }

    Json(respond(state, request))
}

fn respond<S>(state: AppState<S>, value: Value) -> ApiResponse
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_owned();
    tracing::info!(action, "dispatching request");

    let mut store = state.store;

    match parse_request(value).and_then(|request| dispatch(&mut store, request)) {
        Ok(data) => ApiResponse::success(data),
        Err(error) => {
            if matches!(error, Error::SqlError(_) | Error::DatabaseLockError) {
                tracing::error!(action, %error, "request failed");
            }

            ApiResponse::failure(error)
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|error| Error::SerializationError(error.to_string()))
}
