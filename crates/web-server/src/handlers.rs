use crate::{
    error::{AppError, SUMMARY_FAILURE},
    extract::{ApiJson, ApiQuery},
    AppState,
};
use analytics::{CategoryTotal, FinancialSummaryReport, TimeSeriesPoint};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use core_types::{
    DateRange, ExpenseRecord, IncomeRecord, NewExpense, NewIncome, NewProperty, Property,
};
use reporter::SummaryRequest;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Date window for the ledger listings; defaults to the current month.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    #[serde(default, deserialize_with = "core_types::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "core_types::optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    fn resolve(&self) -> Result<DateRange, AppError> {
        Ok(DateRange::resolve(self.start_date, self.end_date, today())?)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// # GET /api/portfolio/financial-summary
pub async fn get_financial_summary(
    State(state): State<Arc<AppState>>,
    ApiQuery(request): ApiQuery<SummaryRequest>,
) -> Result<Json<FinancialSummaryReport>, AppError> {
    let report = state
        .reporter
        .financial_summary(state.store.as_ref(), &request, today())
        .await
        .map_err(AppError::reporter(SUMMARY_FAILURE))?;
    Ok(Json(report))
}

/// # GET /api/portfolio/cash-flow
/// Only the time series of the summary, for the cash-flow chart.
pub async fn get_cash_flow(
    State(state): State<Arc<AppState>>,
    ApiQuery(request): ApiQuery<SummaryRequest>,
) -> Result<Json<Vec<TimeSeriesPoint>>, AppError> {
    let series = state
        .reporter
        .cash_flow_series(state.store.as_ref(), &request, today())
        .await
        .map_err(AppError::reporter("Failed to fetch portfolio cash flow"))?;
    Ok(Json(series))
}

/// # GET /api/portfolio/expense-breakdown
pub async fn get_expense_breakdown(
    State(state): State<Arc<AppState>>,
    ApiQuery(request): ApiQuery<SummaryRequest>,
) -> Result<Json<Vec<CategoryTotal>>, AppError> {
    let breakdown = state
        .reporter
        .expense_breakdown(state.store.as_ref(), &request, today())
        .await
        .map_err(AppError::reporter("Failed to fetch expense breakdown"))?;
    Ok(Json(breakdown))
}

/// # GET /api/properties
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = state
        .store
        .list_properties()
        .await
        .map_err(AppError::database("Failed to fetch properties"))?;
    Ok(Json(properties))
}

/// # GET /api/properties/:id
pub async fn get_property(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Property>, AppError> {
    let property = state
        .store
        .get_property(id)
        .await
        .map_err(AppError::database("Failed to fetch property"))?;
    Ok(Json(property))
}

/// # POST /api/properties
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewProperty>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    payload.validate()?;
    let property = state
        .store
        .create_property(payload)
        .await
        .map_err(AppError::database("Failed to create property"))?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// # GET /api/income
pub async fn list_income(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<IncomeRecord>>, AppError> {
    let range = query.resolve()?;
    let rows = state
        .store
        .list_income(range)
        .await
        .map_err(AppError::database("Failed to fetch income"))?;
    Ok(Json(rows))
}

/// # POST /api/income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewIncome>,
) -> Result<(StatusCode, Json<IncomeRecord>), AppError> {
    payload.validate()?;
    let row = state
        .store
        .create_income(payload)
        .await
        .map_err(AppError::database("Failed to record income"))?;
    tracing::info!(income_id = %row.id, property_id = %row.property_id, amount = %row.amount, "Income recorded.");
    Ok((StatusCode::CREATED, Json(row)))
}

/// # GET /api/expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<ExpenseRecord>>, AppError> {
    let range = query.resolve()?;
    let rows = state
        .store
        .list_expenses(range)
        .await
        .map_err(AppError::database("Failed to fetch expenses"))?;
    Ok(Json(rows))
}

/// # POST /api/expenses
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewExpense>,
) -> Result<(StatusCode, Json<ExpenseRecord>), AppError> {
    payload.validate()?;
    let row = state
        .store
        .create_expense(payload)
        .await
        .map_err(AppError::database("Failed to record expense"))?;
    tracing::info!(expense_id = %row.id, property_id = %row.property_id, amount = %row.amount, "Expense recorded.");
    Ok((StatusCode::CREATED, Json(row)))
}
