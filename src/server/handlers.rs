use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{ApiError, AppState};
use crate::classifier::ClassificationResult;
use crate::db::{self, Expense, NewExpense};
use crate::insights::CategoryTotals;

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Request / response shapes
// ============================================================================

#[derive(Deserialize)]
pub struct PredictCategoryRequest {
    description: Option<String>,
}

#[derive(Serialize)]
pub struct PredictCategoryResponse {
    #[serde(flatten)]
    prediction: ClassificationResult,
    description: String,
}

#[derive(Deserialize)]
pub struct SuggestAmountRequest {
    category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestAmountResponse {
    suggested_amount: f64,
    category: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    insight: String,
    category_totals: CategoryTotals,
    total_spent: f64,
    expense_count: usize,
}

#[derive(Serialize)]
pub struct MonthResponse {
    expenses: Vec<Expense>,
    total: f64,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: String,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    start: NaiveDate,
    end: NaiveDate,
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct AmountQuery {
    min: Option<f64>,
    max: Option<f64>,
}

// ============================================================================
// Misc
// ============================================================================

/// GET /api/ - Greeting
pub async fn home() -> &'static str {
    "Expense tracker API is running successfully!"
}

/// GET /api/hello
pub async fn hello() -> &'static str {
    "Hello from the expense tracker!"
}

/// GET /api/health - Health check, including a round trip to the database
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let count = state.with_db(db::count_expenses)?;

    Ok(Json(serde_json::json!({
        "status": "OK",
        "database": "connected",
        "expenses": count,
    })))
}

// ============================================================================
// CRUD
// ============================================================================

/// GET /api/expenses - All expenses in insertion order
pub async fn list_expenses(State(state): State<AppState>) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(db::get_all_expenses)?))
}

/// GET /api/expenses/:id
pub async fn get_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Expense>> {
    state
        .with_db(|conn| db::get_expense(conn, id))?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewExpense>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let expense = state.with_db(|conn| db::insert_expense(conn, &payload))?;
    tracing::info!(id = expense.id, category = %expense.category, "created expense");

    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id - Replace every field of an existing expense
pub async fn update_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewExpense>,
) -> ApiResult<Json<Expense>> {
    payload.validate()?;

    let updated = state
        .with_db(|conn| db::update_expense(conn, id, &payload))?
        .ok_or(ApiError::NotFound(id))?;
    tracing::info!(id, "updated expense");

    Ok(Json(updated))
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !state.with_db(|conn| db::delete_expense(conn, id))? {
        return Err(ApiError::NotFound(id));
    }

    tracing::info!(id, "deleted expense");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Finders and aggregates
// ============================================================================

/// GET /api/expenses/category/:category
pub async fn expenses_by_category(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(|conn| db::get_expenses_by_category(conn, &category))?))
}

/// GET /api/expenses/category/:category/total
pub async fn category_total(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> ApiResult<Json<f64>> {
    Ok(Json(state.with_db(|conn| db::get_total_amount_by_category(conn, &category))?))
}

/// GET /api/expenses/total
pub async fn total_expenses(State(state): State<AppState>) -> ApiResult<Json<f64>> {
    Ok(Json(state.with_db(db::get_total_expenses)?))
}

/// GET /api/expenses/count
pub async fn count_expenses(State(state): State<AppState>) -> ApiResult<Json<i64>> {
    Ok(Json(state.with_db(db::count_expenses)?))
}

/// GET /api/expenses/search?q=
pub async fn search_expenses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(|conn| db::search_expenses_by_description(conn, &query.q))?))
}

/// GET /api/expenses/range?start=&end=[&category=]
pub async fn expenses_in_date_range(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    if query.start > query.end {
        return Err(ApiError::bad_request("start must not be after end"));
    }

    let expenses = state.with_db(|conn| match &query.category {
        Some(category) => {
            db::get_expenses_by_category_and_date_range(conn, category, query.start, query.end)
        }
        None => db::get_expenses_by_date_range(conn, query.start, query.end),
    })?;

    Ok(Json(expenses))
}

/// GET /api/expenses/amount?min=&max=
///
/// Both bounds: inclusive range. One bound: strict comparison.
pub async fn expenses_by_amount(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AmountQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = match (query.min, query.max) {
        (Some(min), Some(max)) => {
            state.with_db(|conn| db::get_expenses_in_amount_range(conn, min, max))?
        }
        (Some(min), None) => state.with_db(|conn| db::get_expenses_greater_than(conn, min))?,
        (None, Some(max)) => state.with_db(|conn| db::get_expenses_less_than(conn, max))?,
        (None, None) => return Err(ApiError::bad_request("min or max is required")),
    };

    Ok(Json(expenses))
}

/// GET /api/expenses/date/:date
pub async fn expenses_on_date(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<NaiveDate>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(|conn| db::get_expenses_by_date(conn, date))?))
}

/// GET /api/expenses/month/current
pub async fn current_month_expenses(State(state): State<AppState>) -> ApiResult<Json<MonthResponse>> {
    let expenses = state.with_db(db::get_current_month_expenses)?;
    let total = db::sum_amounts(&expenses);

    Ok(Json(MonthResponse { expenses, total }))
}

/// GET /api/expenses/sorted/date - Newest first
pub async fn expenses_sorted_by_date(State(state): State<AppState>) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(db::get_expenses_ordered_by_date)?))
}

/// GET /api/expenses/sorted/amount - Highest first
pub async fn expenses_sorted_by_amount(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.with_db(db::get_expenses_ordered_by_amount)?))
}

// ============================================================================
// Keyword classifier
// ============================================================================

/// POST /api/expenses/ai/predict-category
///
/// Only a missing field is rejected; an empty description predicts `Other`.
pub async fn predict_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PredictCategoryRequest>,
) -> ApiResult<Json<PredictCategoryResponse>> {
    let description = request
        .description
        .ok_or_else(|| ApiError::bad_request("Description is required"))?;

    let prediction = state.classifier.classify(&description);
    tracing::debug!(
        category = prediction.predicted_category,
        confidence = prediction.confidence,
        "predicted category"
    );

    Ok(Json(PredictCategoryResponse {
        prediction,
        description,
    }))
}

/// POST /api/expenses/ai/suggest-amount
pub async fn suggest_amount(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SuggestAmountRequest>,
) -> ApiResult<Json<SuggestAmountResponse>> {
    let category = request
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Category is required"))?;

    Ok(Json(SuggestAmountResponse {
        suggested_amount: state.classifier.suggest_amount(&category),
        category,
    }))
}

/// GET /api/expenses/ai/insights
pub async fn spending_insights(State(state): State<AppState>) -> ApiResult<Json<InsightsResponse>> {
    let (category_totals, total_spent, expense_count) = state.with_db(|conn| {
        Ok((
            db::get_category_totals(conn)?,
            db::get_total_expenses(conn)?,
            db::count_expenses(conn)?,
        ))
    })?;

    let insight = state.insights.generate_insight(&category_totals, total_spent);

    Ok(Json(InsightsResponse {
        insight,
        category_totals,
        total_spent,
        expense_count: expense_count as usize,
    }))
}
