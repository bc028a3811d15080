// REST API with Axum
// Expense CRUD, finders and the keyword-classifier endpoints

mod error;
mod extract;
mod handlers;

pub use error::ApiError;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::classifier::KeywordClassifier;
use crate::config::AppConfig;
use crate::insights::InsightGenerator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    classifier: KeywordClassifier,
    insights: InsightGenerator,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            classifier: KeywordClassifier::new(),
            insights: InsightGenerator::new(),
        }
    }

    /// Run `f` against the connection while holding the lock
    fn with_db<T>(
        &self,
        f: impl FnOnce(&Connection) -> anyhow::Result<T>,
    ) -> Result<T, ApiError> {
        let conn = self
            .db
            .lock()
            .map_err(|_| anyhow::anyhow!("database mutex poisoned"))?;

        Ok(f(&conn)?)
    }
}

/// Routes mounted under `/api`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/hello", get(handlers::hello))
        .route("/health", get(handlers::health_check))
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route("/expenses/total", get(handlers::total_expenses))
        .route("/expenses/count", get(handlers::count_expenses))
        .route("/expenses/search", get(handlers::search_expenses))
        .route("/expenses/range", get(handlers::expenses_in_date_range))
        .route("/expenses/amount", get(handlers::expenses_by_amount))
        .route("/expenses/date/:date", get(handlers::expenses_on_date))
        .route("/expenses/month/current", get(handlers::current_month_expenses))
        .route("/expenses/sorted/date", get(handlers::expenses_sorted_by_date))
        .route("/expenses/sorted/amount", get(handlers::expenses_sorted_by_amount))
        .route(
            "/expenses/category/:category",
            get(handlers::expenses_by_category),
        )
        .route(
            "/expenses/category/:category/total",
            get(handlers::category_total),
        )
        .route("/expenses/ai/predict-category", post(handlers::predict_category))
        .route("/expenses/ai/suggest-amount", post(handlers::suggest_amount))
        .route("/expenses/ai/insights", get(handlers::spending_insights))
        .with_state(state)
}

/// Full application: API, static browser client, CORS and request tracing
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .nest("/api", api_router(state))
        .route("/api/", get(handlers::home))
        .nest_service("/static", ServeDir::new(&config.web.static_dir))
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
