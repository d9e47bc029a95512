use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use ido_sales_core::domain::sales::SalesEntry;
use ido_sales_core::report::{ReportKind, SalesReporter};

#[derive(Debug, Clone)]
pub struct AppState {
    pub reporter: Arc<SalesReporter>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn app_router(state: AppState, static_dir: Option<&str>) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/order", get(get_order_sales))
        .route("/api/invoice", get(get_invoice_sales))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_order_sales(State(state): State<AppState>) -> ApiResult<Vec<SalesEntry>> {
    sales(&state, ReportKind::Order, "Failed to load order data").await
}

async fn get_invoice_sales(State(state): State<AppState>) -> ApiResult<Vec<SalesEntry>> {
    sales(&state, ReportKind::Invoice, "Failed to load invoice data").await
}

async fn sales(
    state: &AppState,
    kind: ReportKind,
    failure: &'static str,
) -> ApiResult<Vec<SalesEntry>> {
    match state.reporter.report(kind, None).await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => {
            let err = anyhow::Error::new(e).context(format!("{kind} sales report failed"));
            sentry_anyhow::capture_anyhow(&err);
            let message = format!("{err:#}");
            tracing::error!(report = %kind, error = %message, "sales report failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError { error: failure }),
            ))
        }
    }
}
