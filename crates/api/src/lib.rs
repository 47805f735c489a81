use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use screener_core::domain::params::{ScreenForm, PERIOD_LABELS, TRADING_DAYS_PER_MONTH};
use screener_core::ingest::provider::PriceSource;
use screener_core::screen::{run_screen, ScreenOptions, ScreenReport};
use screener_core::ScreenerError;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no price source could be configured; screening answers 503.
    pub source: Option<Arc<dyn PriceSource>>,
    pub options: ScreenOptions,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/periods", get(get_periods))
        .route("/screen", get(screen_from_query).post(screen_from_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ApiPeriods {
    labels: &'static [&'static str],
    trading_days_per_month: usize,
    defaults: ScreenForm,
}

async fn get_periods() -> Json<ApiPeriods> {
    Json(ApiPeriods {
        labels: &PERIOD_LABELS,
        trading_days_per_month: TRADING_DAYS_PER_MONTH,
        defaults: ScreenForm::default(),
    })
}

#[derive(Debug, Serialize)]
pub struct ApiScreen {
    pub form: ScreenForm,
    pub report: ScreenReport,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<ScreenerError> for ApiError {
    fn from(err: ScreenerError) -> Self {
        let status = if err.is_fatal() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

async fn screen_from_query(
    State(state): State<AppState>,
    Query(form): Query<ScreenForm>,
) -> Result<Json<ApiScreen>, ApiError> {
    screen(state, form).await
}

async fn screen_from_json(
    State(state): State<AppState>,
    Json(form): Json<ScreenForm>,
) -> Result<Json<ApiScreen>, ApiError> {
    screen(state, form).await
}

async fn screen(state: AppState, form: ScreenForm) -> Result<Json<ApiScreen>, ApiError> {
    let Some(source) = &state.source else {
        return Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "no price source configured".to_string(),
        });
    };

    let request = form.to_request().map_err(|e| {
        tracing::info!(error = %e, "rejected screen request");
        ApiError::from(e)
    })?;

    let report = run_screen(source.as_ref(), &request, &state.options).await?;

    Ok(Json(ApiScreen { form, report }))
}
