//! Readiness check with a real database probe.

use crate::state::AppState;
use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::AppError;
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

/// `GET /ready`: 200 when PostgreSQL answers `SELECT 1`, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}
