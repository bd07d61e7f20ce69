//! HTTP request handlers for the site payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::{NewTransaction, PayrollRequest};
use crate::error::{EngineError, EngineResult};

use super::request::{PunchInRequest, ReassignRequest, WorkerFilter};
use super::response::ApiErrorResponse;
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/punch-in", post(punch_in_handler))
        .route("/attendance/:id/punch-out", post(punch_out_handler))
        .route("/attendance/active", get(active_handler))
        .route("/attendance/completed", get(completed_handler))
        .route("/workers/:id/accrual", get(accrual_handler))
        .route("/workers/:id/ledger", get(worker_ledger_handler))
        .route("/workers/:id/site", put(reassign_handler))
        .route("/payroll", post(payroll_handler))
        .route(
            "/transactions",
            get(list_transactions_handler).post(record_transaction_handler),
        )
        .route("/sites/:id/summary", get(site_summary_handler))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}

/// Turns an engine result into a JSON response, logging failures.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    success: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                status = success.as_u16(),
                "Request completed"
            );
            (
                success,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            if matches!(
                err,
                EngineError::Storage { .. }
                    | EngineError::ConfigNotFound { .. }
                    | EngineError::ConfigParseError { .. }
            ) {
                error!(
                    correlation_id = %correlation_id,
                    operation,
                    error = %err,
                    "Request failed"
                );
            } else {
                warn!(
                    correlation_id = %correlation_id,
                    operation,
                    error = %err,
                    "Request rejected"
                );
            }
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rejected request body"
            );
            Err(ApiErrorResponse::from(rejection).into_response())
        }
    }
}

/// Handler for POST /attendance/punch-in.
async fn punch_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchInRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        worker_id = %request.worker_id,
        "Processing punch-in"
    );

    let provider = request.provider();
    let result = state
        .engine()
        .attendance
        .punch_in(&request.worker_id, &provider)
        .await;
    respond(correlation_id, "punch_in", StatusCode::CREATED, result)
}

/// Handler for POST /attendance/:id/punch-out.
async fn punch_out_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %id, "Processing punch-out");

    let result = state.engine().attendance.punch_out(&id).await;
    respond(correlation_id, "punch_out", StatusCode::OK, result)
}

/// Handler for GET /attendance/active.
async fn active_handler(
    State(state): State<AppState>,
    Query(filter): Query<WorkerFilter>,
) -> Response {
    let result = state
        .engine()
        .attendance
        .active_records(filter.worker_id.as_deref())
        .await;
    respond(Uuid::new_v4(), "active_records", StatusCode::OK, result)
}

/// Handler for GET /attendance/completed.
async fn completed_handler(
    State(state): State<AppState>,
    Query(filter): Query<WorkerFilter>,
) -> Response {
    let result = state
        .engine()
        .attendance
        .completed_records(filter.worker_id.as_deref())
        .await;
    respond(Uuid::new_v4(), "completed_records", StatusCode::OK, result)
}

/// Handler for GET /workers/:id/accrual.
async fn accrual_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.engine().payroll.accrual(&id).await;
    respond(Uuid::new_v4(), "accrual", StatusCode::OK, result)
}

/// Handler for GET /workers/:id/ledger.
async fn worker_ledger_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.engine().books.worker_ledger(&id).await;
    respond(Uuid::new_v4(), "worker_ledger", StatusCode::OK, result)
}

/// Handler for PUT /workers/:id/site.
async fn reassign_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = state
        .engine()
        .roster
        .reassign(&id, request.site_id.as_deref())
        .await
        .map(|mut worker| {
            // Credentials stay in the store.
            worker.credential = None;
            worker
        });
    respond(correlation_id, "reassign", StatusCode::OK, result)
}

/// Handler for POST /payroll.
///
/// Returns the receipt; a receipt with `unsettled_attendance_ids` means the
/// transaction was written but some records still need to be marked paid.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        worker_id = %request.worker_id,
        kind = request.kind.label(),
        amount = %request.amount,
        "Processing payroll"
    );

    let result = state.engine().payroll.settle(request).await;
    respond(correlation_id, "settle", StatusCode::CREATED, result)
}

/// Handler for GET /transactions.
async fn list_transactions_handler(State(state): State<AppState>) -> Response {
    let result = state.engine().books.transactions_recent_first().await;
    respond(Uuid::new_v4(), "list_transactions", StatusCode::OK, result)
}

/// Handler for POST /transactions.
async fn record_transaction_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let entry = match parse_body(correlation_id, payload) {
        Ok(entry) => entry,
        Err(response) => return response,
    };

    let result = state.engine().books.record_transaction(entry).await;
    respond(correlation_id, "record_transaction", StatusCode::CREATED, result)
}

/// Handler for GET /sites/:id/summary.
async fn site_summary_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.engine().books.site_summary(&id).await;
    respond(Uuid::new_v4(), "site_summary", StatusCode::OK, result)
}

/// Handler for GET /dashboard.
async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let result = state.engine().books.portfolio().await;
    respond(Uuid::new_v4(), "dashboard", StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::clock::ManualClock;
    use crate::config::EngineConfig;
    use crate::engine::SiteEngine;
    use crate::engine::testing::seed;
    use crate::models::Attendance;
    use crate::storage::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let store = Arc::new(InMemoryStore::new(seed()));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap(),
        ));
        create_router(AppState::new(SiteEngine::new(
            store,
            clock,
            EngineConfig::default(),
        )))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_punch_in_returns_201() {
        let response = create_test_router()
            .oneshot(post_json(
                "/attendance/punch-in",
                r#"{"worker_id": "w1", "position": {"latitude": 34.0522, "longitude": -118.2437}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let record: Attendance = serde_json::from_slice(&body).unwrap();
        assert_eq!(record.worker_id, "w1");
        assert!(record.is_open());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = create_test_router()
            .oneshot(post_json("/attendance/punch-in", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_worker_id_returns_400() {
        let response = create_test_router()
            .oneshot(post_json("/payroll", r#"{"amount": "10", "kind": "ADVANCE"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("worker_id"));
    }

    #[tokio::test]
    async fn test_unknown_site_summary_returns_404() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .uri("/sites/s404/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
