//! Scan routes: launch, poll, complete, remove, passive scans and live events.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use validator::Validate;

use crate::errors::AppError;
use crate::models::scan::{
    CompleteScan, CompletedScan, CreateScan, PassiveScanRequest, PassiveScanResponse, ScanDetail,
    ScanRecord,
};
use crate::services::scan as scan_service;
use crate::AppState;

/// POST /api/scans: start a full scan against a verified domain.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateScan>, JsonRejection>,
) -> Result<(StatusCode, Json<ScanRecord>), AppError> {
    let Json(body) = body?;
    let mut db = state.db.lock().await;
    let scan = scan_service::create(&mut db, &state.events, body, state.now())?;
    Ok((StatusCode::CREATED, Json(scan)))
}

/// POST /api/scans/passive: run a basic unauthenticated scan synchronously.
pub async fn passive(
    State(state): State<AppState>,
    body: Result<Json<PassiveScanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PassiveScanResponse>), AppError> {
    let Json(body) = body?;
    body.validate()?;
    let response = scan_service::run_passive(&body.target_url, state.now());
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/scans: list scans, advancing any that are running.
pub async fn list(State(state): State<AppState>) -> Json<Vec<ScanRecord>> {
    let mut db = state.db.lock().await;
    Json(scan_service::list(
        &mut db,
        &state.events,
        state.now(),
        state.config.completion_window(),
    ))
}

/// GET /api/scans/{id}: scan with its findings and AI summary.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScanDetail>, AppError> {
    let mut db = state.db.lock().await;
    let detail = scan_service::find_by_id(
        &mut db,
        &state.events,
        &id,
        state.now(),
        state.config.completion_window(),
    )?;
    Ok(Json(detail))
}

/// POST /api/scans/{id}/complete: attach externally produced findings.
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CompleteScan>, JsonRejection>,
) -> Result<Json<CompletedScan>, AppError> {
    let Json(body) = body?;
    let mut db = state.db.lock().await;
    let completed = scan_service::complete(
        &mut db,
        &state.events,
        &id,
        body.results,
        body.ai_summary,
        state.now(),
    )?;
    Ok(Json(completed))
}

/// DELETE /api/scans/{id}: remove a scan and its findings.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut db = state.db.lock().await;
    scan_service::remove(&mut db, &state.events, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/scans/events: Server-Sent Events stream of scan lifecycle events.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.events.subscribe();

    let stream = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let sse = Event::default().event("scan").json_data(&event);
                    return Some((sse, receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Scan event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}
