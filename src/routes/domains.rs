//! Domain routes: registry listing, verification, rename and removal.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::domain::{Domain, UpdateDomain, VerifyDomain};
use crate::models::scan::ScanRecord;
use crate::services::{domain as domain_service, scan as scan_service};
use crate::AppState;

/// GET /api/domains: list all domains.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Domain>> {
    let db = state.db.lock().await;
    Json(domain_service::list(&db))
}

/// GET /api/domains/{id}: get domain by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Domain>, AppError> {
    let db = state.db.lock().await;
    Ok(Json(domain_service::find_by_id(&db, &id)?))
}

/// POST /api/domains/verify: check the TXT token and advance verification.
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyDomain>, JsonRejection>,
) -> Result<Json<Domain>, AppError> {
    let Json(body) = body?;
    let mut db = state.db.lock().await;
    let domain = domain_service::verify(
        &mut db,
        &body.domain,
        &body.token,
        &state.config,
        state.now(),
    )?;
    Ok(Json(domain))
}

/// PATCH /api/domains/{id}: rename a domain (resets verification).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDomain>, JsonRejection>,
) -> Result<Json<Domain>, AppError> {
    let Json(body) = body?;
    let mut db = state.db.lock().await;
    Ok(Json(domain_service::update(&mut db, &id, &body.domain)?))
}

/// DELETE /api/domains/{id}: remove a domain and all its scans.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut db = state.db.lock().await;
    domain_service::remove(&mut db, &state.events, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/domains/{id}/scans: scans owned by one domain.
pub async fn list_scans(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ScanRecord>>, AppError> {
    let mut db = state.db.lock().await;
    let scans = domain_service::scans_for_domain(
        &mut db,
        &state.events,
        &id,
        state.now(),
        state.config.completion_window(),
    )?;
    Ok(Json(scans))
}

/// DELETE /api/domains/{id}/scans: bulk-remove a domain's scans.
pub async fn remove_scans(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut db = state.db.lock().await;
    scan_service::remove_all_for_domain(&mut db, &state.events, &id);
    StatusCode::NO_CONTENT
}
