//! Route handlers for `/api/transactions`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{error::ApiError, AppState};
use crate::{
    csv_utils::write_csv,
    validation::{validate_new, validate_patch},
    NewTransaction, Transaction, TransactionPatch,
};

/// Query parameters of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

pub async fn create_transaction(
    State(state): State<AppState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(new) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    validate_new(&new)?;
    let created = state.service.create(new)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(state.service.get(&id)?))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (page, size) = state.pagination.resolve(query.page, query.size);
    Ok(Json(state.service.list(page, size)))
}

pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (page, size) = state.pagination.resolve(query.page, query.size);
    Ok(Json(state.service.list_by_account(&account_id, page, size)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TransactionPatch>, JsonRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let Json(patch) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    validate_patch(&patch)?;
    Ok(Json(state.service.update(&id, patch)?))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn count_transactions(State(state): State<AppState>) -> Json<usize> {
    Json(state.service.count())
}

/// Responds with every transaction as a CSV file.
pub async fn export_transactions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.service.snapshot();
    let mut body = Vec::new();
    write_csv(&mut body, snapshot.iter()).map_err(|error| ApiError::Export(error.to_string()))?;
    Ok(([(CONTENT_TYPE, "text/csv")], body))
}
