use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use service::bank_account::{BankAccountRequest, BankAccountResponse};
use service::errors::ServiceError;
use tracing::info;

use crate::{errors::JsonApiError, state::ServerState};

/// Ids outside the key range cannot name a stored account.
fn account_id(raw: i64) -> Result<i32, JsonApiError> {
    i32::try_from(raw).map_err(|_| ServiceError::not_found("bank_account", raw).into())
}

#[utoipa::path(
    get, path = "/api/accounts", tag = "accounts",
    responses(
        (status = 200, description = "All accounts in creation order", body = [crate::openapi::BankAccountResponseDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<BankAccountResponse>>, JsonApiError> {
    let accounts = state.accounts.get_all_accounts().await?;
    Ok(Json(accounts))
}

#[utoipa::path(
    post, path = "/api/accounts", tag = "accounts",
    request_body = crate::openapi::BankAccountRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BankAccountResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Account number already exists")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<BankAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BankAccountResponse>), JsonApiError> {
    let Json(input) = payload?;
    let created = state.accounts.create_account(input).await?;
    info!(id = created.id, "created bank account");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BankAccountResponseDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BankAccountResponse>, JsonApiError> {
    let Path(id) = id?;
    let id = account_id(id)?;
    let account = state.accounts.get_account_by_id(id).await?;
    Ok(Json(account))
}

#[utoipa::path(
    put, path = "/api/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = crate::openapi::BankAccountRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BankAccountResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Account number already exists")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BankAccountRequest>, JsonRejection>,
) -> Result<Json<BankAccountResponse>, JsonApiError> {
    let Path(id) = id?;
    let id = account_id(id)?;
    let Json(input) = payload?;
    let updated = state.accounts.update_account(id, input).await?;
    info!(id = updated.id, "updated bank account");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    let id = account_id(id)?;
    state.accounts.delete_account(id).await?;
    info!(id, "deleted bank account");
    Ok(StatusCode::NO_CONTENT)
}
