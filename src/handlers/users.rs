// handlers/users.rs - /api/users

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::{models::AccountSummary, models::NewAccount, Store};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Principal};

/// GET /api/users - the authenticated account's public fields
pub async fn users_get(principal: Principal, State(store): State<Store>) -> ApiResult<AccountSummary> {
    let account = store
        .accounts
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(AccountSummary::from(account)))
}

/// POST /api/users - public registration
///
/// Input: `{ firstName, lastName, emailAddress, password }`.
/// 201 with `Location: /` and no body, or 400 `{ errors }`.
pub async fn users_post(
    State(store): State<Store>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> ApiResult<()> {
    let Json(new_account) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    match store.accounts.create(new_account).await {
        Ok(account) => {
            tracing::info!("Created user {} ({})", account.id, account.email_address);
            Ok(ApiResponse::created("/"))
        }
        Err(err) => {
            if let Some(messages) = err.field_messages() {
                tracing::debug!("User creation rejected: {:?}", messages);
            }
            Err(err.into())
        }
    }
}
