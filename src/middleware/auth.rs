use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::ops::Deref;
use thiserror::Error;

use crate::auth::{password, Credentials};
use crate::database::{models::Account, AccountRepository, Store, StoreError};
use crate::error::ApiError;

/// Account resolved from the request's Basic credentials.
///
/// Taking a `Principal` argument makes a handler require authentication;
/// the extraction fails with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct Principal(pub Account);

impl Deref for Principal {
    type Target = Account;

    fn deref(&self) -> &Account {
        &self.0
    }
}

/// Why a request was not authenticated. Logged, never sent to the client.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("Auth header not found")]
    MissingHeader,

    #[error("No user found with email address: {0}")]
    UnknownAccount(String),

    #[error("Authentication failure for username: {0}")]
    PasswordMismatch(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::Store(err) => err.into(),
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

/// Resolve the principal for a request carrying Basic credentials.
///
/// Each call is independent: parse the header, look the account up by email,
/// verify the secret against the stored hash.
pub async fn authenticate(
    headers: &HeaderMap,
    accounts: &dyn AccountRepository,
) -> Result<Principal, AuthRejection> {
    let result = verify(headers, accounts).await;

    match &result {
        Ok(principal) => {
            tracing::debug!("Authentication successful for username: {}", principal.email_address)
        }
        Err(AuthRejection::Store(err)) => tracing::error!("Authentication lookup failed: {}", err),
        Err(rejection) => tracing::warn!("{}", rejection),
    }

    result
}

async fn verify(
    headers: &HeaderMap,
    accounts: &dyn AccountRepository,
) -> Result<Principal, AuthRejection> {
    let credentials = Credentials::from_headers(headers).ok_or(AuthRejection::MissingHeader)?;

    let Some(account) = accounts.find_by_email(&credentials.name).await? else {
        password::verify_dummy(&credentials.pass);
        return Err(AuthRejection::UnknownAccount(credentials.name));
    };

    let matches = password::verify_password(&credentials.pass, &account.password_hash)
        .unwrap_or_else(|e| {
            tracing::error!("Account {} has an unusable password hash: {}", account.id, e);
            false
        });

    if !matches {
        return Err(AuthRejection::PasswordMismatch(account.email_address));
    }

    Ok(Principal(account))
}

#[async_trait]
impl FromRequestParts<Store> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, store: &Store) -> Result<Self, Self::Rejection> {
        Ok(authenticate(&parts.headers, store.accounts.as_ref()).await?)
    }
}
