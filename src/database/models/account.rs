use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const FIRST_NAME_REQUIRED: &str = "A first name is required";
pub const LAST_NAME_REQUIRED: &str = "A last name is required";
pub const EMAIL_REQUIRED: &str = "An email address is required";
pub const EMAIL_INVALID: &str = "Please provide a valid email address";
pub const PASSWORD_REQUIRED: &str = "A password is required";
pub const EMAIL_IN_USE: &str = "Email address already in use";

/// Stored account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of an account: exactly id, names and email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email_address: account.email_address.clone(),
        }
    }
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email_address: account.email_address,
        }
    }
}

/// Registration payload. Every field is optional at the wire level so a
/// missing field becomes a validation message instead of a parse failure.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl NewAccount {
    /// Field-level checks, in field order. Uniqueness is the store's job.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if is_blank(&self.first_name) {
            errors.push(FIRST_NAME_REQUIRED.to_string());
        }
        if is_blank(&self.last_name) {
            errors.push(LAST_NAME_REQUIRED.to_string());
        }
        match self.email_address.as_deref().map(str::trim) {
            None | Some("") => errors.push(EMAIL_REQUIRED.to_string()),
            Some(email) if !is_valid_email(email) => errors.push(EMAIL_INVALID.to_string()),
            Some(_) => {}
        }
        // Whitespace is a legal password character, only emptiness is rejected
        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.push(PASSWORD_REQUIRED.to_string());
        }

        errors
    }
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Loose structural check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
