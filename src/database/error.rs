use thiserror::Error;

/// Errors from store operations.
///
/// `Validation` and `UniqueConstraint` carry the per-field messages in the
/// order the fields were checked; handlers surface them to the client.
/// Every other kind is an unclassified failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Unique constraint violated: {}", .0.join(", "))]
    UniqueConstraint(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Field messages for validation-kind failures, `None` for everything else
    pub fn field_messages(&self) -> Option<&[String]> {
        match self {
            StoreError::Validation(messages) | StoreError::UniqueConstraint(messages) => Some(messages),
            _ => None,
        }
    }
}
