use async_trait::async_trait;
use std::sync::Arc;

use super::error::StoreError;
use super::memory::MemoryStore;
use super::models::{Account, Course, CourseDetail, CourseInput, CourseListing, NewAccount};
use super::postgres::PgStore;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Exact (case-sensitive) match on the login identifier
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Validate, hash the plaintext password and insert.
    /// A duplicate email is a `UniqueConstraint` failure.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses in id order, each joined with its owner summary
    async fn list(&self) -> Result<Vec<CourseListing>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseDetail>, StoreError>;

    /// Validate and insert. An unknown owner is a `Validation` failure.
    async fn create(&self, input: CourseInput) -> Result<Course, StoreError>;

    /// Load by id, apply the present fields, validate and save.
    /// `NotFound` when the id does not resolve.
    async fn update(&self, id: i64, input: CourseInput) -> Result<Course, StoreError>;

    /// `NotFound` when the id does not resolve
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Persistence capability injected into the router as state
#[derive(Clone)]
pub struct Store {
    pub accounts: Arc<dyn AccountRepository>,
    pub courses: Arc<dyn CourseRepository>,
}

impl Store {
    pub fn new(accounts: Arc<dyn AccountRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { accounts, courses }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    pub fn memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    pub fn from_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.accounts.health_check().await
    }
}
