use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::models::account::EMAIL_IN_USE;
use super::models::course::OWNER_MISSING;
use super::models::{
    Account, AccountSummary, Course, CourseDetail, CourseFields, CourseInput, CourseListing,
    CourseWithOwner, NewAccount,
};
use super::repository::{AccountRepository, CourseRepository};
use crate::auth::password;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    courses: BTreeMap<i64, Course>,
    next_account_id: i64,
    next_course_id: i64,
}

impl Tables {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.email_address == email)
    }
}

/// In-process store applying the same validation rules as [`super::PgStore`].
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.account_by_email(email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let errors = account.validate();
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }
        let NewAccount {
            first_name: Some(first_name),
            last_name: Some(last_name),
            email_address: Some(email_address),
            password: Some(plaintext),
        } = account
        else {
            return Err(StoreError::Validation(Vec::new()));
        };

        let password_hash =
            password::hash_password(&plaintext).map_err(|e| StoreError::PasswordHash(e.to_string()))?;

        let mut tables = self.tables.write().await;
        if tables.account_by_email(&email_address).is_some() {
            return Err(StoreError::UniqueConstraint(vec![EMAIL_IN_USE.to_string()]));
        }

        tables.next_account_id += 1;
        let now = Utc::now();
        let account = Account {
            id: tables.next_account_id,
            first_name,
            last_name,
            email_address,
            password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<CourseListing>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter_map(|course| {
                let owner = tables.accounts.get(&course.user_id)?;
                Some(CourseWithOwner {
                    course: course.clone(),
                    owner: AccountSummary::from(owner),
                })
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseDetail>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).and_then(|course| {
            let owner = tables.accounts.get(&course.user_id)?;
            Some(CourseWithOwner {
                course: course.clone(),
                owner: owner.clone(),
            })
        }))
    }

    async fn create(&self, input: CourseInput) -> Result<Course, StoreError> {
        let fields = CourseFields::try_from(input).map_err(StoreError::Validation)?;

        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&fields.user_id) {
            return Err(StoreError::Validation(vec![OWNER_MISSING.to_string()]));
        }

        tables.next_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: tables.next_course_id,
            title: fields.title,
            description: fields.description,
            user_id: fields.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update(&self, id: i64, input: CourseInput) -> Result<Course, StoreError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .courses
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("course {id}")))?;

        let fields =
            CourseFields::try_from(input.merged_with(existing)).map_err(StoreError::Validation)?;
        if !tables.accounts.contains_key(&fields.user_id) {
            return Err(StoreError::Validation(vec![OWNER_MISSING.to_string()]));
        }

        let course = tables
            .courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("course {id}")))?;
        course.title = fields.title;
        course.description = fields.description;
        course.user_id = fields.user_id;
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .courses
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("course {id}")))
    }
}
