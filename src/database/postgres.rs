use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::info;

use super::error::StoreError;
use super::models::account::EMAIL_IN_USE;
use super::models::course::OWNER_MISSING;
use super::models::{
    Account, AccountSummary, Course, CourseDetail, CourseFields, CourseInput, CourseListing,
    CourseWithOwner, NewAccount,
};
use super::repository::{AccountRepository, CourseRepository};
use crate::auth::password;
use crate::config::DatabaseConfig;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id            BIGSERIAL PRIMARY KEY,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        email_address TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_COURSES: &str = r#"
    CREATE TABLE IF NOT EXISTS courses (
        id          BIGSERIAL PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        user_id     BIGINT NOT NULL REFERENCES users (id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, email_address, password_hash, created_at, updated_at";

const COURSE_COLUMNS: &str = "id, title, description, user_id, created_at, updated_at";

const COURSE_WITH_OWNER: &str = r#"
    SELECT c.id, c.title, c.description, c.user_id, c.created_at, c.updated_at,
           u.first_name    AS owner_first_name,
           u.last_name     AS owner_last_name,
           u.email_address AS owner_email_address,
           u.password_hash AS owner_password_hash,
           u.created_at    AS owner_created_at,
           u.updated_at    AS owner_updated_at
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

/// Flat row of a course joined with its owner
#[derive(FromRow)]
struct CourseOwnerRow {
    id: i64,
    title: String,
    description: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
    owner_password_hash: String,
    owner_created_at: DateTime<Utc>,
    owner_updated_at: DateTime<Utc>,
}

impl CourseOwnerRow {
    fn split(self) -> (Course, Account) {
        let owner = Account {
            id: self.user_id,
            first_name: self.owner_first_name,
            last_name: self.owner_last_name,
            email_address: self.owner_email_address,
            password_hash: self.owner_password_hash,
            created_at: self.owner_created_at,
            updated_at: self.owner_updated_at,
        };
        let course = Course {
            id: self.id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (course, owner)
    }
}

/// Postgres-backed store over the `users` and `courses` tables
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected database pool (max {} connections)", config.max_connections);
        Ok(Self::new(pool))
    }

    /// Create the tables when they do not exist yet. Existing tables are left alone.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_USERS, CREATE_COURSES] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Classify constraint violations reported by Postgres as validation-kind failures
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueConstraint(vec![EMAIL_IN_USE.to_string()]);
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::Validation(vec![OWNER_MISSING.to_string()]);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email_address = $1");
        Ok(sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
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

        let sql = format!(
            "INSERT INTO users (first_name, last_name, email_address, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(first_name)
            .bind(last_name)
            .bind(email_address)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for PgStore {
    async fn list(&self) -> Result<Vec<CourseListing>, StoreError> {
        let sql = format!("{COURSE_WITH_OWNER} ORDER BY c.id");
        let rows = sqlx::query_as::<_, CourseOwnerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (course, owner) = row.split();
                CourseWithOwner {
                    course,
                    owner: AccountSummary::from(owner),
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseDetail>, StoreError> {
        let sql = format!("{COURSE_WITH_OWNER} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            let (course, owner) = row.split();
            CourseWithOwner { course, owner }
        }))
    }

    async fn create(&self, input: CourseInput) -> Result<Course, StoreError> {
        let fields = CourseFields::try_from(input).map_err(StoreError::Validation)?;

        let sql = format!(
            "INSERT INTO courses (title, description, user_id) \
             VALUES ($1, $2, $3) RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&sql)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update(&self, id: i64, input: CourseInput) -> Result<Course, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 FOR UPDATE");
        let existing = sqlx::query_as::<_, Course>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("course {id}")))?;

        let fields =
            CourseFields::try_from(input.merged_with(&existing)).map_err(StoreError::Validation)?;

        let update = format!(
            "UPDATE courses SET title = $1, description = $2, user_id = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING {COURSE_COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&update)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.user_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await?;
        Ok(course)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("course {id}")));
        }
        Ok(())
    }
}
