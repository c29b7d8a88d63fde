use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::account::{is_blank, Account, AccountSummary};

pub const TITLE_REQUIRED: &str = "A title is required";
pub const DESCRIPTION_REQUIRED: &str = "A description is required";
pub const OWNER_REQUIRED: &str = "An owner is required";
pub const OWNER_MISSING: &str = "The course owner does not exist";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course joined with some projection of its owning account
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithOwner<O> {
    #[serde(flatten)]
    pub course: Course,
    pub owner: O,
}

/// Element of the course list: owner reduced to the public summary
pub type CourseListing = CourseWithOwner<AccountSummary>;

/// Single course: full public owner record
pub type CourseDetail = CourseWithOwner<Account>;

/// Create/update payload for a course
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
}

impl CourseInput {
    /// Field-level checks, in field order. Owner existence is checked by the store.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if is_blank(&self.title) {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if is_blank(&self.description) {
            errors.push(DESCRIPTION_REQUIRED.to_string());
        }
        if self.user_id.is_none() {
            errors.push(OWNER_REQUIRED.to_string());
        }

        errors
    }

    /// Fill fields absent from an update payload with the stored values
    pub fn merged_with(&self, existing: &Course) -> CourseInput {
        CourseInput {
            title: Some(self.title.clone().unwrap_or_else(|| existing.title.clone())),
            description: Some(
                self.description
                    .clone()
                    .unwrap_or_else(|| existing.description.clone()),
            ),
            user_id: Some(self.user_id.unwrap_or(existing.user_id)),
        }
    }
}

/// Fields of a validated [`CourseInput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub user_id: i64,
}

impl TryFrom<CourseInput> for CourseFields {
    type Error = Vec<String>;

    fn try_from(input: CourseInput) -> Result<Self, Self::Error> {
        let errors = input.validate();
        match (input.title, input.description, input.user_id) {
            (Some(title), Some(description), Some(user_id)) if errors.is_empty() => Ok(Self {
                title,
                description,
                user_id,
            }),
            _ => Err(errors),
        }
    }
}
