//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Columns selected for every user read, including the derived full name
pub(crate) const USER_COLUMNS: &str =
    "id, first_name, last_name, first_name || ' ' || last_name AS full_name, email, created_at";

/// Library user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// "first_name last_name"
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50, message = "First name is required (max 50 characters)"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required (max 50 characters)"))]
    pub last_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,
}

/// Update user request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    /// Must match the path id when present
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(first: &str, last: &str, email: &str) -> CreateUser {
        CreateUser {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
        }
    }

    #[test]
    fn test_create_user_validation() {
        assert!(create("Ann", "A", "a@x.com").validate().is_ok());
        assert!(create("", "A", "a@x.com").validate().is_err());
        assert!(create("Ann", "A", "not-an-email").validate().is_err());
        assert!(create(&"n".repeat(51), "A", "a@x.com").validate().is_err());
    }

    #[test]
    fn test_update_user_validates_present_fields_only() {
        let update = UpdateUser {
            last_name: Some("B".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert!(!update.is_empty());

        let bad = UpdateUser {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(UpdateUser::default().is_empty());
    }

    #[test]
    fn test_create_user_requires_all_fields() {
        let parsed = serde_json::from_str::<CreateUser>(r#"{"first_name":"Ann","last_name":"A"}"#);
        assert!(parsed.is_err());
    }
}
