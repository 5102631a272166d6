//! Sibling links between users

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Stored sibling link, always with `user_id_1 < user_id_2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sibling {
    pub sibling_id: i32,
    pub user_id_1: i32,
    pub user_id_2: i32,
}

impl Sibling {
    pub fn pair(&self) -> SiblingPair {
        SiblingPair {
            low: self.user_id_1,
            high: self.user_id_2,
        }
    }
}

/// Unordered pair of distinct user ids in canonical (min, max) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiblingPair {
    low: i32,
    high: i32,
}

impl SiblingPair {
    pub fn new(a: i32, b: i32) -> AppResult<Self> {
        if a == b {
            return Err(AppError::Validation(
                "Cannot be siblings with oneself".to_string(),
            ));
        }
        Ok(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    pub fn user_id_1(&self) -> i32 {
        self.low
    }

    pub fn user_id_2(&self) -> i32 {
        self.high
    }
}

/// Create sibling link request; the ids may be given in either order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSibling {
    pub user_id_1: i32,
    pub user_id_2: i32,
}

/// Update sibling link request; absent ids keep their stored values
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSibling {
    /// Must match the path id when present
    pub sibling_id: Option<i32>,
    pub user_id_1: Option<i32>,
    pub user_id_2: Option<i32>,
}
