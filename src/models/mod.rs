//! Data models for the library server

pub mod book;
pub mod loan;
pub mod sibling;
pub mod user;

pub use book::Book;
pub use loan::Loan;
pub use sibling::{Sibling, SiblingPair};
pub use user::User;

use crate::error::{AppError, AppResult};

/// Rejects an update body that tries to move a record to another identifier.
pub fn ensure_same_id(path_id: i32, body_id: Option<i32>) -> AppResult<()> {
    match body_id {
        Some(id) if id != path_id => Err(AppError::Validation(
            "Updating primary key is forbidden".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_same_id() {
        assert!(ensure_same_id(4, None).is_ok());
        assert!(ensure_same_id(4, Some(4)).is_ok());
        assert!(matches!(ensure_same_id(4, Some(5)), Err(AppError::Validation(_))));
    }
}
