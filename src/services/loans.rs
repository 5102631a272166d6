//! Loan management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        ensure_same_id,
        loan::{parse_timestamp, CreateLoan, Loan, UpdateLoan},
    },
    repository::{BooksStore, LoansStore, UsersStore},
};

#[derive(Clone)]
pub struct LoansService {
    users: Arc<dyn UsersStore>,
    books: Arc<dyn BooksStore>,
    loans: Arc<dyn LoansStore>,
}

impl LoansService {
    pub fn new(
        users: Arc<dyn UsersStore>,
        books: Arc<dyn BooksStore>,
        loans: Arc<dyn LoansStore>,
    ) -> Self {
        Self { users, books, loans }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.loans.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        self.loans.get_by_id(id).await
    }

    /// Borrow a book: needs an existing user and a copy on the shelf
    pub async fn create(&self, data: CreateLoan) -> AppResult<Loan> {
        if !self.users.exists(data.user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let book = self
            .books
            .get_by_id(data.book_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Book not found".to_string()),
                other => other,
            })?;

        if book.available_copies < 1 {
            return Err(AppError::Conflict("Book not available".to_string()));
        }

        // The store re-checks availability inside its transaction.
        self.loans.create(data.user_id, data.book_id).await
    }

    /// Set or clear the return timestamp
    pub async fn update(&self, id: i32, data: UpdateLoan) -> AppResult<Loan> {
        let current = self.loans.get_by_id(id).await?;
        ensure_same_id(id, data.id)?;

        match data.returned_at {
            None if data.id.is_none() => Err(AppError::Validation("No data provided".to_string())),
            None => Ok(current),
            Some(value) => {
                // An empty string clears the timestamp like null does
                let returned_at = value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(parse_timestamp)
                    .transpose()?;
                self.loans.set_returned_at(id, returned_at).await
            }
        }
    }

    /// Return an outstanding loan now; a second return is a Conflict
    pub async fn return_loan(&self, id: i32) -> AppResult<Loan> {
        self.loans.return_now(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.loans.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;
    use crate::repository::{MockBooksStore, MockLoansStore, MockUsersStore};
    use chrono::{TimeZone, Utc};

    fn book(id: i32, copies: i32) -> Book {
        Book {
            id,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "X".into(),
            available_copies: copies,
        }
    }

    fn loan(id: i32, returned: bool) -> Loan {
        Loan {
            id,
            user_id: 1,
            book_id: 10,
            borrowed_at: Utc::now(),
            returned_at: returned.then(Utc::now),
        }
    }

    fn service(users: MockUsersStore, books: MockBooksStore, loans: MockLoansStore) -> LoansService {
        LoansService::new(Arc::new(users), Arc::new(books), Arc::new(loans))
    }

    fn existing_user() -> MockUsersStore {
        let mut users = MockUsersStore::new();
        users.expect_exists().returning(|_| Ok(true));
        users
    }

    #[tokio::test]
    async fn test_create_on_empty_shelf_is_conflict_without_insert() {
        let mut books = MockBooksStore::new();
        books.expect_get_by_id().returning(|id| Ok(book(id, 0)));
        let mut loans = MockLoansStore::new();
        loans.expect_create().never();

        let err = service(existing_user(), books, loans)
            .create(CreateLoan { user_id: 1, book_id: 10 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Book not available"));
    }

    #[tokio::test]
    async fn test_create_delegates_to_atomic_store() {
        let mut books = MockBooksStore::new();
        books.expect_get_by_id().returning(|id| Ok(book(id, 3)));
        let mut loans = MockLoansStore::new();
        loans
            .expect_create()
            .withf(|user_id, book_id| *user_id == 1 && *book_id == 10)
            .times(1)
            .returning(|_, _| Ok(loan(5, false)));

        let created = service(existing_user(), books, loans)
            .create(CreateLoan { user_id: 1, book_id: 10 })
            .await
            .unwrap();
        assert!(created.is_outstanding());
    }

    #[tokio::test]
    async fn test_create_for_unknown_user_is_not_found() {
        let mut users = MockUsersStore::new();
        users.expect_exists().returning(|_| Ok(false));
        let mut loans = MockLoansStore::new();
        loans.expect_create().never();

        let err = service(users, MockBooksStore::new(), loans)
            .create(CreateLoan { user_id: 99, book_id: 10 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_create_for_unknown_book_is_not_found() {
        let mut books = MockBooksStore::new();
        books
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Book {} not found", id))));

        let err = service(existing_user(), books, MockLoansStore::new())
            .create(CreateLoan { user_id: 1, book_id: 77 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Book not found"));
    }

    #[tokio::test]
    async fn test_update_parses_and_forwards_timestamp() {
        let mut loans = MockLoansStore::new();
        loans.expect_get_by_id().returning(|id| Ok(loan(id, false)));
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        loans
            .expect_set_returned_at()
            .withf(move |id, at| *id == 5 && *at == Some(expected))
            .times(1)
            .returning(|id, _| Ok(loan(id, true)));

        let updated = service(MockUsersStore::new(), MockBooksStore::new(), loans)
            .update(
                5,
                UpdateLoan {
                    id: None,
                    returned_at: Some(Some("2024-03-01T10:30:00".into())),
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_outstanding());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_timestamp_and_identifier_change() {
        let mut loans = MockLoansStore::new();
        loans.expect_get_by_id().returning(|id| Ok(loan(id, false)));
        loans.expect_set_returned_at().never();
        let svc = service(MockUsersStore::new(), MockBooksStore::new(), loans);

        let err = svc
            .update(
                5,
                UpdateLoan {
                    id: None,
                    returned_at: Some(Some("soon".into())),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = svc
            .update(
                5,
                UpdateLoan {
                    id: Some(6),
                    returned_at: Some(None),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Updating primary key is forbidden"));
    }

    #[tokio::test]
    async fn test_return_twice_is_conflict() {
        let mut loans = MockLoansStore::new();
        loans
            .expect_return_now()
            .returning(|_| Err(AppError::Conflict("Loan already returned".to_string())));
        loans.expect_set_returned_at().never();

        let err = service(MockUsersStore::new(), MockBooksStore::new(), loans)
            .return_loan(5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Loan already returned"));
    }

    #[tokio::test]
    async fn test_return_outstanding_loan() {
        let mut loans = MockLoansStore::new();
        loans.expect_return_now().times(1).returning(|id| Ok(loan(id, true)));
        loans.expect_set_returned_at().never();

        let returned = service(MockUsersStore::new(), MockBooksStore::new(), loans)
            .return_loan(5)
            .await
            .unwrap();
        assert!(returned.returned_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_returned_at_reopens_loan() {
        let mut loans = MockLoansStore::new();
        loans.expect_get_by_id().returning(|id| Ok(loan(id, true)));
        loans
            .expect_set_returned_at()
            .withf(|_, at| at.is_none())
            .times(1)
            .returning(|id, _| Ok(loan(id, false)));

        let reopened = service(MockUsersStore::new(), MockBooksStore::new(), loans)
            .update(
                5,
                UpdateLoan {
                    id: None,
                    returned_at: Some(Some("  ".to_string())),
                },
            )
            .await
            .unwrap();
        assert!(reopened.is_outstanding());
    }
}
