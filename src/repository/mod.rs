//! Repository layer for database operations
//!
//! Each store is exposed to the services through a trait so that the
//! services receive their storage access explicitly and can be exercised
//! against mocks.

pub mod books;
pub mod loans;
pub mod siblings;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook, UpdateBook},
        loan::Loan,
        sibling::{Sibling, SiblingPair},
        user::{CreateUser, UpdateUser, User},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;
    /// Fails with NotFound when absent
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
    async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<User>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Book>>;
    /// Fails with NotFound when absent
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn create(&self, data: &CreateBook) -> AppResult<Book>;
    async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoansStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Loan>>;
    /// Fails with NotFound when absent
    async fn get_by_id(&self, id: i32) -> AppResult<Loan>;
    /// Takes one copy off the shelf and records the loan in a single
    /// transaction. Fails with Conflict when no copy is available.
    async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Loan>;
    /// Sets or clears `returned_at`, moving a copy back to (or off) the
    /// shelf when the loan changes between outstanding and returned.
    async fn set_returned_at(&self, id: i32, returned_at: Option<DateTime<Utc>>) -> AppResult<Loan>;
    /// Marks an outstanding loan returned now and puts its copy back.
    /// Fails with Conflict when the loan was already returned.
    async fn return_now(&self, id: i32) -> AppResult<Loan>;
    /// Deletes the loan, restoring the copy if it was still outstanding.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiblingsStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Sibling>>;
    /// Fails with NotFound when absent
    async fn get_by_id(&self, id: i32) -> AppResult<Sibling>;
    async fn find_by_pair(&self, pair: SiblingPair) -> AppResult<Option<Sibling>>;
    async fn create(&self, pair: SiblingPair) -> AppResult<Sibling>;
    async fn update(&self, id: i32, pair: SiblingPair) -> AppResult<Sibling>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub siblings: siblings::SiblingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            siblings: siblings::SiblingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::PgPool;

    use super::{books::BooksRepository, users::UsersRepository, BooksStore, UsersStore};
    use crate::models::{book::CreateBook, user::CreateUser};

    pub async fn seed_user(pool: &PgPool, email: &str) -> i32 {
        let data = CreateUser {
            first_name: "Test".into(),
            last_name: "Reader".into(),
            email: email.into(),
        };
        UsersRepository::new(pool.clone()).create(&data).await.unwrap().id
    }

    pub async fn seed_book(pool: &PgPool, isbn: &str, copies: i32) -> i32 {
        let data = CreateBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: isbn.into(),
            available_copies: copies,
        };
        BooksRepository::new(pool.clone()).create(&data).await.unwrap().id
    }

    pub async fn copies_of(pool: &PgPool, book_id: i32) -> i32 {
        sqlx::query_scalar("SELECT available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }
}
