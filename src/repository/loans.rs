//! Loans repository for database operations
//!
//! Every operation that touches a book's shelf count runs in one transaction
//! together with the loan row it belongs to. An early return drops the
//! transaction, which rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use super::LoansStore;
use crate::{
    error::{AppError, AppResult},
    models::loan::Loan,
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Takes one copy off the shelf, only if one is there.
async fn take_copy(tx: &mut Transaction<'_, Postgres>, book_id: i32) -> AppResult<i32> {
    let remaining: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE books SET available_copies = available_copies - 1
        WHERE id = $1 AND available_copies >= 1
        RETURNING available_copies
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(remaining) = remaining {
        return Ok(remaining);
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await?;

    if exists {
        Err(AppError::Conflict("Book not available".to_string()))
    } else {
        Err(AppError::NotFound(format!("Book {} not found", book_id)))
    }
}

/// Puts one copy back on the shelf.
async fn restore_copy(tx: &mut Transaction<'_, Postgres>, book_id: i32) -> AppResult<()> {
    sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = $1")
        .bind(book_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl LoansStore for LoansRepository {
    async fn list(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY borrowed_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))
    }

    async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let remaining = take_copy(&mut tx, book_id).await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, borrowed_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from(e).on_missing_reference(&format!("User {} not found", user_id)))?;

        tx.commit().await?;

        tracing::info!(loan_id = loan.id, book_id, remaining, "Book borrowed");
        Ok(loan)
    }

    async fn set_returned_at(&self, id: i32, returned_at: Option<DateTime<Utc>>) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))?;

        match (current.is_outstanding(), returned_at.is_none()) {
            (true, false) => restore_copy(&mut tx, current.book_id).await?,
            (false, true) => {
                take_copy(&mut tx, current.book_id).await?;
            }
            _ => {}
        }

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET returned_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(returned_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(loan_id = id, returned = !loan.is_outstanding(), "Loan updated");
        Ok(loan)
    }

    async fn return_now(&self, id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        // Concurrent returns serialize on the row lock; only the first still
        // sees returned_at IS NULL.
        let returned = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET returned_at = NOW()
            WHERE id = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(loan) = returned else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists {
                AppError::Conflict("Loan already returned".to_string())
            } else {
                AppError::NotFound(format!("Loan {} not found", id))
            });
        };

        restore_copy(&mut tx, loan.book_id).await?;
        tx.commit().await?;

        tracing::info!(loan_id = id, book_id = loan.book_id, "Book returned");
        Ok(loan)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("DELETE FROM loans WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))?;

        if loan.is_outstanding() {
            restore_copy(&mut tx, loan.book_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
