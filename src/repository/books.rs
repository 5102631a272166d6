//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BooksStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, available_copies)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(data.available_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from(e).on_unique("ISBN already exists"))?;
        Ok(book)
    }

    async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut sets: Vec<String> = Vec::new();
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.author, "author");
        add_field!(data.isbn, "isbn");
        add_field!(data.available_copies, "available_copies");
        let _ = idx;

        let query = format!("UPDATE books SET {} WHERE id = $1 RETURNING *", sets.join(", "));

        let mut builder = sqlx::query_as::<_, Book>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.author);
        bind_field!(data.isbn);
        bind_field!(data.available_copies);

        builder
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from(e).on_unique("ISBN already in use"))?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from(e).on_referenced("Cannot delete book (has associated loans)"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        loans::LoansRepository,
        test_support::{copies_of, count_rows, seed_book, seed_user},
        LoansStore,
    };
    use sqlx::PgPool;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_book_with_loan_is_blocked(pool: PgPool) {
        let user = seed_user(&pool, "ann@example.com").await;
        let book = seed_book(&pool, "978-1", 2).await;
        LoansRepository::new(pool.clone()).create(user, book).await.unwrap();
        let repo = BooksRepository::new(pool.clone());

        let err = repo.delete(book).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m.starts_with("Cannot delete book")));
        assert_eq!(copies_of(&pool, book).await, 1);
        assert_eq!(count_rows(&pool, "loans").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_negative_copies_rejected_by_check(pool: PgPool) {
        let book = seed_book(&pool, "978-2", 1).await;
        let repo = BooksRepository::new(pool.clone());

        let data = UpdateBook {
            available_copies: Some(-1),
            ..Default::default()
        };
        let err = repo.update(book, &data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(copies_of(&pool, book).await, 1);
    }
}
