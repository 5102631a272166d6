//! Book catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        ensure_same_id,
    },
    repository::BooksStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BooksStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BooksStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.list().await
    }

    /// Books with at least one copy on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books = self.store.list().await?;
        Ok(books.into_iter().filter(|b| b.available_copies > 0).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.store.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;

        if self.store.isbn_exists(&data.isbn, None).await? {
            return Err(AppError::Conflict("ISBN already exists".to_string()));
        }

        let book = self.store.create(&data).await?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        let current = self.store.get_by_id(id).await?;
        ensure_same_id(id, data.id)?;

        if data.id.is_none() && data.is_empty() {
            return Err(AppError::Validation("No data provided".to_string()));
        }
        data.validate()?;

        if let Some(ref isbn) = data.isbn {
            if *isbn != current.isbn && self.store.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict("ISBN already in use".to_string()));
            }
        }

        self.store.update(id, &data).await
    }

    /// Delete a book; refused while loans reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}
