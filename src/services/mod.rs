//! Business logic services

pub mod books;
pub mod loans;
pub mod siblings;
pub mod users;

use std::sync::Arc;

use crate::{
    error::AppResult,
    repository::{BooksStore, LoansStore, Repository, SiblingsStore, UsersStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub loans: loans::LoansService,
    pub siblings: siblings::SiblingsService,
    repository: Repository,
}

impl Services {
    /// Wire every service to the stores it needs
    pub fn new(repository: Repository) -> Self {
        let users: Arc<dyn UsersStore> = Arc::new(repository.users.clone());
        let books: Arc<dyn BooksStore> = Arc::new(repository.books.clone());
        let loans: Arc<dyn LoansStore> = Arc::new(repository.loans.clone());
        let siblings: Arc<dyn SiblingsStore> = Arc::new(repository.siblings.clone());

        Self {
            users: users::UsersService::new(users.clone()),
            books: books::BooksService::new(books.clone()),
            loans: loans::LoansService::new(users.clone(), books, loans),
            siblings: siblings::SiblingsService::new(users, siblings),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
