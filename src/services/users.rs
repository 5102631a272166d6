//! User management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        ensure_same_id,
        user::{CreateUser, UpdateUser, User},
    },
    repository::UsersStore,
};

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn UsersStore>,
}

impl UsersService {
    pub fn new(store: Arc<dyn UsersStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.store.get_by_id(id).await
    }

    /// Create a new user; the email must not be taken
    pub async fn create(&self, data: CreateUser) -> AppResult<User> {
        data.validate()?;

        if self.store.email_exists(&data.email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let user = self.store.create(&data).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Update an existing user
    pub async fn update(&self, id: i32, data: UpdateUser) -> AppResult<User> {
        let current = self.store.get_by_id(id).await?;
        ensure_same_id(id, data.id)?;

        if data.id.is_none() && data.is_empty() {
            return Err(AppError::Validation("No data provided".to_string()));
        }
        data.validate()?;

        if let Some(ref email) = data.email {
            if *email != current.email && self.store.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        self.store.update(id, &data).await
    }

    /// Delete a user; refused while loans or sibling links point at them
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
