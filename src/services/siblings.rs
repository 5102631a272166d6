//! Sibling relationship service
//!
//! Links are symmetric: every create or update canonicalizes the pair of
//! user ids first, so (A, B) and (B, A) name the same stored record.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        ensure_same_id,
        sibling::{CreateSibling, Sibling, SiblingPair, UpdateSibling},
    },
    repository::{SiblingsStore, UsersStore},
};

#[derive(Clone)]
pub struct SiblingsService {
    users: Arc<dyn UsersStore>,
    siblings: Arc<dyn SiblingsStore>,
}

impl SiblingsService {
    pub fn new(users: Arc<dyn UsersStore>, siblings: Arc<dyn SiblingsStore>) -> Self {
        Self { users, siblings }
    }

    pub async fn list(&self) -> AppResult<Vec<Sibling>> {
        self.siblings.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Sibling> {
        self.siblings.get_by_id(id).await
    }

    async fn ensure_users_exist(&self, pair: SiblingPair) -> AppResult<()> {
        if !self.users.exists(pair.user_id_1()).await? || !self.users.exists(pair.user_id_2()).await? {
            return Err(AppError::NotFound("One or both users not found".to_string()));
        }
        Ok(())
    }

    /// Link two users, in whichever order they are given
    pub async fn create(&self, data: CreateSibling) -> AppResult<Sibling> {
        let pair = SiblingPair::new(data.user_id_1, data.user_id_2)?;
        self.ensure_users_exist(pair).await?;

        if self.siblings.find_by_pair(pair).await?.is_some() {
            return Err(AppError::Conflict("Sibling relationship already exists".to_string()));
        }

        let sibling = self.siblings.create(pair).await?;
        tracing::info!(
            sibling_id = sibling.sibling_id,
            user_id_1 = sibling.user_id_1,
            user_id_2 = sibling.user_id_2,
            "Sibling relationship created"
        );
        Ok(sibling)
    }

    /// Re-point a link; ids missing from the request keep their stored values
    pub async fn update(&self, id: i32, data: UpdateSibling) -> AppResult<Sibling> {
        let current = self.siblings.get_by_id(id).await?;
        ensure_same_id(id, data.sibling_id)?;

        let pair = SiblingPair::new(
            data.user_id_1.unwrap_or(current.user_id_1),
            data.user_id_2.unwrap_or(current.user_id_2),
        )?;

        if pair == current.pair() {
            return Ok(current);
        }

        self.ensure_users_exist(pair).await?;

        if let Some(existing) = self.siblings.find_by_pair(pair).await? {
            if existing.sibling_id != id {
                return Err(AppError::Conflict("Sibling relationship already exists".to_string()));
            }
        }

        self.siblings.update(id, pair).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.siblings.delete(id).await
    }
}
