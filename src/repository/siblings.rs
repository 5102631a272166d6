//! Sibling links repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::SiblingsStore;
use crate::{
    error::{AppError, AppResult},
    models::sibling::{Sibling, SiblingPair},
};

#[derive(Clone)]
pub struct SiblingsRepository {
    pool: Pool<Postgres>,
}

impl SiblingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiblingsStore for SiblingsRepository {
    async fn list(&self) -> AppResult<Vec<Sibling>> {
        let siblings = sqlx::query_as::<_, Sibling>("SELECT * FROM siblings ORDER BY sibling_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(siblings)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Sibling> {
        sqlx::query_as::<_, Sibling>("SELECT * FROM siblings WHERE sibling_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Sibling relationship not found".to_string()))
    }

    async fn find_by_pair(&self, pair: SiblingPair) -> AppResult<Option<Sibling>> {
        let sibling = sqlx::query_as::<_, Sibling>(
            "SELECT * FROM siblings WHERE user_id_1 = $1 AND user_id_2 = $2",
        )
        .bind(pair.user_id_1())
        .bind(pair.user_id_2())
        .fetch_optional(&self.pool)
        .await?;
        Ok(sibling)
    }

    async fn create(&self, pair: SiblingPair) -> AppResult<Sibling> {
        let sibling = sqlx::query_as::<_, Sibling>(
            r#"
            INSERT INTO siblings (user_id_1, user_id_2)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(pair.user_id_1())
        .bind(pair.user_id_2())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from(e)
                .on_unique("Sibling relationship already exists")
                .on_missing_reference("One or both users not found")
        })?;
        Ok(sibling)
    }

    async fn update(&self, id: i32, pair: SiblingPair) -> AppResult<Sibling> {
        sqlx::query_as::<_, Sibling>(
            "UPDATE siblings SET user_id_1 = $2, user_id_2 = $3 WHERE sibling_id = $1 RETURNING *",
        )
        .bind(id)
        .bind(pair.user_id_1())
        .bind(pair.user_id_2())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::from(e)
                .on_unique("Sibling relationship already exists")
                .on_missing_reference("One or both users not found")
        })?
        .ok_or_else(|| AppError::NotFound("Sibling relationship not found".to_string()))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM siblings WHERE sibling_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sibling relationship not found".to_string()));
        }
        Ok(())
    }
}
