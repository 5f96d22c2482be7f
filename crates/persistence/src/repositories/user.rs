//! User directory repository.

use async_trait::async_trait;
use domain::models::User;
use domain::store::UserDirectory;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            "SELECT id, nickname, status FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_users_by_ids");
        let result = sqlx::query_as::<_, UserEntity>(
            "SELECT id, nickname, status FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.find_by_id(user_id).await?.map(Into::into))
    }

    async fn find_users(&self, user_ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
