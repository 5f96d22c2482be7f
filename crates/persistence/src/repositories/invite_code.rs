//! Invite code repository for database operations.

use async_trait::async_trait;
use domain::models::invite::InviteCode;
use domain::store::InviteCodeStore;
use domain::StoreError;
use sqlx::PgPool;

use crate::entities::InviteCodeEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct InviteCodeRepository {
    pool: PgPool,
}

impl InviteCodeRepository {
    /// Creates a new InviteCodeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, invite: &InviteCode) -> Result<InviteCodeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite_code");
        let result = sqlx::query_as::<_, InviteCodeEntity>(
            r#"
            INSERT INTO invite_codes (code, plan_id, created_by, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING code, plan_id, created_by, expires_at, created_at
            "#,
        )
        .bind(&invite.code)
        .bind(invite.plan_id)
        .bind(invite.created_by)
        .bind(invite.expires_at)
        .bind(invite.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the most recently issued code with this value.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<InviteCodeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_code");
        let result = sqlx::query_as::<_, InviteCodeEntity>(
            r#"
            SELECT code, plan_id, created_by, expires_at, created_at
            FROM invite_codes
            WHERE code = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl InviteCodeStore for InviteCodeRepository {
    async fn create_invite_code(&self, invite: InviteCode) -> Result<InviteCode, StoreError> {
        Ok(self.create(&invite).await?.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        Ok(InviteCodeRepository::find_by_code(self, code)
            .await?
            .map(Into::into))
    }
}
