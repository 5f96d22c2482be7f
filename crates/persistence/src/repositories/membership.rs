//! Plan membership repository for database operations.

use async_trait::async_trait;
use domain::models::membership::{Membership, MembershipStatus};
use domain::store::MembershipStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MembershipEntity, MembershipStatusDb};
use crate::metrics::QueryTimer;

/// Repository for plan_members rows.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_plan(&self, plan_id: Uuid) -> Result<Vec<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_members");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT plan_id, user_id, status, joined_at, updated_at
            FROM plan_members
            WHERE plan_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_one(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_member");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT plan_id, user_id, status, joined_at, updated_at
            FROM plan_members
            WHERE plan_id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_memberships");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT plan_id, user_id, status, joined_at, updated_at
            FROM plan_members
            WHERE user_id = $1
            ORDER BY joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a member row or reactivate a withdrawn/kicked one.
    ///
    /// Owner, member and blocked rows are returned untouched.
    pub async fn upsert_member(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> Result<MembershipEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_plan_member");

        let mut tx = self.pool.begin().await?;

        let upserted = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO plan_members (plan_id, user_id, status)
            VALUES ($1, $2, 'member')
            ON CONFLICT (plan_id, user_id) DO UPDATE
            SET status = 'member', joined_at = NOW(), updated_at = NOW()
            WHERE plan_members.status IN ('withdrawn', 'kicked')
            RETURNING plan_id, user_id, status, joined_at, updated_at
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match upserted {
            Some(row) => row,
            None => {
                sqlx::query_as::<_, MembershipEntity>(
                    r#"
                    SELECT plan_id, user_id, status, joined_at, updated_at
                    FROM plan_members
                    WHERE plan_id = $1 AND user_id = $2
                    "#,
                )
                .bind(plan_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        timer.record();
        Ok(row)
    }

    /// Move the listed rows from one status to another in one transaction.
    ///
    /// Rolls back and returns 0 unless every listed row was in `from`.
    pub async fn transition_all(
        &self,
        targets: &[(Uuid, Uuid)],
        from: MembershipStatusDb,
        to: MembershipStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("transition_plan_members");
        let plan_ids: Vec<Uuid> = targets.iter().map(|(plan_id, _)| *plan_id).collect();
        let user_ids: Vec<Uuid> = targets.iter().map(|(_, user_id)| *user_id).collect();

        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE plan_members
            SET status = $4, updated_at = NOW()
            WHERE (plan_id, user_id) IN (
                SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
            )
            AND status = $3
            "#,
        )
        .bind(&plan_ids)
        .bind(&user_ids)
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected != targets.len() as u64 {
            tx.rollback().await?;
            timer.record();
            tracing::debug!(
                expected = targets.len(),
                affected,
                "Membership transition rolled back"
            );
            return Ok(0);
        }

        tx.commit().await?;
        timer.record();
        Ok(affected)
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        Ok(self
            .find_by_plan(plan_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn find_by_plan_and_user(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self.find_one(plan_id, user_id).await?.map(Into::into))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        Ok(self
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn upsert_member(&self, plan_id: Uuid, user_id: Uuid) -> Result<Membership, StoreError> {
        Ok(MembershipRepository::upsert_member(self, plan_id, user_id)
            .await?
            .into())
    }

    async fn transition_all(
        &self,
        targets: &[(Uuid, Uuid)],
        from: MembershipStatus,
        to: MembershipStatus,
    ) -> Result<u64, StoreError> {
        Ok(MembershipRepository::transition_all(self, targets, from.into(), to.into()).await?)
    }
}
