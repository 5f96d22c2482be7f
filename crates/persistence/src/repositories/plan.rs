//! Plan repository for database operations.

use async_trait::async_trait;
use domain::models::plan::{NewPlan, Plan};
use domain::store::PlanStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlanEntity;
use crate::metrics::QueryTimer;

const PLAN_COLUMNS: &str =
    "id, name, is_public, is_deleted, start_date, end_date, created_by, created_at, updated_at";

/// Repository for plan-related database operations.
#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    /// Creates a new PlanRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a plan and add the creator as owner.
    pub async fn create(&self, new_plan: &NewPlan) -> Result<PlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_plan");

        let mut tx = self.pool.begin().await?;

        let plan = sqlx::query_as::<_, PlanEntity>(&format!(
            r#"
            INSERT INTO plans (name, is_public, start_date, end_date, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(&new_plan.name)
        .bind(new_plan.is_public)
        .bind(new_plan.start_date)
        .bind(new_plan.end_date)
        .bind(new_plan.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO plan_members (plan_id, user_id, status)
            VALUES ($1, $2, 'owner')
            "#,
        )
        .bind(plan.id)
        .bind(new_plan.owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(plan)
    }

    /// Find a plan by ID, soft-deleted or not.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_by_id");
        let result = sqlx::query_as::<_, PlanEntity>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plans_by_ids");
        let result = sqlx::query_as::<_, PlanEntity>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update name and/or visibility of a live plan.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Option<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_plan");
        let result = sqlx::query_as::<_, PlanEntity>(&format!(
            r#"
            UPDATE plans
            SET name = COALESCE($2, name),
                is_public = COALESCE($3, is_public),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_plan");
        let result = sqlx::query(
            r#"
            UPDATE plans
            SET is_deleted = true, updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn create_plan(&self, new_plan: NewPlan) -> Result<Plan, StoreError> {
        Ok(self.create(&new_plan).await?.into())
    }

    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError> {
        Ok(self.find_by_id(plan_id).await?.map(Into::into))
    }

    async fn find_plans(&self, plan_ids: &[Uuid]) -> Result<Vec<Plan>, StoreError> {
        Ok(self
            .find_by_ids(plan_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn update_plan(
        &self,
        plan_id: Uuid,
        name: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Plan, StoreError> {
        self.update(plan_id, name, is_public)
            .await?
            .map(Into::into)
            .ok_or(StoreError::NotFound)
    }

    async fn soft_delete_plan(&self, plan_id: Uuid) -> Result<u64, StoreError> {
        Ok(self.soft_delete(plan_id).await?)
    }
}
