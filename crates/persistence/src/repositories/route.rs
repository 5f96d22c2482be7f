//! Route repository for database operations.

use async_trait::async_trait;
use domain::models::route::{NewRoute, Route};
use domain::store::RouteStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RouteEntity;
use crate::metrics::QueryTimer;

const ROUTE_COLUMNS: &str = "id, plan_id, name, description, is_deleted, created_at, updated_at";

#[derive(Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    /// Creates a new RouteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_route: &NewRoute) -> Result<RouteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_route");
        let result = sqlx::query_as::<_, RouteEntity>(&format!(
            r#"
            INSERT INTO routes (plan_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING {ROUTE_COLUMNS}
            "#
        ))
        .bind(new_route.plan_id)
        .bind(&new_route.name)
        .bind(&new_route.description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_route_by_id");
        let result = sqlx::query_as::<_, RouteEntity>(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Live routes of a plan in creation order.
    pub async fn find_by_plan(&self, plan_id: Uuid) -> Result<Vec<RouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_routes_by_plan");
        let result = sqlx::query_as::<_, RouteEntity>(&format!(
            r#"
            SELECT {ROUTE_COLUMNS}
            FROM routes
            WHERE plan_id = $1 AND is_deleted = false
            ORDER BY created_at, id
            "#
        ))
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<RouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_route");
        let result = sqlx::query_as::<_, RouteEntity>(&format!(
            r#"
            UPDATE routes
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING {ROUTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_live(&self, plan_id: Uuid, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_live_routes");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM routes
            WHERE plan_id = $1 AND id = ANY($2) AND is_deleted = false
            "#,
        )
        .bind(plan_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft delete the listed routes in one transaction.
    ///
    /// Rolls back and returns 0 unless every route was live and in the plan.
    pub async fn soft_delete_many(&self, plan_id: Uuid, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_routes");

        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE routes
            SET is_deleted = true, updated_at = NOW()
            WHERE plan_id = $1 AND id = ANY($2) AND is_deleted = false
            "#,
        )
        .bind(plan_id)
        .bind(ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected != ids.len() as u64 {
            tx.rollback().await?;
            timer.record();
            tracing::debug!(plan_id = %plan_id, expected = ids.len(), affected, "Route deletion rolled back");
            return Ok(0);
        }

        tx.commit().await?;
        timer.record();
        Ok(affected)
    }
}

#[async_trait]
impl RouteStore for RouteRepository {
    async fn create_route(&self, new_route: NewRoute) -> Result<Route, StoreError> {
        Ok(self.create(&new_route).await?.into())
    }

    async fn find_route(&self, route_id: Uuid) -> Result<Option<Route>, StoreError> {
        Ok(self.find_by_id(route_id).await?.map(Into::into))
    }

    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Route>, StoreError> {
        Ok(self
            .find_by_plan(plan_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn update_route(
        &self,
        route_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Route, StoreError> {
        self.update(route_id, name, description)
            .await?
            .map(Into::into)
            .ok_or(StoreError::NotFound)
    }

    async fn count_live(&self, plan_id: Uuid, route_ids: &[Uuid]) -> Result<u64, StoreError> {
        let count = RouteRepository::count_live(self, plan_id, route_ids).await?;
        Ok(count.max(0) as u64)
    }

    async fn soft_delete_routes(
        &self,
        plan_id: Uuid,
        route_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        Ok(self.soft_delete_many(plan_id, route_ids).await?)
    }
}
