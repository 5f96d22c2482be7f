//! Route-place repository for database operations.

use async_trait::async_trait;
use domain::models::route_place::{NewRoutePlace, RoutePlace};
use domain::store::RoutePlaceStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RoutePlaceEntity;
use crate::metrics::QueryTimer;

const ROUTE_PLACE_COLUMNS: &str =
    "id, route_id, pin_place_id, sequence, nickname, description, date, created_at, updated_at";

#[derive(Clone)]
pub struct RoutePlaceRepository {
    pool: PgPool,
}

impl RoutePlaceRepository {
    /// Creates a new RoutePlaceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a place to its route.
    ///
    /// Locks the parent route row so concurrent appends serialize, then
    /// takes the next sequence in the insert itself.
    pub async fn create(
        &self,
        new_route_place: &NewRoutePlace,
    ) -> Result<RoutePlaceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_route_place");

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM routes WHERE id = $1 FOR UPDATE")
            .bind(new_route_place.route_id)
            .fetch_optional(&mut *tx)
            .await?;

        let entity = sqlx::query_as::<_, RoutePlaceEntity>(&format!(
            r#"
            INSERT INTO route_places (route_id, pin_place_id, sequence, nickname, description, date)
            SELECT $1, $2, COALESCE(MAX(sequence), 0) + 1, $3, $4, $5
            FROM route_places
            WHERE route_id = $1
            RETURNING {ROUTE_PLACE_COLUMNS}
            "#
        ))
        .bind(new_route_place.route_id)
        .bind(&new_route_place.pin_place_id)
        .bind(&new_route_place.nickname)
        .bind(&new_route_place.description)
        .bind(new_route_place.date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RoutePlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_route_place_by_id");
        let result = sqlx::query_as::<_, RoutePlaceEntity>(&format!(
            "SELECT {ROUTE_PLACE_COLUMNS} FROM route_places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Places of the given routes ordered by route, then sequence.
    pub async fn find_by_routes(
        &self,
        route_ids: &[Uuid],
    ) -> Result<Vec<RoutePlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_route_places_by_routes");
        let result = sqlx::query_as::<_, RoutePlaceEntity>(&format!(
            r#"
            SELECT {ROUTE_PLACE_COLUMNS}
            FROM route_places
            WHERE route_id = ANY($1)
            ORDER BY route_id, sequence, created_at
            "#
        ))
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn max_sequence(&self, route_id: Uuid) -> Result<Option<i32>, sqlx::Error> {
        let timer = QueryTimer::new("find_max_route_place_sequence");
        let result = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(sequence) FROM route_places WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        route_place: &RoutePlace,
    ) -> Result<Option<RoutePlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_route_place");
        let result = sqlx::query_as::<_, RoutePlaceEntity>(&format!(
            r#"
            UPDATE route_places
            SET pin_place_id = $2,
                sequence = $3,
                nickname = $4,
                description = $5,
                date = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ROUTE_PLACE_COLUMNS}
            "#
        ))
        .bind(route_place.id)
        .bind(&route_place.pin_place_id)
        .bind(route_place.sequence)
        .bind(&route_place.nickname)
        .bind(&route_place.description)
        .bind(route_place.date)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_in_route(&self, route_id: Uuid, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_route_places_in_route");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM route_places WHERE route_id = $1 AND id = ANY($2)",
        )
        .bind(route_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the listed places of a route in one transaction.
    ///
    /// Rolls back and returns 0 unless every id belonged to the route.
    pub async fn delete_many(&self, route_id: Uuid, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_route_places");

        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query("DELETE FROM route_places WHERE route_id = $1 AND id = ANY($2)")
            .bind(route_id)
            .bind(ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected != ids.len() as u64 {
            tx.rollback().await?;
            timer.record();
            tracing::debug!(route_id = %route_id, expected = ids.len(), affected, "Route place deletion rolled back");
            return Ok(0);
        }

        tx.commit().await?;
        timer.record();
        Ok(affected)
    }
}

#[async_trait]
impl RoutePlaceStore for RoutePlaceRepository {
    async fn create_route_place(
        &self,
        new_route_place: NewRoutePlace,
    ) -> Result<RoutePlace, StoreError> {
        Ok(self.create(&new_route_place).await?.into())
    }

    async fn find_route_place(
        &self,
        route_place_id: Uuid,
    ) -> Result<Option<RoutePlace>, StoreError> {
        Ok(self.find_by_id(route_place_id).await?.map(Into::into))
    }

    async fn list_by_route(&self, route_id: Uuid) -> Result<Vec<RoutePlace>, StoreError> {
        self.list_by_routes(&[route_id]).await
    }

    async fn list_by_routes(&self, route_ids: &[Uuid]) -> Result<Vec<RoutePlace>, StoreError> {
        Ok(self
            .find_by_routes(route_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn find_max_sequence(&self, route_id: Uuid) -> Result<Option<i32>, StoreError> {
        Ok(self.max_sequence(route_id).await?)
    }

    async fn update_route_place(
        &self,
        route_place: &RoutePlace,
    ) -> Result<RoutePlace, StoreError> {
        self.update(route_place)
            .await?
            .map(Into::into)
            .ok_or(StoreError::NotFound)
    }

    async fn count_in_route(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        let count = RoutePlaceRepository::count_in_route(self, route_id, route_place_ids).await?;
        Ok(count.max(0) as u64)
    }

    async fn delete_route_places(
        &self,
        route_id: Uuid,
        route_place_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        Ok(self.delete_many(route_id, route_place_ids).await?)
    }
}
