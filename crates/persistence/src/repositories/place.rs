//! Saved place catalog repository.

use async_trait::async_trait;
use domain::models::PlaceInfo;
use domain::store::PlaceCatalog;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlaceEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PlaceRepository {
    pool: PgPool,
}

impl PlaceRepository {
    /// Creates a new PlaceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_in_plan(
        &self,
        pin_place_id: &str,
        plan_id: Uuid,
    ) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_place_in_plan");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            SELECT pin_place_id, plan_id, title, address, latitude, longitude, color
            FROM places
            WHERE pin_place_id = $1 AND plan_id = $2
            "#,
        )
        .bind(pin_place_id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_many_in_plan(
        &self,
        plan_id: Uuid,
        pin_place_ids: &[String],
    ) -> Result<Vec<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_places_in_plan");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            SELECT pin_place_id, plan_id, title, address, latitude, longitude, color
            FROM places
            WHERE plan_id = $1 AND pin_place_id = ANY($2)
            "#,
        )
        .bind(plan_id)
        .bind(pin_place_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl PlaceCatalog for PlaceRepository {
    async fn find_by_external_id_and_plan(
        &self,
        pin_place_id: &str,
        plan_id: Uuid,
    ) -> Result<Option<PlaceInfo>, StoreError> {
        Ok(self.find_in_plan(pin_place_id, plan_id).await?.map(Into::into))
    }

    async fn find_by_plan(
        &self,
        plan_id: Uuid,
        pin_place_ids: &[String],
    ) -> Result<Vec<PlaceInfo>, StoreError> {
        Ok(self
            .find_many_in_plan(plan_id, pin_place_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
