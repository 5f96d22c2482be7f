use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use domain::services::Planner;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, invites, plans, route_places, routes};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub planner: Planner,
    /// Present when the planner runs over PostgreSQL; used by health probes.
    pub pool: Option<PgPool>,
}

pub fn create_app(config: Config, planner: Planner, pool: Option<PgPool>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        planner,
        pool,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Every /api/v1 handler takes the acting user from X-User-Id.
    let plan_routes = Router::new()
        .route("/api/v1/plans", post(plans::create_plan).get(plans::list_plans))
        .route("/api/v1/plans/withdraw", post(plans::withdraw_plans))
        .route(
            "/api/v1/plans/:plan_id",
            get(plans::get_plan)
                .patch(plans::update_plan)
                .delete(plans::delete_plan),
        )
        .route("/api/v1/plans/:plan_id/kick", post(plans::kick_members))
        .route(
            "/api/v1/plans/:plan_id/invite-codes",
            post(invites::issue_invite_code),
        )
        .route(
            "/api/v1/invite-codes/:code",
            get(invites::preview_invite_code),
        )
        .route(
            "/api/v1/invite-codes/:code/join",
            post(invites::join_with_invite_code),
        );

    let route_routes = Router::new()
        .route(
            "/api/v1/plans/:plan_id/routes",
            post(routes::create_route).get(routes::list_routes),
        )
        .route(
            "/api/v1/plans/:plan_id/routes/delete",
            post(routes::delete_routes),
        )
        .route("/api/v1/routes/:route_id", patch(routes::update_route))
        .route(
            "/api/v1/routes/:route_id/places",
            post(route_places::save_route_place).get(route_places::list_route_places),
        )
        .route(
            "/api/v1/routes/:route_id/places/delete",
            post(route_places::delete_route_places),
        )
        .route(
            "/api/v1/route-places/:route_place_id",
            patch(route_places::update_route_place),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(plan_routes)
        .merge(route_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
