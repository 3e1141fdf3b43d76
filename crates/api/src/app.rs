use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    login_rate_limit, metrics_handler, metrics_middleware, require_user_auth,
    security_headers_middleware, trace_id, LoginRateLimiter,
};
use crate::routes::{auth, clients, health, register, reservations, rooms};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub login_limiter: Option<Arc<LoginRateLimiter>>,
}

/// Builds the router. Fails only when the configured JWT keys do not parse.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let jwt = Arc::new(JwtConfig::new(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?);

    // None when login_rate_limit_per_minute is 0
    let login_limiter = LoginRateLimiter::new(config.security.login_rate_limit_per_minute).map(Arc::new);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        login_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
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

    // Bearer token required. Staff-only handlers also take AdminUser.
    let protected_routes = Router::new()
        .route("/api/v1/register", get(register::list_users))
        .route(
            "/api/v1/register/:id",
            get(register::get_user).delete(register::delete_user),
        )
        .route(
            "/api/v1/client",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/v1/client/:id",
            get(clients::get_client)
                .put(clients::replace_client)
                .patch(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/api/v1/room", get(rooms::list_rooms).post(rooms::create_room))
        .route("/api/v1/room/availability", get(rooms::availability))
        .route(
            "/api/v1/room/:id",
            get(rooms::get_room)
                .put(rooms::replace_room)
                .patch(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route(
            "/api/v1/reservation",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/reservation/my_reservations",
            get(reservations::my_reservations),
        )
        .route(
            "/api/v1/reservation/:id",
            get(reservations::get_reservation)
                .put(reservations::replace_reservation)
                .patch(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Token endpoints, rate limited per client IP
    let token_routes = Router::new()
        .route("/api/v1/auth/token", post(auth::token))
        .route("/api/v1/auth/token/refresh", post(auth::refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/register", post(register::register))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(public_routes)
        .merge(token_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
