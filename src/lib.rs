pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;

use crate::config::Config;
use crate::services::{
    role_service::RoleService, token_service::TokenService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub token_service: TokenService,
    pub role_service: RoleService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let token_service = TokenService::new(config.secret_key.clone());
        let role_service = RoleService::new(pool.clone());
        let user_service = UserService::new(pool.clone(), token_service.clone());

        Self {
            pool,
            token_service,
            role_service,
            user_service,
        }
    }
}

/// Full route table. Guarded user routes pass through bearer verification
/// before any handler logic executes.
pub fn api_router(state: AppState) -> Router {
    let open = Router::new()
        .route("/", get(routes::health::welcome))
        .route("/health", get(routes::health::health))
        .route("/user/register", post(routes::user::register))
        .route("/user/login", post(routes::user::login))
        .route(
            "/role",
            post(routes::role::create_role)
                .put(routes::role::update_role)
                .get(routes::role::list_roles),
        )
        .route("/role/filter", get(routes::role::filter_roles))
        .route("/role/:id", delete(routes::role::delete_role));

    let guarded = Router::new()
        .route(
            "/user",
            post(routes::user::create_user)
                .patch(routes::user::update_user)
                .get(routes::user::list_users),
        )
        .route(
            "/user/:id",
            get(routes::user::get_user).delete(routes::user::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer_auth,
        ));

    open.merge(guarded).with_state(state)
}
