//! Market Routers
//!
//! Every route is bound to a concrete handler; there are no fallback
//! stubs. The caller layers the auth middleware in front of these.

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::domain::repository::{
    CommentRepository, LikeRepository, ModerationRepository, ProductRepository,
};
use crate::infra::postgres::PgMarketRepository;
use crate::presentation::handlers::{self, MarketAppState};

/// Create the /product router with PostgreSQL repository
pub fn product_router(repo: PgMarketRepository) -> Router {
    product_router_generic(repo)
}

/// Create a generic /product router for any repository implementation
pub fn product_router_generic<R>(repo: R) -> Router
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = MarketAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/list", get(handlers::list::<R>))
        .route("/write", post(handlers::write::<R>))
        .route("/comment/{id}", delete(handlers::delete_comment::<R>))
        .route("/{id}", get(handlers::detail::<R>).delete(handlers::delete::<R>))
        .route("/{id}/edit", post(handlers::edit::<R>))
        .route("/{id}/status", post(handlers::update_status::<R>))
        .route("/{id}/like", post(handlers::toggle_like::<R>))
        .route("/{id}/comment", post(handlers::create_comment::<R>))
        .route(
            "/{id}/comment/{comment_id}/reply",
            post(handlers::create_reply::<R>),
        )
        .with_state(state)
}

/// Create the /admin router with PostgreSQL repository
pub fn admin_router(repo: PgMarketRepository) -> Router {
    admin_router_generic(repo)
}

/// Create a generic /admin router for any repository implementation
pub fn admin_router_generic<R>(repo: R) -> Router
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = MarketAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/user/{public_id}", delete(handlers::remove_user::<R>))
        .route("/product/{id}", delete(handlers::remove_product::<R>))
        .with_state(state)
}
