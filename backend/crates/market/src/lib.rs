//! Market (Listings) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, comment threading, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Listing creation/editing/search with images
//! - Like toggling guarded by a pair uniqueness constraint
//! - Two-level comment threads with author-only deletion
//! - Status lifecycle (FOR_SALE / RESERVED / SOLD_OUT), seller-only
//! - Admin moderation (user and listing removal)
//!
//! ## Invariants
//! - A product and its images are created in one transaction
//! - Deletions remove dependents in a fixed order: images, likes,
//!   comments, then the product row

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{MarketError, MarketResult};
pub use infra::postgres::PgMarketRepository;
pub use presentation::router::{admin_router, product_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::comment_thread::*;
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgMarketRepository as MarketStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
