//! Toggle Like Use Case
//!
//! Flips the caller's like on a listing and reports the resulting count.
//! The flip itself is a single conditional insert in the repository; the
//! pair uniqueness constraint is what makes two concurrent toggles safe.

use std::sync::Arc;

use auth::{Capability, Identity, authorize};
use kernel::id::ProductId;

use crate::domain::repository::{LikeRepository, ProductRepository};
use crate::error::{MarketError, MarketResult};

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether the like exists after the call
    pub liked: bool,
    /// Fresh count after the flip
    pub like_count: i64,
}

/// Toggle like use case
pub struct ToggleLikeUseCase<P, L>
where
    P: ProductRepository,
    L: LikeRepository,
{
    product_repo: Arc<P>,
    like_repo: Arc<L>,
}

impl<P, L> ToggleLikeUseCase<P, L>
where
    P: ProductRepository,
    L: LikeRepository,
{
    pub fn new(product_repo: Arc<P>, like_repo: Arc<L>) -> Self {
        Self {
            product_repo,
            like_repo,
        }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
    ) -> MarketResult<LikeOutcome> {
        let identity = authorize(identity, Capability::Authenticated)?;

        if self
            .product_repo
            .find_by_id(product_id)
            .await?
            .is_none()
        {
            return Err(MarketError::ProductNotFound);
        }

        let liked = self
            .like_repo
            .toggle(&identity.user_id, product_id)
            .await?;

        // Recount rather than increment, so the reported number cannot drift
        let like_count = self.like_repo.count_for(product_id).await?;

        Ok(LikeOutcome { liked, like_count })
    }
}
