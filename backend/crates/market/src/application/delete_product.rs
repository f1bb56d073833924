//! Delete Product Use Case
//!
//! Sellers delete their own listings; admins can delete any. The actual
//! removal is the repository's ordered cascade.

use std::sync::Arc;

use auth::{Identity, authorize_owner_or_admin};
use kernel::id::ProductId;

use crate::domain::repository::ProductRepository;
use crate::error::{MarketError, MarketResult};

/// Delete product use case
pub struct DeleteProductUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
}

impl<P> DeleteProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(product_repo: Arc<P>) -> Self {
        Self { product_repo }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
    ) -> MarketResult<()> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;

        authorize_owner_or_admin(identity, product.seller_id)?;

        self.product_repo.delete_with_dependents(product_id).await?;

        tracing::info!(product_id = %product_id, "Product deleted");

        Ok(())
    }
}
