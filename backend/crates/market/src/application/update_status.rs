//! Update Status Use Case
//!
//! Constrains status changes to the fixed vocabulary and to the owning
//! seller. No transition graph beyond that: any valid status is reachable
//! from any other, including SOLD_OUT back to FOR_SALE.

use std::sync::Arc;

use auth::{Capability, Identity, authorize};
use kernel::id::ProductId;

use crate::domain::repository::ProductRepository;
use crate::domain::value_object::product_status::ProductStatus;
use crate::error::{MarketError, MarketResult};

/// Update status use case
pub struct UpdateStatusUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
}

impl<P> UpdateStatusUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(product_repo: Arc<P>) -> Self {
        Self { product_repo }
    }

    /// Returns the normalized status that was stored.
    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
        requested_status: &str,
    ) -> MarketResult<ProductStatus> {
        let identity = authorize(identity, Capability::Authenticated)?;

        // Alias normalization happens inside parse, before any validation
        // or persistence sees the raw value
        let status =
            ProductStatus::parse(requested_status).ok_or(MarketError::InvalidStatus)?;

        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;

        authorize(Some(identity), Capability::OwnerOf(product.seller_id))?;

        self.product_repo.update_status(product_id, status).await?;

        tracing::info!(
            product_id = %product_id,
            status = %status,
            "Product status updated"
        );

        Ok(status)
    }
}
