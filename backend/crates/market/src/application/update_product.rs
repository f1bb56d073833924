//! Update Product Use Case
//!
//! Seller-only listing edit via an explicit partial-update struct.

use std::sync::Arc;

use auth::{Capability, Identity, authorize};
use kernel::id::ProductId;

use crate::domain::entity::product::ProductChanges;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::{category::Category, price::Price};
use crate::error::{MarketError, MarketResult};

/// Update product input (raw form values; absent fields stay untouched)
#[derive(Debug, Default)]
pub struct UpdateProductInput {
    pub title: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Present-but-empty clears the location
    pub location: Option<String>,
    /// When present the image set is replaced wholesale
    pub replace_images: Option<Vec<String>>,
}

/// Update product use case
pub struct UpdateProductUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
}

impl<P> UpdateProductUseCase<P>
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
        input: UpdateProductInput,
    ) -> MarketResult<()> {
        // Existence before ownership: a missing listing is 404, an
        // unauthorized edit of an existing one is 403
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;

        authorize(identity, Capability::OwnerOf(product.seller_id))?;

        let title = match input.title {
            Some(raw) => {
                let title = raw.trim().to_string();
                if title.is_empty() {
                    return Err(MarketError::Validation("Title cannot be empty".to_string()));
                }
                Some(title)
            }
            None => None,
        };

        let price = input.price.as_deref().map(Price::parse).transpose()?;

        let category = match input.category.as_deref() {
            Some(raw) => Some(
                Category::parse(raw)
                    .ok_or_else(|| MarketError::Validation("Unknown category".to_string()))?,
            ),
            None => None,
        };

        let location = input
            .location
            .map(|l| l.trim().to_string())
            .map(|l| if l.is_empty() { None } else { Some(l) });

        let changes = ProductChanges {
            title,
            price,
            category,
            description: input.description.map(|d| d.trim().to_string()),
            location,
            replace_images: input.replace_images,
        };

        if changes.is_empty() {
            return Ok(());
        }

        self.product_repo.update(product_id, &changes).await?;

        tracing::info!(product_id = %product_id, "Product updated");

        Ok(())
    }
}
