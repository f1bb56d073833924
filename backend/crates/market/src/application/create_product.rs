//! Create Product Use Case

use std::sync::Arc;

use auth::{Capability, Identity, authorize};
use kernel::id::ProductId;

use crate::domain::entity::product::Product;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::{category::Category, price::Price};
use crate::error::{MarketError, MarketResult};

/// Create product input (raw form values)
pub struct CreateProductInput {
    pub title: String,
    /// Price as submitted - a string that must parse to a non-negative integer
    pub price: String,
    pub category: String,
    pub description: String,
    pub location: Option<String>,
    /// Paths produced by the (external) upload layer, in display order
    pub image_paths: Vec<String>,
}

/// Create product use case
pub struct CreateProductUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
}

impl<P> CreateProductUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(product_repo: Arc<P>) -> Self {
        Self { product_repo }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        input: CreateProductInput,
    ) -> MarketResult<ProductId> {
        let identity = authorize(identity, Capability::Authenticated)?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(MarketError::Validation("Title cannot be empty".to_string()));
        }

        let price = Price::parse(&input.price)?;

        let category = Category::parse(&input.category)
            .ok_or_else(|| MarketError::Validation("Unknown category".to_string()))?;

        let location = input
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let product = Product::new(
            identity.user_id,
            title,
            price,
            category,
            input.description.trim().to_string(),
            location,
        );

        // Product row and image rows land together or not at all
        self.product_repo
            .create_with_images(&product, &input.image_paths)
            .await?;

        tracing::info!(
            product_id = %product.product_id,
            seller_id = %identity.user_id,
            "Product created"
        );

        Ok(product.product_id)
    }
}
