//! List Products Use Case
//!
//! Filtered, paginated browsing of listings.

use std::sync::Arc;

use auth::Identity;

use crate::domain::repository::{ProductFilter, ProductRepository, ProductSummary};
use crate::domain::value_object::{category::Category, product_status::ProductStatus};
use crate::error::{MarketError, MarketResult};

/// Fixed page size of the listing page
pub const PAGE_SIZE: i64 = 20;

/// List products input (raw query parameters)
#[derive(Debug, Default)]
pub struct ListProductsInput {
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub status: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

/// List products use case
pub struct ListProductsUseCase<P>
where
    P: ProductRepository,
{
    product_repo: Arc<P>,
}

impl<P> ListProductsUseCase<P>
where
    P: ProductRepository,
{
    pub fn new(product_repo: Arc<P>) -> Self {
        Self { product_repo }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        input: ListProductsInput,
    ) -> MarketResult<Vec<ProductSummary>> {
        let category = match input.category.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                Category::parse(raw)
                    .ok_or_else(|| MarketError::Validation("Unknown category".to_string()))?,
            ),
            None => None,
        };

        let status = match input.status.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(ProductStatus::parse(raw).ok_or(MarketError::InvalidStatus)?),
            None => None,
        };

        let keyword = input
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let page = i64::from(input.page.unwrap_or(1).max(1));

        let filter = ProductFilter {
            category,
            keyword,
            status,
            limit: PAGE_SIZE,
            offset: (page - 1) * PAGE_SIZE,
        };

        self.product_repo
            .search(&filter, identity.map(|i| &i.user_id))
            .await
    }
}
