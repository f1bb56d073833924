//! Product Detail Use Case
//!
//! Assembles the detail page data: the listing, its images, the seller's
//! public profile, like information, and the comment thread.

use std::sync::Arc;

use auth::Identity;
use kernel::id::ProductId;

use crate::domain::comment_thread::{self, CommentNode};
use crate::domain::entity::product::{Product, ProductImage};
use crate::domain::repository::{
    CommentRepository, LikeRepository, ProductRepository, SellerProfile,
};
use crate::error::{MarketError, MarketResult};

/// Everything the detail page renders
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub seller: Option<SellerProfile>,
    pub like_count: i64,
    pub liked_by_caller: bool,
    pub comments: Vec<CommentNode>,
}

/// Product detail use case
pub struct ProductDetailUseCase<P, L, C>
where
    P: ProductRepository,
    L: LikeRepository,
    C: CommentRepository,
{
    product_repo: Arc<P>,
    like_repo: Arc<L>,
    comment_repo: Arc<C>,
}

impl<P, L, C> ProductDetailUseCase<P, L, C>
where
    P: ProductRepository,
    L: LikeRepository,
    C: CommentRepository,
{
    pub fn new(product_repo: Arc<P>, like_repo: Arc<L>, comment_repo: Arc<C>) -> Self {
        Self {
            product_repo,
            like_repo,
            comment_repo,
        }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
    ) -> MarketResult<ProductDetail> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;

        let images = self.product_repo.images_for(product_id).await?;
        let seller = self.product_repo.seller_profile(&product.seller_id).await?;

        let like_count = self.like_repo.count_for(product_id).await?;
        let liked_by_caller = match identity {
            Some(identity) => self.like_repo.is_liked(&identity.user_id, product_id).await?,
            None => false,
        };

        let rows = self.comment_repo.list_for_product(product_id).await?;
        let comments = comment_thread::build_thread(rows);

        Ok(ProductDetail {
            product,
            images,
            seller,
            like_count,
            liked_by_caller,
            comments,
        })
    }
}
