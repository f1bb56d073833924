//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure
//! layer. The deletion methods document the ordered-cascade invariants
//! the schema depends on.

use auth::UserId;
use kernel::id::{CommentId, ProductId};

use crate::domain::comment_thread::CommentRecord;
use crate::domain::entity::{
    comment::Comment,
    product::{Product, ProductChanges, ProductImage},
};
use crate::domain::value_object::{category::Category, product_status::ProductStatus};
use crate::error::MarketResult;

/// Search filter for the listing page
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    /// Substring match over the title
    pub keyword: Option<String>,
    pub status: Option<ProductStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// One row of the listing page
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub product: Product,
    /// First image, if any
    pub thumbnail_path: Option<String>,
    pub like_count: i64,
    /// Whether the calling user liked this listing (false for anonymous)
    pub liked_by_caller: bool,
}

/// Public seller fields shown on the detail page
#[derive(Debug, Clone)]
pub struct SellerProfile {
    pub public_id: String,
    pub display_name: String,
    pub campus: Option<String>,
    pub profile_image_path: Option<String>,
}

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Insert the product row and its image rows in one transaction -
    /// a listing is never visible without its images
    async fn create_with_images(
        &self,
        product: &Product,
        image_paths: &[String],
    ) -> MarketResult<()>;

    /// Find product by ID
    async fn find_by_id(&self, product_id: &ProductId) -> MarketResult<Option<Product>>;

    /// Ordered images of a product
    async fn images_for(&self, product_id: &ProductId) -> MarketResult<Vec<ProductImage>>;

    /// Filtered, paginated search, newest first
    async fn search(
        &self,
        filter: &ProductFilter,
        caller: Option<&UserId>,
    ) -> MarketResult<Vec<ProductSummary>>;

    /// Apply a partial update; when `changes.replace_images` is set the
    /// image rows are replaced in the same transaction
    async fn update(
        &self,
        product_id: &ProductId,
        changes: &ProductChanges,
    ) -> MarketResult<()>;

    /// Persist a status change
    async fn update_status(
        &self,
        product_id: &ProductId,
        status: ProductStatus,
    ) -> MarketResult<()>;

    /// Delete a product and its dependents in one transaction.
    ///
    /// Fixed order: image rows, like rows, comment rows (replies before
    /// top-level), then the product row. The order satisfies the
    /// referential constraints and must not be rearranged.
    async fn delete_with_dependents(&self, product_id: &ProductId) -> MarketResult<()>;

    /// Public profile of a seller
    async fn seller_profile(&self, seller_id: &UserId) -> MarketResult<Option<SellerProfile>>;
}

/// Like repository trait
#[trait_variant::make(LikeRepository: Send)]
pub trait LocalLikeRepository {
    /// Flip the (user, product) like fact. Returns true when the like now
    /// exists. Implementations must use a single conditional insert
    /// guarded by the pair uniqueness constraint, then delete on conflict
    /// - never a read-then-write in application code.
    async fn toggle(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool>;

    /// Fresh count for a product (never incrementally maintained)
    async fn count_for(&self, product_id: &ProductId) -> MarketResult<i64>;

    /// Whether a user likes a product
    async fn is_liked(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Create a comment or reply
    async fn create(&self, comment: &Comment) -> MarketResult<()>;

    /// Find comment by ID
    async fn find_by_id(&self, comment_id: &CommentId) -> MarketResult<Option<Comment>>;

    /// Flat rows for a product, chronological, with author display fields
    async fn list_for_product(&self, product_id: &ProductId)
    -> MarketResult<Vec<CommentRecord>>;

    /// Delete a comment and its replies (replies first), returning the
    /// number of rows removed
    async fn delete_with_replies(&self, comment_id: &CommentId) -> MarketResult<u64>;
}

/// Moderation repository trait (admin-only paths)
#[trait_variant::make(ModerationRepository: Send)]
pub trait LocalModerationRepository {
    /// Resolve a user's internal id from their public id
    async fn find_user_by_public_id(&self, public_id: &str) -> MarketResult<Option<UserId>>;

    /// Delete a user and every dependent row in one transaction.
    ///
    /// Fixed order: for the user's own listings their images, likes and
    /// comments then the listing rows; the user's likes elsewhere;
    /// replies to the user's comments, then the user's comments; the
    /// user's sessions; finally the user row.
    async fn delete_user_with_content(&self, user_id: &UserId) -> MarketResult<()>;
}
