//! PostgreSQL Repository Implementations
//!
//! All multi-statement operations run inside a transaction; the ordered
//! deletes are correctness requirements of the schema's referential
//! constraints, not style.

use auth::UserId;
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ProductId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::comment_thread::CommentRecord;
use crate::domain::entity::{
    comment::Comment,
    product::{Product, ProductChanges, ProductImage},
};
use crate::domain::repository::{
    CommentRepository, LikeRepository, ModerationRepository, ProductFilter, ProductRepository,
    ProductSummary, SellerProfile,
};
use crate::domain::value_object::{
    category::Category, price::Price, product_status::ProductStatus,
};
use crate::error::{MarketError, MarketResult};

/// PostgreSQL-backed market repository
#[derive(Clone)]
pub struct PgMarketRepository {
    pool: PgPool,
}

impl PgMarketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgMarketRepository {
    async fn create_with_images(
        &self,
        product: &Product,
        image_paths: &[String],
    ) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                product_id,
                seller_id,
                title,
                price,
                category,
                description,
                location,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.seller_id.as_uuid())
        .bind(&product.title)
        .bind(product.price.value())
        .bind(product.category.id())
        .bind(&product.description)
        .bind(&product.location)
        .bind(product.status.id())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, path) in image_paths.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_images (image_id, product_id, path, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(product.product_id.as_uuid())
            .bind(path)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> MarketResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                seller_id,
                title,
                price,
                category,
                description,
                location,
                status,
                created_at,
                updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_product()).transpose()
    }

    async fn images_for(&self, product_id: &ProductId) -> MarketResult<Vec<ProductImage>> {
        let rows = sqlx::query_as::<_, ProductImageRow>(
            r#"
            SELECT image_id, product_id, path, position
            FROM product_images
            WHERE product_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_image()).collect())
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        caller: Option<&UserId>,
    ) -> MarketResult<Vec<ProductSummary>> {
        let rows = sqlx::query_as::<_, ProductSummaryRow>(
            r#"
            SELECT
                p.product_id,
                p.seller_id,
                p.title,
                p.price,
                p.category,
                p.description,
                p.location,
                p.status,
                p.created_at,
                p.updated_at,
                (
                    SELECT i.path FROM product_images i
                    WHERE i.product_id = p.product_id
                    ORDER BY i.position ASC
                    LIMIT 1
                ) AS thumbnail_path,
                (
                    SELECT COUNT(*) FROM product_likes l
                    WHERE l.product_id = p.product_id
                ) AS like_count,
                (
                    $1::uuid IS NOT NULL AND EXISTS(
                        SELECT 1 FROM product_likes l
                        WHERE l.product_id = p.product_id AND l.user_id = $1
                    )
                ) AS liked_by_caller
            FROM products p
            WHERE ($2::int2 IS NULL OR p.category = $2)
              AND ($3::text IS NULL OR p.title ILIKE '%' || $3 || '%')
              AND ($4::int2 IS NULL OR p.status = $4)
            ORDER BY p.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(caller.map(|c| *c.as_uuid()))
        .bind(filter.category.map(|c| c.id()))
        .bind(filter.keyword.as_deref())
        .bind(filter.status.map(|s| s.id()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_summary()).collect()
    }

    async fn update(
        &self,
        product_id: &ProductId,
        changes: &ProductChanges,
    ) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;

        // Per-field change flags keep the column list fixed and
        // compile-time-enumerated
        sqlx::query(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                price = COALESCE($3, price),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                location = CASE WHEN $6 THEN $7 ELSE location END,
                updated_at = $8
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(changes.title.as_deref())
        .bind(changes.price.map(|p| p.value()))
        .bind(changes.category.map(|c| c.id()))
        .bind(changes.description.as_deref())
        .bind(changes.location.is_some())
        .bind(changes.location.clone().flatten())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if let Some(paths) = &changes.replace_images {
            sqlx::query("DELETE FROM product_images WHERE product_id = $1")
                .bind(product_id.as_uuid())
                .execute(&mut *tx)
                .await?;

            for (position, path) in paths.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO product_images (image_id, product_id, path, position)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(product_id.as_uuid())
                .bind(path)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    async fn update_status(
        &self,
        product_id: &ProductId,
        status: ProductStatus,
    ) -> MarketResult<()> {
        sqlx::query(
            r#"
            UPDATE products SET status = $2, updated_at = $3
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(status.id())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_with_dependents(&self, product_id: &ProductId) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;

        // Dependents first, product last; replies before their parents.
        // This order satisfies the foreign keys and must not change.
        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM product_likes WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE product_id = $1 AND parent_id IS NOT NULL")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn seller_profile(&self, seller_id: &UserId) -> MarketResult<Option<SellerProfile>> {
        let row = sqlx::query_as::<_, SellerRow>(
            r#"
            SELECT public_id, display_name, campus, profile_image_path
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(seller_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }
}

// ============================================================================
// Like Repository Implementation
// ============================================================================

impl LikeRepository for PgMarketRepository {
    async fn toggle(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool> {
        // Single round-trip conditional insert. Two concurrent toggles
        // cannot both insert: the pair uniqueness constraint admits one,
        // the other sees zero rows affected and deletes.
        let inserted = sqlx::query(
            r#"
            INSERT INTO product_likes (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM product_likes WHERE user_id = $1 AND product_id = $2")
            .bind(user_id.as_uuid())
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(false)
    }

    async fn count_for(&self, product_id: &ProductId) -> MarketResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_likes WHERE product_id = $1",
        )
        .bind(product_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn is_liked(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool> {
        let liked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM product_likes
                WHERE user_id = $1 AND product_id = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgMarketRepository {
    async fn create(&self, comment: &Comment) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                comment_id,
                product_id,
                user_id,
                content,
                parent_id,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.product_id.as_uuid())
        .bind(comment.user_id.as_uuid())
        .bind(&comment.content)
        .bind(comment.parent_id.map(|p| *p.as_uuid()))
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, comment_id: &CommentId) -> MarketResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.comment_id,
                c.product_id,
                c.user_id,
                c.content,
                c.parent_id,
                c.created_at,
                NULL::text AS author_name,
                NULL::text AS author_image_path
            FROM comments c
            WHERE c.comment_id = $1
            "#,
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_comment()))
    }

    async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> MarketResult<Vec<CommentRecord>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.comment_id,
                c.product_id,
                c.user_id,
                c.content,
                c.parent_id,
                c.created_at,
                u.display_name AS author_name,
                u.profile_image_path AS author_image_path
            FROM comments c
            LEFT JOIN users u ON c.user_id = u.user_id
            WHERE c.product_id = $1
            ORDER BY c.parent_id ASC NULLS FIRST, c.created_at ASC
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    async fn delete_with_replies(&self, comment_id: &CommentId) -> MarketResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Replies first, then the comment itself
        let replies = sqlx::query("DELETE FROM comments WHERE parent_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let own = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(replies + own)
    }
}

// ============================================================================
// Moderation Repository Implementation
// ============================================================================

impl ModerationRepository for PgMarketRepository {
    async fn find_user_by_public_id(&self, public_id: &str) -> MarketResult<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM users WHERE public_id = $1",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id.map(UserId::from_uuid))
    }

    async fn delete_user_with_content(&self, user_id: &UserId) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;
        let uid = user_id.as_uuid();

        // The user's own listings: dependents first, per listing set
        sqlx::query(
            r#"
            DELETE FROM product_images WHERE product_id IN
                (SELECT product_id FROM products WHERE seller_id = $1)
            "#,
        )
        .bind(uid)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM product_likes WHERE product_id IN
                (SELECT product_id FROM products WHERE seller_id = $1)
            "#,
        )
        .bind(uid)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM comments WHERE parent_id IS NOT NULL AND product_id IN
                (SELECT product_id FROM products WHERE seller_id = $1)
            "#,
        )
        .bind(uid)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM comments WHERE product_id IN
                (SELECT product_id FROM products WHERE seller_id = $1)
            "#,
        )
        .bind(uid)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM products WHERE seller_id = $1")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        // The user's traces on other listings
        sqlx::query("DELETE FROM product_likes WHERE user_id = $1")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM comments WHERE parent_id IN
                (SELECT comment_id FROM comments WHERE user_id = $1)
            "#,
        )
        .bind(uid)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM comments WHERE user_id = $1")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        // Sessions, then the user row itself
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    seller_id: Uuid,
    title: String,
    price: i64,
    category: i16,
    description: String,
    location: Option<String>,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> MarketResult<Product> {
        let category = Category::from_id(self.category)
            .ok_or_else(|| MarketError::Internal(format!("Invalid category id: {}", self.category)))?;
        let status = ProductStatus::from_id(self.status)
            .ok_or_else(|| MarketError::Internal(format!("Invalid status id: {}", self.status)))?;

        Ok(Product {
            product_id: ProductId::from_uuid(self.product_id),
            seller_id: UserId::from_uuid(self.seller_id),
            title: self.title,
            price: Price::from_db(self.price),
            category,
            description: self.description,
            location: self.location,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductSummaryRow {
    product_id: Uuid,
    seller_id: Uuid,
    title: String,
    price: i64,
    category: i16,
    description: String,
    location: Option<String>,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    thumbnail_path: Option<String>,
    like_count: i64,
    liked_by_caller: bool,
}

impl ProductSummaryRow {
    fn into_summary(self) -> MarketResult<ProductSummary> {
        let product = ProductRow {
            product_id: self.product_id,
            seller_id: self.seller_id,
            title: self.title,
            price: self.price,
            category: self.category,
            description: self.description,
            location: self.location,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_product()?;

        Ok(ProductSummary {
            product,
            thumbnail_path: self.thumbnail_path,
            like_count: self.like_count,
            liked_by_caller: self.liked_by_caller,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductImageRow {
    image_id: Uuid,
    product_id: Uuid,
    path: String,
    position: i32,
}

impl ProductImageRow {
    fn into_image(self) -> ProductImage {
        ProductImage {
            image_id: self.image_id,
            product_id: ProductId::from_uuid(self.product_id),
            path: self.path,
            position: self.position,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    content: String,
    parent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    author_name: Option<String>,
    author_image_path: Option<String>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::from_uuid(self.comment_id),
            product_id: ProductId::from_uuid(self.product_id),
            user_id: UserId::from_uuid(self.user_id),
            content: self.content,
            parent_id: self.parent_id.map(CommentId::from_uuid),
            created_at: self.created_at,
        }
    }

    fn into_record(self) -> CommentRecord {
        let author_name = self
            .author_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let author_image_path = self.author_image_path.clone();

        CommentRecord {
            comment: self.into_comment(),
            author_name,
            author_image_path,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SellerRow {
    public_id: String,
    display_name: String,
    campus: Option<String>,
    profile_image_path: Option<String>,
}

impl SellerRow {
    fn into_profile(self) -> SellerProfile {
        SellerProfile {
            public_id: self.public_id,
            display_name: self.display_name,
            campus: self.campus,
            profile_image_path: self.profile_image_path,
        }
    }
}
