//! Product (Listing) Entity

use auth::UserId;
use chrono::{DateTime, Utc};
use kernel::id::ProductId;
use uuid::Uuid;

use crate::domain::value_object::{
    category::Category, price::Price, product_status::ProductStatus,
};

/// Product entity
#[derive(Debug, Clone)]
pub struct Product {
    /// Internal UUID identifier
    pub product_id: ProductId,
    /// The selling user
    pub seller_id: UserId,
    /// Listing title
    pub title: String,
    /// Asking price (non-negative integer)
    pub price: Price,
    /// Category from the fixed vocabulary
    pub category: Category,
    /// Free-form description
    pub description: String,
    /// Meeting location
    pub location: Option<String>,
    /// Lifecycle status
    pub status: ProductStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new listing. Every listing starts FOR_SALE.
    pub fn new(
        seller_id: UserId,
        title: String,
        price: Price,
        category: Category,
        description: String,
        location: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            product_id: ProductId::new(),
            seller_id,
            title,
            price,
            category,
            description,
            location,
            status: ProductStatus::ForSale,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product image row, ordered by `position`
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub image_id: Uuid,
    pub product_id: ProductId,
    /// Path produced by the (external) upload layer
    pub path: String,
    pub position: i32,
}

impl ProductImage {
    pub fn new(product_id: ProductId, path: String, position: i32) -> Self {
        Self {
            image_id: Uuid::new_v4(),
            product_id,
            path,
            position,
        }
    }
}

/// Explicit partial update for listing edits
///
/// Every updatable field is enumerated; `None` leaves the field as is.
/// `location` is nullable, so `Some(None)` clears it. When
/// `replace_images` is present the image set is replaced wholesale, in
/// the same transaction as the row update.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub price: Option<Price>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub location: Option<Option<String>>,
    pub replace_images: Option<Vec<String>>,
}

impl ProductChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.replace_images.is_none()
    }

    /// Apply the row-level changes to a product entity (used by in-memory
    /// stores; image replacement is the store's concern)
    pub fn apply(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title = title.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(location) = &self.location {
            product.location = location.clone();
        }
        product.updated_at = Utc::now();
    }
}
