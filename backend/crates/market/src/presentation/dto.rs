//! API DTOs (Data Transfer Objects)

use auth::Identity;
use serde::{Deserialize, Serialize};

use crate::domain::comment_thread::CommentNode;
use crate::domain::entity::product::ProductImage;
use crate::domain::repository::{ProductSummary, SellerProfile};

// ============================================================================
// Listing page
// ============================================================================

/// Query parameters of GET /product/list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
}

/// One listing row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryDto {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub category: String,
    pub status: String,
    pub thumbnail_path: Option<String>,
    pub like_count: i64,
    pub liked_by_caller: bool,
    pub created_at_ms: i64,
}

impl ProductSummaryDto {
    pub fn from_summary(summary: &ProductSummary) -> Self {
        Self {
            id: summary.product.product_id.to_string(),
            title: summary.product.title.clone(),
            price: summary.product.price.value(),
            category: summary.product.category.display_name().to_string(),
            status: summary.product.status.code().to_string(),
            thumbnail_path: summary.thumbnail_path.clone(),
            like_count: summary.like_count,
            liked_by_caller: summary.liked_by_caller,
            created_at_ms: summary.product.created_at.timestamp_millis(),
        }
    }
}

/// GET /product/list response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductSummaryDto>,
    pub page: u32,
}

// ============================================================================
// Detail page
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageDto {
    pub id: String,
    pub path: String,
}

impl ProductImageDto {
    pub fn from_image(image: &ProductImage) -> Self {
        Self {
            id: image.image_id.to_string(),
            path: image.path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDto {
    pub public_id: String,
    pub display_name: String,
    pub campus: Option<String>,
    pub profile_image_path: Option<String>,
}

impl SellerDto {
    pub fn from_profile(profile: &SellerProfile) -> Self {
        Self {
            public_id: profile.public_id.clone(),
            display_name: profile.display_name.clone(),
            campus: profile.campus.clone(),
            profile_image_path: profile.profile_image_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNodeDto {
    pub id: String,
    pub content: String,
    pub author_name: String,
    pub author_image_path: Option<String>,
    /// Whether the calling user wrote this comment (controls the delete
    /// affordance client-side; the server re-checks on delete)
    pub mine: bool,
    pub created_at_ms: i64,
    pub replies: Vec<CommentNodeDto>,
}

impl CommentNodeDto {
    pub fn from_node(node: &CommentNode, caller: Option<&Identity>) -> Self {
        Self {
            id: node.comment.comment_id.to_string(),
            content: node.comment.content.clone(),
            author_name: node.author_name.clone(),
            author_image_path: node.author_image_path.clone(),
            mine: caller.is_some_and(|c| c.user_id == node.comment.user_id),
            created_at_ms: node.comment.created_at.timestamp_millis(),
            replies: node
                .replies
                .iter()
                .map(|reply| Self::from_node(reply, caller))
                .collect(),
        }
    }
}

/// GET /product/{id} response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub category: String,
    pub description: String,
    pub location: Option<String>,
    pub status: String,
    pub images: Vec<ProductImageDto>,
    pub seller: Option<SellerDto>,
    pub like_count: i64,
    pub liked_by_caller: bool,
    pub comments: Vec<CommentNodeDto>,
    pub created_at_ms: i64,
}

// ============================================================================
// Mutations
// ============================================================================

/// POST /product/write form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteProductRequest {
    pub title: String,
    pub price: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    /// Path produced by the (external) upload layer
    pub image_path: Option<String>,
}

/// POST /product/{id}/edit form (absent fields stay untouched)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProductRequest {
    pub title: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_path: Option<String>,
}

/// POST /product/{id}/status body
///
/// Older clients post the field as `product-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(alias = "product-status")]
    pub status: String,
}

/// POST /product/{id}/comment (and reply) form
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

// ============================================================================
// JSON responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub success: bool,
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_accepts_both_field_names() {
        let req: StatusUpdateRequest =
            serde_json::from_str(r#"{"status":"RESERVED"}"#).unwrap();
        assert_eq!(req.status, "RESERVED");

        let req: StatusUpdateRequest =
            serde_json::from_str(r#"{"product-status":"SOLD"}"#).unwrap();
        assert_eq!(req.status, "SOLD");
    }

    #[test]
    fn test_like_response_shape() {
        let response = LikeResponse {
            success: true,
            liked: true,
            like_count: 3,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(json.contains(r#""liked":true"#));
        assert!(json.contains(r#""likeCount":3"#));
    }
}
