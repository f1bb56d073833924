//! HTTP Handlers
//!
//! AJAX endpoints (like, status, deletions) speak JSON; form posts
//! redirect back to the page they came from, original-style.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use kernel::id::{CommentId, ProductId};
use platform::encode::percent_encode;
use std::sync::Arc;
use uuid::Uuid;

use auth::middleware::{CurrentIdentity, wants_json};

use crate::application::{
    CreateCommentUseCase, CreateProductInput, CreateProductUseCase, CreateReplyUseCase,
    DeleteCommentUseCase, DeleteProductUseCase, ListProductsInput, ListProductsUseCase,
    ProductDetailUseCase, RemoveUserUseCase, ToggleLikeUseCase, UpdateProductInput,
    UpdateProductUseCase, UpdateStatusUseCase,
};
use crate::domain::repository::{
    CommentRepository, LikeRepository, ModerationRepository, ProductRepository,
};
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    CommentRequest, CommentNodeDto, EditProductRequest, LikeResponse, ProductDetailResponse,
    ProductImageDto, ProductListQuery, ProductListResponse, ProductSummaryDto, SellerDto,
    StatusUpdateRequest, StatusUpdateResponse, SuccessResponse, WriteProductRequest,
};

/// Shared state for market handlers
#[derive(Clone)]
pub struct MarketAppState<R>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
}

// ============================================================================
// Listing page
// ============================================================================

/// GET /product/list
pub async fn list<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Query(query): Query<ProductListQuery>,
) -> MarketResult<Json<ProductListResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let page = query.page.unwrap_or(1).max(1);

    let use_case = ListProductsUseCase::new(state.repo.clone());
    let summaries = use_case
        .execute(
            current.0.as_ref(),
            ListProductsInput {
                category: query.category,
                keyword: query.keyword,
                status: query.status,
                page: query.page,
            },
        )
        .await?;

    Ok(Json(ProductListResponse {
        products: summaries.iter().map(ProductSummaryDto::from_summary).collect(),
        page,
    }))
}

// ============================================================================
// Detail page
// ============================================================================

/// GET /product/{id}
pub async fn detail<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
) -> MarketResult<Json<ProductDetailResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    let use_case = ProductDetailUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
    );
    let detail = use_case.execute(current.0.as_ref(), &product_id).await?;

    Ok(Json(ProductDetailResponse {
        id: detail.product.product_id.to_string(),
        title: detail.product.title.clone(),
        price: detail.product.price.value(),
        category: detail.product.category.display_name().to_string(),
        description: detail.product.description.clone(),
        location: detail.product.location.clone(),
        status: detail.product.status.code().to_string(),
        images: detail.images.iter().map(ProductImageDto::from_image).collect(),
        seller: detail.seller.as_ref().map(SellerDto::from_profile),
        like_count: detail.like_count,
        liked_by_caller: detail.liked_by_caller,
        comments: detail
            .comments
            .iter()
            .map(|node| CommentNodeDto::from_node(node, current.0.as_ref()))
            .collect(),
        created_at_ms: detail.product.created_at.timestamp_millis(),
    }))
}

// ============================================================================
// Create / edit / delete
// ============================================================================

/// POST /product/write
pub async fn write<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    headers: HeaderMap,
    Form(req): Form<WriteProductRequest>,
) -> Response
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = CreateProductUseCase::new(state.repo.clone());

    let input = CreateProductInput {
        title: req.title,
        price: req.price,
        category: req.category,
        description: req.description,
        location: req.location,
        image_paths: req.image_path.into_iter().collect(),
    };

    match use_case.execute(current.0.as_ref(), input).await {
        Ok(product_id) => {
            if wants_json(&headers) {
                Json(serde_json::json!({
                    "success": true,
                    "id": product_id.to_string()
                }))
                .into_response()
            } else {
                Redirect::to("/product/list").into_response()
            }
        }
        Err(err) => form_error(err, &headers, "/product/write"),
    }
}

/// POST /product/{id}/edit
pub async fn edit<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Form(req): Form<EditProductRequest>,
) -> Response
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);
    let use_case = UpdateProductUseCase::new(state.repo.clone());

    let input = UpdateProductInput {
        title: req.title,
        price: req.price,
        category: req.category,
        description: req.description,
        location: req.location,
        replace_images: req.image_path.map(|path| {
            if path.is_empty() {
                Vec::new()
            } else {
                vec![path]
            }
        }),
    };

    match use_case.execute(current.0.as_ref(), &product_id, input).await {
        Ok(()) => {
            if wants_json(&headers) {
                Json(SuccessResponse { success: true }).into_response()
            } else {
                Redirect::to(&format!("/product/{}", id)).into_response()
            }
        }
        Err(err) => form_error(err, &headers, &format!("/product/{}/edit", id)),
    }
}

/// DELETE /product/{id}
pub async fn delete<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
) -> MarketResult<Json<SuccessResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    DeleteProductUseCase::new(state.repo.clone())
        .execute(current.0.as_ref(), &product_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================================
// Status / like (AJAX)
// ============================================================================

/// POST /product/{id}/status
pub async fn update_status<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
    Form(req): Form<StatusUpdateRequest>,
) -> MarketResult<Json<StatusUpdateResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    let status = UpdateStatusUseCase::new(state.repo.clone())
        .execute(current.0.as_ref(), &product_id, &req.status)
        .await?;

    Ok(Json(StatusUpdateResponse {
        success: true,
        status: status.code().to_string(),
    }))
}

/// POST /product/{id}/like
pub async fn toggle_like<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
) -> MarketResult<Json<LikeResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    let outcome = ToggleLikeUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(current.0.as_ref(), &product_id)
        .await?;

    Ok(Json(LikeResponse {
        success: true,
        liked: outcome.liked,
        like_count: outcome.like_count,
    }))
}

// ============================================================================
// Comments
// ============================================================================

/// POST /product/{id}/comment
pub async fn create_comment<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Form(req): Form<CommentRequest>,
) -> Response
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    let result = CreateCommentUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(current.0.as_ref(), &product_id, &req.content)
        .await;

    comment_outcome(result.map(|_| ()), &headers, id)
}

/// POST /product/{id}/comment/{comment_id}/reply
pub async fn create_reply<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    headers: HeaderMap,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
    Form(req): Form<CommentRequest>,
) -> Response
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);
    let parent_id = CommentId::from_uuid(comment_id);

    let result = CreateReplyUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(current.0.as_ref(), &product_id, &parent_id, &req.content)
        .await;

    comment_outcome(result.map(|_| ()), &headers, id)
}

/// DELETE /product/comment/{id}
pub async fn delete_comment<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
) -> MarketResult<Json<SuccessResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let comment_id = CommentId::from_uuid(id);

    let deleted = DeleteCommentUseCase::new(state.repo.clone())
        .execute(current.0.as_ref(), &comment_id)
        .await?;

    // "Not the author" is a refusal, not a server fault
    if !deleted {
        return Err(MarketError::Forbidden);
    }

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================================
// Admin moderation
// ============================================================================

/// DELETE /admin/user/{public_id}
pub async fn remove_user<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(public_id): Path<String>,
) -> MarketResult<Json<SuccessResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    RemoveUserUseCase::new(state.repo.clone())
        .execute(current.0.as_ref(), &public_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /admin/product/{id}
pub async fn remove_product<R>(
    State(state): State<MarketAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    Path(id): Path<Uuid>,
) -> MarketResult<Json<SuccessResponse>>
where
    R: ProductRepository
        + LikeRepository
        + CommentRepository
        + ModerationRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let product_id = ProductId::from_uuid(id);

    DeleteProductUseCase::new(state.repo.clone())
        .execute(current.0.as_ref(), &product_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Form-post failure: JSON for AJAX callers, redirect-with-error for browsers
fn form_error(err: MarketError, headers: &HeaderMap, back_to: &str) -> Response {
    if wants_json(headers) {
        err.into_response()
    } else {
        let message = err.to_app_error().message().to_string();
        // log through the same path as the JSON branch
        tracing::debug!(error = %message, "Form submission failed");
        Redirect::to(&format!("{}?error={}", back_to, percent_encode(&message)))
            .into_response()
    }
}

/// Comment/reply outcome: a 303 back to the product detail on success
fn comment_outcome(result: MarketResult<()>, headers: &HeaderMap, product_id: Uuid) -> Response {
    match result {
        Ok(()) => {
            if wants_json(headers) {
                Json(SuccessResponse { success: true }).into_response()
            } else {
                Redirect::to(&format!("/product/{}", product_id)).into_response()
            }
        }
        Err(err) => {
            if wants_json(headers) {
                err.into_response()
            } else {
                form_error(err, headers, &format!("/product/{}", product_id))
            }
        }
    }
}
