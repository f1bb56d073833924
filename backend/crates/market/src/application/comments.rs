//! Comment Use Cases
//!
//! Creation of comments and replies, and authorial deletion.

use std::sync::Arc;

use auth::{Capability, Identity, authorize};
use kernel::id::{CommentId, ProductId};

use crate::domain::entity::comment::Comment;
use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::error::{MarketError, MarketResult};

// ============================================================================
// Create Comment
// ============================================================================

/// Create a top-level comment on a listing
pub struct CreateCommentUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    product_repo: Arc<P>,
    comment_repo: Arc<C>,
}

impl<P, C> CreateCommentUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    pub fn new(product_repo: Arc<P>, comment_repo: Arc<C>) -> Self {
        Self {
            product_repo,
            comment_repo,
        }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
        content: &str,
    ) -> MarketResult<CommentId> {
        let identity = authorize(identity, Capability::Authenticated)?;

        let content = validate_content(content)?;

        if self.product_repo.find_by_id(product_id).await?.is_none() {
            return Err(MarketError::ProductNotFound);
        }

        let comment = Comment::new(*product_id, identity.user_id, content, None);
        self.comment_repo.create(&comment).await?;

        Ok(comment.comment_id)
    }
}

// ============================================================================
// Create Reply
// ============================================================================

/// Create a reply to an existing comment
pub struct CreateReplyUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    product_repo: Arc<P>,
    comment_repo: Arc<C>,
}

impl<P, C> CreateReplyUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    pub fn new(product_repo: Arc<P>, comment_repo: Arc<C>) -> Self {
        Self {
            product_repo,
            comment_repo,
        }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        product_id: &ProductId,
        parent_id: &CommentId,
        content: &str,
    ) -> MarketResult<CommentId> {
        let identity = authorize(identity, Capability::Authenticated)?;

        let content = validate_content(content)?;

        if self.product_repo.find_by_id(product_id).await?.is_none() {
            return Err(MarketError::ProductNotFound);
        }

        let parent = self
            .comment_repo
            .find_by_id(parent_id)
            .await?
            .ok_or(MarketError::CommentNotFound)?;

        // The schema alone does not force this; a reply must stay on the
        // product its parent belongs to
        if parent.product_id != *product_id {
            return Err(MarketError::Validation(
                "Reply must target a comment on the same product".to_string(),
            ));
        }

        let comment = Comment::new(*product_id, identity.user_id, content, Some(*parent_id));
        self.comment_repo.create(&comment).await?;

        Ok(comment.comment_id)
    }
}

// ============================================================================
// Delete Comment
// ============================================================================

/// Authorial comment deletion
pub struct DeleteCommentUseCase<C>
where
    C: CommentRepository,
{
    comment_repo: Arc<C>,
}

impl<C> DeleteCommentUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comment_repo: Arc<C>) -> Self {
        Self { comment_repo }
    }

    /// Returns `false` - not an error - when the caller is not the
    /// author; the transport layer maps that to a 403, never a 500.
    /// Deletion removes replies first, then the comment.
    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        comment_id: &CommentId,
    ) -> MarketResult<bool> {
        let identity = authorize(identity, Capability::Authenticated)?;

        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or(MarketError::CommentNotFound)?;

        if comment.user_id != identity.user_id {
            return Ok(false);
        }

        let removed = self.comment_repo.delete_with_replies(comment_id).await?;

        tracing::info!(
            comment_id = %comment_id,
            rows_removed = removed,
            "Comment deleted"
        );

        Ok(true)
    }
}

fn validate_content(content: &str) -> MarketResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(MarketError::Validation(
            "Comment cannot be empty".to_string(),
        ));
    }
    Ok(content.to_string())
}
