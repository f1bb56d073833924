//! Comment Entity

use auth::UserId;
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ProductId};

/// Comment entity
///
/// `parent_id` makes this a self-referencing tree. Current usage is two
/// levels (comment + replies); creation validates that a parent belongs
/// to the same product.
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        product_id: ProductId,
        user_id: UserId,
        content: String,
        parent_id: Option<CommentId>,
    ) -> Self {
        Self {
            comment_id: CommentId::new(),
            product_id,
            user_id,
            content,
            parent_id,
            created_at: Utc::now(),
        }
    }

    /// Is this a reply (as opposed to a top-level comment)?
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_comment() {
        let comment = Comment::new(
            ProductId::new(),
            UserId::new(),
            "Is this still available?".to_string(),
            None,
        );
        assert!(!comment.is_reply());
    }

    #[test]
    fn test_reply() {
        let parent = CommentId::new();
        let reply = Comment::new(
            ProductId::new(),
            UserId::new(),
            "Yes it is".to_string(),
            Some(parent),
        );
        assert!(reply.is_reply());
        assert_eq!(reply.parent_id, Some(parent));
    }
}
