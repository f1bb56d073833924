//! Comment Thread Builder
//!
//! Turns the flat, chronologically-ordered comment rows of a product into
//! a reply tree. Top-level comments keep arrival order (oldest first) and
//! each reply is appended to its parent's reply list in arrival order.
//!
//! A reply whose parent id is not in the input set (the parent was
//! deleted) is dropped from the tree; the drop is counted and surfaced
//! with a warning instead of disappearing silently. Replies attach to
//! whatever parent they declare, so deeper nesting is representable even
//! though consumers expect two levels.

use std::collections::HashMap;

use kernel::id::CommentId;

use crate::domain::entity::comment::Comment;

/// A flat comment row joined with its author's display fields
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author_name: String,
    pub author_image_path: Option<String>,
}

/// A comment enriched with its materialized replies
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    pub author_name: String,
    pub author_image_path: Option<String>,
    pub replies: Vec<CommentNode>,
}

/// Build the reply tree from flat rows.
///
/// The input is expected in chronological order; the output preserves it
/// both for top-level comments and within each reply list.
pub fn build_thread(rows: Vec<CommentRecord>) -> Vec<CommentNode> {
    let known: std::collections::HashSet<CommentId> =
        rows.iter().map(|r| r.comment.comment_id).collect();

    let mut roots: Vec<CommentRecord> = Vec::new();
    let mut children: HashMap<CommentId, Vec<CommentRecord>> = HashMap::new();
    let mut orphaned = 0usize;

    for row in rows {
        match row.comment.parent_id {
            None => roots.push(row),
            Some(parent_id) if known.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(row);
            }
            Some(_) => orphaned += 1,
        }
    }

    let nodes: Vec<CommentNode> = roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect();

    // Anything left in the map hangs off a parent that was itself dropped
    let stranded: usize = children.values().map(Vec::len).sum();
    if orphaned + stranded > 0 {
        tracing::warn!(
            dropped = orphaned + stranded,
            "Dropped comments whose parent is missing from the thread"
        );
    }

    nodes
}

fn attach_replies(
    record: CommentRecord,
    children: &mut HashMap<CommentId, Vec<CommentRecord>>,
) -> CommentNode {
    let replies = children
        .remove(&record.comment.comment_id)
        .unwrap_or_default()
        .into_iter()
        .map(|reply| attach_replies(reply, children))
        .collect();

    CommentNode {
        comment: record.comment,
        author_name: record.author_name,
        author_image_path: record.author_image_path,
        replies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::UserId;
    use kernel::id::ProductId;
    use uuid::Uuid;

    fn id(n: u128) -> CommentId {
        CommentId::from_uuid(Uuid::from_u128(n))
    }

    fn record(product: ProductId, comment_id: u128, parent: Option<u128>) -> CommentRecord {
        let mut comment = Comment::new(
            product,
            UserId::new(),
            format!("comment {}", comment_id),
            parent.map(id),
        );
        comment.comment_id = id(comment_id);
        CommentRecord {
            comment,
            author_name: "Alice".to_string(),
            author_image_path: None,
        }
    }

    #[test]
    fn test_two_level_thread_with_orphan_drop() {
        let product = ProductId::new();
        let rows = vec![
            record(product, 1, None),
            record(product, 2, Some(1)),
            record(product, 3, None),
            record(product, 4, Some(99)), // parent not in the set
        ];

        let thread = build_thread(rows);

        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].comment.comment_id, id(1));
        assert_eq!(thread[1].comment.comment_id, id(3));

        assert_eq!(thread[0].replies.len(), 1);
        assert_eq!(thread[0].replies[0].comment.comment_id, id(2));
        assert!(thread[1].replies.is_empty());

        // id 4 appears nowhere in the output
        fn contains(nodes: &[CommentNode], target: CommentId) -> bool {
            nodes.iter().any(|n| {
                n.comment.comment_id == target || contains(&n.replies, target)
            })
        }
        assert!(!contains(&thread, id(4)));
    }

    #[test]
    fn test_reply_order_preserved() {
        let product = ProductId::new();
        let rows = vec![
            record(product, 1, None),
            record(product, 2, Some(1)),
            record(product, 3, Some(1)),
            record(product, 4, Some(1)),
        ];

        let thread = build_thread(rows);
        let reply_ids: Vec<CommentId> = thread[0]
            .replies
            .iter()
            .map(|r| r.comment.comment_id)
            .collect();
        assert_eq!(reply_ids, vec![id(2), id(3), id(4)]);
    }

    #[test]
    fn test_reply_to_reply_nests() {
        // The data model permits it; the builder attaches to whatever
        // parent is declared
        let product = ProductId::new();
        let rows = vec![
            record(product, 1, None),
            record(product, 2, Some(1)),
            record(product, 3, Some(2)),
        ];

        let thread = build_thread(rows);
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].replies.len(), 1);
        assert_eq!(thread[0].replies[0].replies.len(), 1);
        assert_eq!(
            thread[0].replies[0].replies[0].comment.comment_id,
            id(3)
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_thread(Vec::new()).is_empty());
    }
}
