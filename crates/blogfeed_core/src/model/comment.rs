//! Comment domain model.
//!
//! # Responsibility
//! - Define the comment record persisted in per-post partitions.
//!
//! # Invariants
//! - `post_id` is denormalized into the record and matches the partition key.
//! - `post_id` is not validated against the post collection.

use super::post::PostId;
use super::Record;
use serde::{Deserialize, Serialize};

/// Identifier of a comment, unique within its post partition.
pub type CommentId = String;

/// Canonical comment record. Serialized with `postId` to keep the stored layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub content: String,
    #[serde(default)]
    pub likes: u64,
}

/// Creation input for a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Partial comment used by merge-update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl CommentPatch {
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
        }
    }
}

impl Comment {
    pub fn from_new(
        id: impl Into<CommentId>,
        post_id: impl Into<PostId>,
        input: NewComment,
    ) -> Self {
        Self {
            id: id.into(),
            post_id: post_id.into(),
            content: input.content,
            likes: 0,
        }
    }

    pub fn apply(&mut self, patch: CommentPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }
}

impl Record for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}
