//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical post record persisted under `blogPosts`.
//! - Provide merge-patch and like helpers used by the post repository.
//!
//! # Invariants
//! - `id` is assigned at creation and never changes.
//! - `likes` defaults to 0 when absent and grows by exactly 1 per like.

use super::Record;
use serde::{Deserialize, Serialize};

/// Stable identifier of a post.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PostId = String;

/// Canonical post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Records written without a counter decode as 0.
    #[serde(default)]
    pub likes: u64,
}

/// Creation input for a post. The repository assigns `id` and `likes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Partial post used by merge-update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }
}

impl Post {
    /// Builds a fresh post with zero likes.
    pub fn from_new(id: impl Into<PostId>, input: NewPost) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            content: input.content,
            likes: 0,
        }
    }

    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    /// Adds one like.
    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }
}
