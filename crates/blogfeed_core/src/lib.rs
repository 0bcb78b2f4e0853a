//! Core domain logic for the blog feed.
//! This crate is the single source of truth for post/comment invariants.

pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use id::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comment::{Comment, CommentId, CommentPatch, NewComment};
pub use model::post::{NewPost, Post, PostId, PostPatch};
pub use model::Record;
pub use repo::comment_repo::{comments_key, CommentRepository, StoredCommentRepository};
pub use repo::post_repo::{PostRepository, StoredPostRepository, POSTS_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::feed_service::{
    CommentPreview, FeedCard, FeedCardOptions, FeedEntry, FeedService,
};
pub use service::post_list::{derive_preview, sort_posts, PostSortField, SortDirection};
pub use store::{
    MemoryStorage, RecordStore, SqliteStorage, StorageBackend, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
