//! Feed use-case service.
//!
//! # Responsibility
//! - Provide the CRUD and like entry points used by the view layer.
//! - Assemble the feed: every post with its comment partition attached.
//! - Project feed entries into display cards (previews, counts, top comments).
//!
//! # Invariants
//! - Feed reads are rebuilt from storage on every call; nothing is cached.
//! - Posts appear in store order and comments in partition order.
//! - A failing partition read aborts the whole feed read.
//! - Deleting a post keeps its comment partition (see `orphaned_partitions`).

use crate::model::comment::{Comment, CommentPatch, NewComment};
use crate::model::post::{NewPost, Post, PostId, PostPatch};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::post_repo::PostRepository;
use crate::repo::RepoResult;
use crate::service::post_list::{derive_preview, sort_posts, PostSortField, SortDirection};
use log::{info, warn};
use std::collections::HashSet;
use std::time::Instant;

const POST_PREVIEW_CHARS: usize = 100;
const COMMENT_PREVIEW_CHARS: usize = 50;
const FEED_CARD_COMMENTS: usize = 2;

/// One post with its full comment partition attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Display options for `FeedService::feed_cards`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCardOptions {
    /// Characters kept from post content.
    pub post_preview_chars: usize,
    /// Characters kept from each shown comment.
    pub comment_preview_chars: usize,
    /// Leading comments shown per card.
    pub max_comments: usize,
}

impl Default for FeedCardOptions {
    fn default() -> Self {
        Self {
            post_preview_chars: POST_PREVIEW_CHARS,
            comment_preview_chars: COMMENT_PREVIEW_CHARS,
            max_comments: FEED_CARD_COMMENTS,
        }
    }
}

/// Shortened comment shown on a feed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPreview {
    pub comment_id: String,
    pub preview: String,
    pub likes: u64,
}

/// Display projection of one feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCard {
    pub post_id: PostId,
    pub title: String,
    pub preview: String,
    pub likes: u64,
    /// Size of the full partition, not of `top_comments`.
    pub comment_count: usize,
    pub top_comments: Vec<CommentPreview>,
    pub has_more_comments: bool,
}

/// Feed service facade over post and comment repositories.
pub struct FeedService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> FeedService<P, C> {
    /// Creates a service using the provided repository implementations.
    pub fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub fn list_posts(&self) -> RepoResult<Vec<Post>> {
        self.posts.list_posts()
    }

    /// Lists posts sorted for table display. Storage order is not changed.
    pub fn list_posts_sorted(
        &self,
        field: PostSortField,
        direction: SortDirection,
    ) -> RepoResult<Vec<Post>> {
        let posts = self.posts.list_posts()?;
        Ok(sort_posts(&posts, field, direction))
    }

    pub fn get_post(&self, id: &str) -> RepoResult<Option<Post>> {
        self.posts.get_post(id)
    }

    pub fn create_post(&self, input: NewPost) -> RepoResult<Post> {
        self.posts.create_post(input)
    }

    /// Returns repository-level not-found errors unchanged.
    pub fn update_post(&self, id: &str, patch: PostPatch) -> RepoResult<Post> {
        self.posts.update_post(id, patch)
    }

    /// Deletes a post. Its comment partition is left in place.
    pub fn delete_post(&self, id: &str) -> RepoResult<()> {
        self.posts.delete_post(id)
    }

    pub fn like_post(&self, id: &str) -> RepoResult<Option<Post>> {
        self.posts.like_post(id)
    }

    pub fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        self.comments.list_comments(post_id)
    }

    pub fn get_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>> {
        self.comments.get_comment(post_id, comment_id)
    }

    /// Adds a comment under `post_id`. The post itself is not checked or touched.
    pub fn add_comment(&self, post_id: &str, input: NewComment) -> RepoResult<Comment> {
        self.comments.create_comment(post_id, input)
    }

    pub fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        patch: CommentPatch,
    ) -> RepoResult<Comment> {
        self.comments.update_comment(post_id, comment_id, patch)
    }

    pub fn delete_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<()> {
        self.comments.delete_comment(post_id, comment_id)
    }

    pub fn like_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>> {
        self.comments.like_comment(post_id, comment_id)
    }

    /// Loads every post with its comments attached.
    pub fn load_feed(&self) -> RepoResult<Vec<FeedEntry>> {
        let started_at = Instant::now();
        let posts = self.posts.list_posts()?;
        let mut entries = Vec::with_capacity(posts.len());
        for post in posts {
            let comments = match self.comments.list_comments(&post.id) {
                Ok(comments) => comments,
                Err(err) => {
                    warn!(
                        "event=feed_load module=service status=error post_id={} error={}",
                        post.id, err
                    );
                    return Err(err);
                }
            };
            entries.push(FeedEntry { post, comments });
        }

        info!(
            "event=feed_load module=service status=ok posts={} duration_ms={}",
            entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entries)
    }

    /// Loads the feed and projects it into display cards.
    pub fn feed_cards(&self, options: FeedCardOptions) -> RepoResult<Vec<FeedCard>> {
        Ok(self
            .load_feed()?
            .iter()
            .map(|entry| to_feed_card(entry, options))
            .collect())
    }

    /// Post ids that own a comment partition but no longer exist as posts.
    pub fn orphaned_partitions(&self) -> RepoResult<Vec<PostId>> {
        let live: HashSet<PostId> = self
            .posts
            .list_posts()?
            .into_iter()
            .map(|post| post.id)
            .collect();
        Ok(self
            .comments
            .partition_post_ids()?
            .into_iter()
            .filter(|post_id| !live.contains(post_id))
            .collect())
    }
}

/// Projects one feed entry into its display card.
pub fn to_feed_card(entry: &FeedEntry, options: FeedCardOptions) -> FeedCard {
    let top_comments = entry
        .comments
        .iter()
        .take(options.max_comments)
        .map(|comment| CommentPreview {
            comment_id: comment.id.clone(),
            preview: derive_preview(&comment.content, options.comment_preview_chars),
            likes: comment.likes,
        })
        .collect();

    FeedCard {
        post_id: entry.post.id.clone(),
        title: entry.post.title.clone(),
        preview: derive_preview(&entry.post.content, options.post_preview_chars),
        likes: entry.post.likes,
        comment_count: entry.comments.len(),
        top_comments,
        has_more_comments: entry.comments.len() > options.max_comments,
    }
}
