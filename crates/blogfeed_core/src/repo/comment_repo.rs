//! Comment repository contract and record-store implementation.
//!
//! # Responsibility
//! - Provide CRUD + like over per-post comment partitions.
//! - Enumerate stored partitions, orphaned ones included.
//!
//! # Invariants
//! - Each post owns one partition under `blogComments_<postId>`.
//! - An operation on one partition never reads or writes another.
//! - Partitions are never created or removed as a side effect of post operations.

use super::{fresh_id, RepoError, RepoResult};
use crate::id::IdGenerator;
use crate::model::comment::{Comment, CommentPatch, NewComment};
use crate::model::position_of;
use crate::model::post::PostId;
use crate::store::{RecordStore, StorageBackend};
use log::debug;

/// Key prefix shared by all comment partitions.
pub const COMMENTS_KEY_PREFIX: &str = "blogComments_";

/// Storage key of the comment partition owned by `post_id`.
pub fn comments_key(post_id: &str) -> String {
    format!("{COMMENTS_KEY_PREFIX}{post_id}")
}

/// Repository interface for comment operations scoped by post.
pub trait CommentRepository {
    /// Returns the partition for `post_id` in store order.
    fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>>;
    fn get_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>>;
    /// Appends a comment carrying `post_id` and returns the stored record.
    fn create_comment(&self, post_id: &str, input: NewComment) -> RepoResult<Comment>;
    fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        patch: CommentPatch,
    ) -> RepoResult<Comment>;
    /// Removes one comment; absent ids are a no-op.
    fn delete_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<()>;
    /// Adds one like to exactly the matching comment.
    fn like_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>>;
    /// Post ids that currently own a stored partition, in key order.
    fn partition_post_ids(&self) -> RepoResult<Vec<PostId>>;
}

/// Comment repository backed by a `RecordStore`.
pub struct StoredCommentRepository<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
    ids: &'s dyn IdGenerator,
}

impl<'s, B: StorageBackend> StoredCommentRepository<'s, B> {
    pub fn new(store: &'s RecordStore<B>, ids: &'s dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    fn load(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        Ok(self.store.read(&comments_key(post_id))?)
    }

    fn save(&self, post_id: &str, comments: &[Comment]) -> RepoResult<()> {
        Ok(self.store.write(&comments_key(post_id), comments)?)
    }
}

impl<B: StorageBackend> CommentRepository for StoredCommentRepository<'_, B> {
    fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        self.load(post_id)
    }

    fn get_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>> {
        Ok(self
            .load(post_id)?
            .into_iter()
            .find(|comment| comment.id == comment_id))
    }

    fn create_comment(&self, post_id: &str, input: NewComment) -> RepoResult<Comment> {
        let mut comments = self.load(post_id)?;
        let id = fresh_id(self.ids, &comments, &comments_key(post_id))?;
        let comment = Comment::from_new(id, post_id, input);
        comments.push(comment.clone());
        self.save(post_id, &comments)?;

        debug!(
            "event=comment_create module=repo status=ok post_id={} comment_id={} total={}",
            post_id,
            comment.id,
            comments.len()
        );
        Ok(comment)
    }

    fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        patch: CommentPatch,
    ) -> RepoResult<Comment> {
        let mut comments = self.load(post_id)?;
        let Some(index) = position_of(&comments, comment_id) else {
            return Err(RepoError::CommentNotFound {
                post_id: post_id.to_string(),
                comment_id: comment_id.to_string(),
            });
        };

        comments[index].apply(patch);
        self.save(post_id, &comments)?;
        debug!(
            "event=comment_update module=repo status=ok post_id={post_id} comment_id={comment_id}"
        );
        Ok(comments[index].clone())
    }

    fn delete_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<()> {
        let mut comments = self.load(post_id)?;
        let before = comments.len();
        comments.retain(|comment| comment.id != comment_id);
        if comments.len() == before {
            return Ok(());
        }

        self.save(post_id, &comments)?;
        debug!(
            "event=comment_delete module=repo status=ok post_id={post_id} comment_id={comment_id}"
        );
        Ok(())
    }

    fn like_comment(&self, post_id: &str, comment_id: &str) -> RepoResult<Option<Comment>> {
        let mut comments = self.load(post_id)?;
        let Some(index) = position_of(&comments, comment_id) else {
            return Ok(None);
        };

        comments[index].like();
        self.save(post_id, &comments)?;
        Ok(Some(comments[index].clone()))
    }

    fn partition_post_ids(&self) -> RepoResult<Vec<PostId>> {
        // Any suffix is a post id, including empty and multi-line ones.
        Ok(self
            .store
            .keys()?
            .iter()
            .filter_map(|key| key.strip_prefix(COMMENTS_KEY_PREFIX))
            .map(str::to_string)
            .collect())
    }
}
