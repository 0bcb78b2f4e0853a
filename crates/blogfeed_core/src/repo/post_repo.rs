//! Post repository contract and record-store implementation.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete/like over the `blogPosts` collection.
//!
//! # Invariants
//! - List order equals insertion order.
//! - Deleting a post never touches its comment partition.

use super::{fresh_id, RepoError, RepoResult};
use crate::id::IdGenerator;
use crate::model::position_of;
use crate::model::post::{NewPost, Post, PostPatch};
use crate::store::{RecordStore, StorageBackend};
use log::debug;

/// Storage key of the post collection.
pub const POSTS_KEY: &str = "blogPosts";

/// Repository interface for post operations.
pub trait PostRepository {
    /// Returns every post in store order.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
    fn get_post(&self, id: &str) -> RepoResult<Option<Post>>;
    /// Appends a post with a fresh id and zero likes and returns the stored record.
    fn create_post(&self, input: NewPost) -> RepoResult<Post>;
    /// Merges `patch` over the post with `id`.
    fn update_post(&self, id: &str, patch: PostPatch) -> RepoResult<Post>;
    /// Removes the post with `id`; absent ids are a no-op.
    fn delete_post(&self, id: &str) -> RepoResult<()>;
    /// Adds one like; returns `None` when `id` is absent.
    fn like_post(&self, id: &str) -> RepoResult<Option<Post>>;
}

/// Post repository backed by a `RecordStore`.
pub struct StoredPostRepository<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
    ids: &'s dyn IdGenerator,
}

impl<'s, B: StorageBackend> StoredPostRepository<'s, B> {
    pub fn new(store: &'s RecordStore<B>, ids: &'s dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    fn load(&self) -> RepoResult<Vec<Post>> {
        Ok(self.store.read(POSTS_KEY)?)
    }

    fn save(&self, posts: &[Post]) -> RepoResult<()> {
        Ok(self.store.write(POSTS_KEY, posts)?)
    }
}

impl<B: StorageBackend> PostRepository for StoredPostRepository<'_, B> {
    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        self.load()
    }

    fn get_post(&self, id: &str) -> RepoResult<Option<Post>> {
        Ok(self.load()?.into_iter().find(|post| post.id == id))
    }

    fn create_post(&self, input: NewPost) -> RepoResult<Post> {
        let mut posts = self.load()?;
        let id = fresh_id(self.ids, &posts, POSTS_KEY)?;
        let post = Post::from_new(id, input);
        posts.push(post.clone());
        self.save(&posts)?;

        debug!(
            "event=post_create module=repo status=ok post_id={} total={}",
            post.id,
            posts.len()
        );
        Ok(post)
    }

    fn update_post(&self, id: &str, patch: PostPatch) -> RepoResult<Post> {
        let mut posts = self.load()?;
        let Some(index) = position_of(&posts, id) else {
            return Err(RepoError::PostNotFound(id.to_string()));
        };

        posts[index].apply(patch);
        self.save(&posts)?;
        debug!("event=post_update module=repo status=ok post_id={id}");
        Ok(posts[index].clone())
    }

    fn delete_post(&self, id: &str) -> RepoResult<()> {
        let mut posts = self.load()?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            debug!("event=post_delete module=repo status=noop post_id={id}");
            return Ok(());
        }

        self.save(&posts)?;
        debug!("event=post_delete module=repo status=ok post_id={id}");
        Ok(())
    }

    fn like_post(&self, id: &str) -> RepoResult<Option<Post>> {
        let mut posts = self.load()?;
        let Some(index) = position_of(&posts, id) else {
            return Ok(None);
        };

        posts[index].like();
        self.save(&posts)?;
        debug!(
            "event=post_like module=repo status=ok post_id={} likes={}",
            id, posts[index].likes
        );
        Ok(Some(posts[index].clone()))
    }
}
