//! Resource repositories over the record store.
//!
//! # Responsibility
//! - Provide typed CRUD + like contracts for posts and comment partitions.
//! - Own collection key naming (`blogPosts`, `blogComments_<postId>`).
//!
//! # Invariants
//! - Every mutation is a read-modify-write of exactly one collection key.
//! - Absence on `get`/`delete`/`like` is a value, never an error.
//! - `update` on a missing id is `NotFound` and writes nothing.

use crate::id::IdGenerator;
use crate::model::comment::CommentId;
use crate::model::post::PostId;
use crate::model::{position_of, Record};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_repo;
pub mod post_repo;

const MAX_ID_ATTEMPTS: usize = 8;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for post and comment operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    PostNotFound(PostId),
    CommentNotFound {
        post_id: PostId,
        comment_id: CommentId,
    },
    /// Id generator kept producing ids already present in the collection.
    IdCollision {
        key: String,
        attempts: usize,
    },
}

impl RepoError {
    /// Whether this error is one of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::CommentNotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::CommentNotFound {
                post_id,
                comment_id,
            } => write!(f, "comment not found: {comment_id} (post {post_id})"),
            Self::IdCollision { key, attempts } => write!(
                f,
                "could not generate a unique id for `{key}` after {attempts} attempts"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Draws ids until one is not already used in `existing`.
fn fresh_id<R: Record>(ids: &dyn IdGenerator, existing: &[R], key: &str) -> RepoResult<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = ids.next_id();
        if position_of(existing, &candidate).is_none() {
            return Ok(candidate);
        }
    }

    Err(RepoError::IdCollision {
        key: key.to_string(),
        attempts: MAX_ID_ATTEMPTS,
    })
}
