//! Blog domain model for posts and their comment partitions.
//!
//! # Responsibility
//! - Define the persisted record shapes for posts and comments.
//! - Define creation inputs and merge patches per resource.
//!
//! # Invariants
//! - Every record is identified by an `id` unique within its collection.
//! - `likes` only changes through the explicit like operations.

pub mod comment;
pub mod post;

/// Shared identity contract for records stored in one collection.
pub trait Record {
    /// Stable identifier, unique within the owning collection.
    fn id(&self) -> &str;
}

/// Returns the index of the record with `id`, if present.
pub fn position_of<R: Record>(records: &[R], id: &str) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}
