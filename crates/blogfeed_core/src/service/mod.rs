//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate post and comment repositories into feed-level use cases.
//! - Derive read-only display projections (previews, counts, sorting).
//!
//! # Invariants
//! - Derived orderings and truncations are never persisted.

pub mod feed_service;
pub mod post_list;
