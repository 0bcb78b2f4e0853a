//! Record id generation.
//!
//! # Responsibility
//! - Produce short alphanumeric ids for new posts and comments.
//! - Allow deterministic ids in tests through `SequentialIdGenerator`.
//!
//! # Invariants
//! - Generated ids are non-empty and contain only `[0-9a-z-]`.
//! - Uniqueness inside a collection is enforced by repositories, which retry
//!   on collision.

use std::cell::Cell;
use uuid::Uuid;

const TOKEN_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Capability that hands out fresh record ids.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random 9-char base36 token drawn from a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut value = Uuid::new_v4().as_u128();
        let mut token = String::with_capacity(TOKEN_LEN);
        for _ in 0..TOKEN_LEN {
            token.push(char::from(BASE36[(value % 36) as usize]));
            value /= 36;
        }
        token
    }
}

/// Deterministic `<prefix>-<n>` ids starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let current = self.next.get();
        self.next.set(current + 1);
        format!("{}-{current}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
    use std::collections::HashSet;

    #[test]
    fn random_ids_are_short_base36_tokens() {
        let id = RandomIdGenerator.next_id();
        assert_eq!(id.len(), 9);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn random_ids_do_not_repeat_in_practice() {
        let ids: HashSet<String> = (0..1_000).map(|_| RandomIdGenerator.next_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::new("post");
        assert_eq!(ids.next_id(), "post-1");
        assert_eq!(ids.next_id(), "post-2");
    }
}
