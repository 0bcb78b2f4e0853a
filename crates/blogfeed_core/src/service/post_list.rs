//! Read-only list derivations for posts and comments.
//!
//! # Responsibility
//! - Sort a copy of the post list by a chosen field and direction.
//! - Derive truncated text previews for cards and tables.
//!
//! # Invariants
//! - Sorting is stable: ties keep store order in both directions.
//! - Titles and ids compare by UTF-16 code units, matching the web views.
//! - Previews count characters, never bytes.

use crate::model::post::Post;
use std::cmp::Ordering;

const ELLIPSIS: &str = "...";

/// Field a post list can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSortField {
    #[default]
    Title,
    Id,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Returns a sorted copy of `posts`.
pub fn sort_posts(posts: &[Post], field: PostSortField, direction: SortDirection) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = utf16_cmp(sort_key(a, field), sort_key(b, field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn sort_key(post: &Post, field: PostSortField) -> &str {
    match field {
        PostSortField::Title => post.title.as_str(),
        PostSortField::Id => post.id.as_str(),
    }
}

// Differs from `str::cmp` only between astral chars and U+E000..=U+FFFF.
fn utf16_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// First `max_chars` characters of `content` followed by `...`.
///
/// Content is kept verbatim; the marker is appended even to short text so
/// every card reads as an excerpt.
pub fn derive_preview(content: &str, max_chars: usize) -> String {
    let mut preview: String = content.chars().take(max_chars).collect();
    preview.push_str(ELLIPSIS);
    preview
}
