//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose post, comment and feed use cases to Dart via FRB.
//! - Map core errors into response envelopes with readable messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens storage, runs one use case, and closes it again, so
//!   callers always observe the latest stored collections.
//! - Absent records are reported with `ok=true` and an empty payload;
//!   `ok=false` is reserved for errors.

use blogfeed_core::db::open_db;
use blogfeed_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Comment, CommentPatch, FeedCard, FeedCardOptions, FeedService, NewComment, NewPost, Post,
    PostPatch, PostSortField, RandomIdGenerator, RecordStore, RepoResult, SortDirection,
    SqliteStorage, StoredCommentRepository, StoredPostRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "blogfeed.sqlite3";
const DB_PATH_ENV: &str = "BLOGFEED_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type DbFeedService<'s> = FeedService<
    StoredPostRepository<'s, SqliteStorage<'s>>,
    StoredCommentRepository<'s, SqliteStorage<'s>>,
>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Post row as shown by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
}

/// Comment row as shown by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub likes: u64,
}

/// Shortened comment on a feed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPreviewItem {
    pub comment_id: String,
    pub preview: String,
    pub likes: u64,
}

/// One card of the home feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCardItem {
    pub post_id: String,
    pub title: String,
    pub preview: String,
    pub likes: u64,
    pub comment_count: u32,
    pub comments: Vec<CommentPreviewItem>,
    pub has_more_comments: bool,
}

/// Envelope for calls returning at most one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    pub ok: bool,
    /// `None` when the post does not exist or the call failed.
    pub post: Option<PostItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListResponse {
    pub ok: bool,
    pub items: Vec<PostItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentResponse {
    pub ok: bool,
    pub comment: Option<CommentItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListResponse {
    pub ok: bool,
    pub items: Vec<CommentItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub ok: bool,
    pub cards: Vec<FeedCardItem>,
    pub message: String,
}

/// Envelope for calls without payload (delete, reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Lists posts, optionally sorted by `title` or `id`.
///
/// # FFI contract
/// - `sort_field = None` keeps store order and ignores `descending`.
/// - Unknown sort fields fail with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn posts_list(sort_field: Option<String>, descending: bool) -> PostListResponse {
    let field = match sort_field.as_deref().map(str::trim) {
        None => None,
        Some(raw) => match parse_sort_field(raw) {
            Some(field) => Some(field),
            None => {
                return PostListResponse {
                    ok: false,
                    items: Vec::new(),
                    message: format!("posts_list failed: unknown sort field `{raw}`"),
                }
            }
        },
    };
    let direction = if descending {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let result = with_feed_service(|service| match field {
        Some(field) => service.list_posts_sorted(field, direction),
        None => service.list_posts(),
    });
    match result {
        Ok(posts) => PostListResponse {
            ok: true,
            message: format!("Found {} post(s).", posts.len()),
            items: posts.into_iter().map(to_post_item).collect(),
        },
        Err(err) => PostListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("posts_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn post_get(id: String) -> PostResponse {
    post_response(
        "post_get",
        with_feed_service(|service| service.get_post(id.trim())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn post_create(title: String, content: String) -> PostResponse {
    post_response(
        "post_create",
        with_feed_service(|service| service.create_post(NewPost::new(title, content)).map(Some)),
    )
}

/// Merge-updates a post; `None` fields are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn post_update(id: String, title: Option<String>, content: Option<String>) -> PostResponse {
    let patch = PostPatch { title, content };
    post_response(
        "post_update",
        with_feed_service(|service| service.update_post(id.trim(), patch).map(Some)),
    )
}

/// Deletes a post. Its comments stay in storage.
#[flutter_rust_bridge::frb(sync)]
pub fn post_delete(id: String) -> ActionResponse {
    action_response(
        "post_delete",
        with_feed_service(|service| service.delete_post(id.trim())),
        "Post deleted.",
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn post_like(id: String) -> PostResponse {
    post_response(
        "post_like",
        with_feed_service(|service| service.like_post(id.trim())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn comments_list(post_id: String) -> CommentListResponse {
    match with_feed_service(|service| service.list_comments(post_id.trim())) {
        Ok(comments) => CommentListResponse {
            ok: true,
            message: format!("Found {} comment(s).", comments.len()),
            items: comments.into_iter().map(to_comment_item).collect(),
        },
        Err(err) => CommentListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("comments_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn comment_get(post_id: String, comment_id: String) -> CommentResponse {
    comment_response(
        "comment_get",
        with_feed_service(|service| service.get_comment(post_id.trim(), comment_id.trim())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn comment_create(post_id: String, content: String) -> CommentResponse {
    comment_response(
        "comment_create",
        with_feed_service(|service| {
            service
                .add_comment(post_id.trim(), NewComment::new(content))
                .map(Some)
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn comment_update(post_id: String, comment_id: String, content: String) -> CommentResponse {
    comment_response(
        "comment_update",
        with_feed_service(|service| {
            service
                .update_comment(
                    post_id.trim(),
                    comment_id.trim(),
                    CommentPatch::content(content),
                )
                .map(Some)
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn comment_delete(post_id: String, comment_id: String) -> ActionResponse {
    action_response(
        "comment_delete",
        with_feed_service(|service| service.delete_comment(post_id.trim(), comment_id.trim())),
        "Comment deleted.",
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn comment_like(post_id: String, comment_id: String) -> CommentResponse {
    comment_response(
        "comment_like",
        with_feed_service(|service| service.like_comment(post_id.trim(), comment_id.trim())),
    )
}

/// Loads the home feed cards (100-char post previews, first 2 comments).
#[flutter_rust_bridge::frb(sync)]
pub fn feed_load() -> FeedResponse {
    match with_feed_service(|service| service.feed_cards(FeedCardOptions::default())) {
        Ok(cards) => FeedResponse {
            ok: true,
            message: format!("Loaded {} card(s).", cards.len()),
            cards: cards.into_iter().map(to_feed_card_item).collect(),
        },
        Err(err) => FeedResponse {
            ok: false,
            cards: Vec::new(),
            message: format!("feed_load failed: {err}"),
        },
    }
}

/// Clears every stored collection. Irreversible; meant for manual diagnostics.
#[flutter_rust_bridge::frb(sync)]
pub fn storage_reset() -> ActionResponse {
    let result = open_db(resolve_db_path())
        .map_err(|err| format!("db open failed: {err}"))
        .and_then(|conn| {
            let storage =
                SqliteStorage::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
            RecordStore::new(storage)
                .reset()
                .map_err(|err| err.to_string())
        });
    match result {
        Ok(()) => ActionResponse {
            ok: true,
            message: "Storage cleared.".to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("storage_reset failed: {err}"),
        },
    }
}

fn parse_sort_field(raw: &str) -> Option<PostSortField> {
    match raw.to_ascii_lowercase().as_str() {
        "title" => Some(PostSortField::Title),
        "id" => Some(PostSortField::Id),
        _ => None,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_feed_service<T>(
    f: impl FnOnce(&DbFeedService<'_>) -> RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("db open failed: {err}"))?;
    let storage =
        SqliteStorage::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
    let store = RecordStore::new(storage);
    let ids = RandomIdGenerator;
    let service = FeedService::new(
        StoredPostRepository::new(&store, &ids),
        StoredCommentRepository::new(&store, &ids),
    );
    f(&service).map_err(|err| err.to_string())
}

fn post_response(op: &str, result: Result<Option<Post>, String>) -> PostResponse {
    match result {
        Ok(Some(post)) => PostResponse {
            ok: true,
            post: Some(to_post_item(post)),
            message: "OK".to_string(),
        },
        Ok(None) => PostResponse {
            ok: true,
            post: None,
            message: "Post not found.".to_string(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi op={op} status=error");
            PostResponse {
                ok: false,
                post: None,
                message: format!("{op} failed: {err}"),
            }
        }
    }
}

fn comment_response(op: &str, result: Result<Option<Comment>, String>) -> CommentResponse {
    match result {
        Ok(Some(comment)) => CommentResponse {
            ok: true,
            comment: Some(to_comment_item(comment)),
            message: "OK".to_string(),
        },
        Ok(None) => CommentResponse {
            ok: true,
            comment: None,
            message: "Comment not found.".to_string(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi op={op} status=error");
            CommentResponse {
                ok: false,
                comment: None,
                message: format!("{op} failed: {err}"),
            }
        }
    }
}

fn action_response(op: &str, result: Result<(), String>, success: &str) -> ActionResponse {
    match result {
        Ok(()) => ActionResponse {
            ok: true,
            message: success.to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("{op} failed: {err}"),
        },
    }
}

fn to_post_item(post: Post) -> PostItem {
    PostItem {
        id: post.id,
        title: post.title,
        content: post.content,
        likes: post.likes,
    }
}

fn to_comment_item(comment: Comment) -> CommentItem {
    CommentItem {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        likes: comment.likes,
    }
}

fn to_feed_card_item(card: FeedCard) -> FeedCardItem {
    FeedCardItem {
        post_id: card.post_id,
        title: card.title,
        preview: card.preview,
        likes: card.likes,
        comment_count: u32::try_from(card.comment_count).unwrap_or(u32::MAX),
        comments: card
            .top_comments
            .into_iter()
            .map(|comment| CommentPreviewItem {
                comment_id: comment.comment_id,
                preview: comment.preview,
                likes: comment.likes,
            })
            .collect(),
        has_more_comments: card.has_more_comments,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        comment_create, comment_delete, comment_get, comment_like, comment_update,
        comments_list, core_version, feed_load, init_logging, ping, post_create, post_delete,
        post_get, post_like, post_update, posts_list, storage_reset,
    };
    use blogfeed_core::db::open_db;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    // All tests share one database file; collections are read-modify-write.
    static DB_LOCK: Mutex<()> = Mutex::new(());
    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Serializes database tests and pins the FFI database to a temp dir.
    fn lock_db() -> MutexGuard<'static, ()> {
        let guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        let _ = super::DB_PATH.set(dir.path().join("blogfeed-test.sqlite3"));
        assert!(
            super::resolve_db_path().starts_with(dir.path()),
            "tests must never touch the default feed database"
        );
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn post_lifecycle_roundtrips_through_storage() {
        let _guard = lock_db();
        let title = unique_token("post-title");

        let created = post_create(title.clone(), "body".to_string());
        assert!(created.ok, "{}", created.message);
        let post = created.post.expect("created post");
        assert_eq!(post.likes, 0);

        let updated = post_update(post.id.clone(), None, Some("new body".to_string()));
        let updated_post = updated.post.expect("updated post");
        assert_eq!(updated_post.title, title);
        assert_eq!(updated_post.content, "new body");

        let liked = post_like(post.id.clone()).post.expect("liked post");
        assert_eq!(liked.likes, 1);

        let deleted = post_delete(post.id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let missing = post_get(post.id);
        assert!(missing.ok);
        assert!(missing.post.is_none());
    }

    #[test]
    fn post_update_missing_id_fails() {
        let _guard = lock_db();
        let response = post_update(unique_token("ghost"), Some("t".to_string()), None);
        assert!(!response.ok);
        assert!(response.message.contains("post not found"));
    }

    #[test]
    fn comment_flow_and_feed_cards() {
        let _guard = lock_db();
        let post = post_create(unique_token("feed"), "x".repeat(120))
            .post
            .expect("created post");

        let mut comment_ids = Vec::new();
        for n in 0..3 {
            let response = comment_create(post.id.clone(), format!("comment {n}"));
            let comment = response.comment.expect("created comment");
            assert_eq!(comment.post_id, post.id);
            comment_ids.push(comment.id);
        }

        let liked = comment_like(post.id.clone(), comment_ids[1].clone())
            .comment
            .expect("liked comment");
        assert_eq!(liked.likes, 1);

        let edited = comment_update(post.id.clone(), comment_ids[0].clone(), "edited".to_string());
        assert_eq!(edited.comment.expect("edited comment").content, "edited");
        assert_eq!(
            comment_get(post.id.clone(), comment_ids[0].clone())
                .comment
                .map(|comment| comment.content),
            Some("edited".to_string())
        );

        let feed = feed_load();
        assert!(feed.ok, "{}", feed.message);
        let card = feed
            .cards
            .iter()
            .find(|card| card.post_id == post.id)
            .expect("card for created post");
        assert_eq!(card.comment_count, 3);
        assert_eq!(card.comments.len(), 2);
        assert!(card.has_more_comments);
        assert!(card.preview.ends_with("..."));

        comment_delete(post.id.clone(), comment_ids[2].clone());
        assert_eq!(comments_list(post.id.clone()).items.len(), 2);

        post_delete(post.id.clone());
        // Comments outlive their post.
        assert_eq!(comments_list(post.id).items.len(), 2);
    }

    #[test]
    fn posts_list_sorts_and_rejects_unknown_field() {
        let _guard = lock_db();
        post_create(unique_token("sort"), String::new());

        let sorted = posts_list(Some("title".to_string()), false);
        assert!(sorted.ok, "{}", sorted.message);
        let titles: Vec<&str> = sorted.items.iter().map(|item| item.title.as_str()).collect();
        let mut expected = titles.clone();
        expected.sort();
        assert_eq!(titles, expected);

        let rejected = posts_list(Some("likes".to_string()), false);
        assert!(!rejected.ok);
    }

    #[test]
    fn test_database_lives_in_temp_dir() {
        let _guard = lock_db();
        let default_path = std::env::temp_dir().join(super::DB_FILE_NAME);
        assert_ne!(super::resolve_db_path(), default_path);
    }

    #[test]
    fn storage_reset_clears_stored_rows() {
        let _guard = lock_db();
        post_create(unique_token("reset"), "body".to_string());

        let reset = storage_reset();
        assert!(reset.ok, "{}", reset.message);

        let conn = open_db(super::resolve_db_path()).expect("open db");
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))
            .expect("count rows");
        assert_eq!(rows, 0);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
