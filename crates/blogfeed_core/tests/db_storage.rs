use blogfeed_core::db::{open_db, open_db_in_memory, schema_version, KV_SCHEMA_VERSION};
use blogfeed_core::{
    FeedService, NewComment, NewPost, Post, RecordStore, SequentialIdGenerator, SqliteStorage,
    StorageBackend, StoreError, StoredCommentRepository, StoredPostRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_current_kv_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), KV_SCHEMA_VERSION);
    SqliteStorage::try_new(&conn).unwrap();
}

#[test]
fn reopening_current_database_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.db");

    let conn = open_db(&path).unwrap();
    SqliteStorage::try_new(&conn)
        .unwrap()
        .set_item("k", "v")
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), KV_SCHEMA_VERSION);
    let storage = SqliteStorage::try_new(&conn).unwrap();
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn storage_requires_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteStorage::try_new(&conn).err().unwrap();
    assert!(matches!(err, StoreError::MissingTable("kv_entries")));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        StoreError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, KV_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sqlite_backend_supports_basic_key_value_operations() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::try_new(&conn).unwrap();

    assert!(storage.get_item("k").unwrap().is_none());
    storage.set_item("k", "one").unwrap();
    storage.set_item("k", "two").unwrap();
    storage.set_item("a", "x").unwrap();
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("two"));
    assert_eq!(storage.keys().unwrap(), vec!["a", "k"]);

    storage.remove_item("a").unwrap();
    assert_eq!(storage.keys().unwrap(), vec!["k"]);
    storage.clear().unwrap();
    assert!(storage.keys().unwrap().is_empty());
}

#[test]
fn record_store_roundtrips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordStore::new(SqliteStorage::try_new(&conn).unwrap());
    let posts = vec![
        Post {
            id: "b".to_string(),
            title: "second".to_string(),
            content: "multi\nline".to_string(),
            likes: 3,
        },
        Post {
            id: "a".to_string(),
            title: "first".to_string(),
            content: String::new(),
            likes: 0,
        },
    ];

    store.write("blogPosts", &posts).unwrap();
    assert_eq!(store.read::<Post>("blogPosts").unwrap(), posts);
}

#[test]
fn feed_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blogfeed.db");
    let post_ids = SequentialIdGenerator::new("post");
    let comment_ids = SequentialIdGenerator::new("comment");

    let post_id = {
        let conn = open_db(&path).unwrap();
        let store = RecordStore::new(SqliteStorage::try_new(&conn).unwrap());
        let service = FeedService::new(
            StoredPostRepository::new(&store, &post_ids),
            StoredCommentRepository::new(&store, &comment_ids),
        );
        let post = service.create_post(NewPost::new("T", "C")).unwrap();
        service
            .add_comment(&post.id, NewComment::new("kept"))
            .unwrap();
        post.id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), KV_SCHEMA_VERSION);
    let store = RecordStore::new(SqliteStorage::try_new(&conn).unwrap());
    let service = FeedService::new(
        StoredPostRepository::new(&store, &post_ids),
        StoredCommentRepository::new(&store, &comment_ids),
    );
    let feed = service.load_feed().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].post.id, post_id);
    assert_eq!(feed[0].comments[0].content, "kept");

    store.reset().unwrap();
    assert!(service.load_feed().unwrap().is_empty());
    assert!(service.list_comments(&post_id).unwrap().is_empty());
}
