use docsync::{DocumentId, storage::{InMemoryStorage, Storage}};

#[tokio::test]
async fn absent_keys_load_as_none() {
    let storage = InMemoryStorage::new();
    let doc = DocumentId::new("things", "missing");
    assert_eq!(storage.load(&doc).await.unwrap(), None);
}

#[tokio::test]
async fn put_then_load_returns_the_latest_value() {
    let storage = InMemoryStorage::new();
    let doc = DocumentId::new("things", "present");

    storage.put(&doc, b"first".to_vec()).await.unwrap();
    assert_eq!(storage.load(&doc).await.unwrap(), Some(b"first".to_vec()));

    storage.put(&doc, b"second".to_vec()).await.unwrap();
    assert_eq!(storage.load(&doc).await.unwrap(), Some(b"second".to_vec()));
}

#[tokio::test]
async fn clones_share_the_same_store() {
    let storage = InMemoryStorage::new();
    let clone = storage.clone();
    let doc = DocumentId::new("things", "shared");

    storage.put(&doc, b"value".to_vec()).await.unwrap();
    assert_eq!(clone.load(&doc).await.unwrap(), Some(b"value".to_vec()));
}
