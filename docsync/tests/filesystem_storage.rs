use docsync::{DocumentId, storage::{FilesystemStorage, Storage}};

#[tokio::test]
async fn absent_keys_load_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemStorage::new(dir.path());
    let doc = DocumentId::new("things", "missing");
    assert_eq!(storage.load(&doc).await.unwrap(), None);
}

#[tokio::test]
async fn values_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let doc = DocumentId::new("things", "durable");

    {
        let storage = FilesystemStorage::new(dir.path());
        storage.put(&doc, b"{\"x\":1}".to_vec()).await.unwrap();
    }

    let storage = FilesystemStorage::new(dir.path());
    assert_eq!(
        storage.load(&doc).await.unwrap(),
        Some(b"{\"x\":1}".to_vec())
    );
}

#[tokio::test]
async fn awkward_key_strings_stay_inside_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemStorage::new(dir.path());
    let doc = DocumentId::new("../collection", "id/with/../slashes");

    storage.put(&doc, b"value".to_vec()).await.unwrap();
    assert_eq!(storage.load(&doc).await.unwrap(), Some(b"value".to_vec()));

    // Everything written landed under the storage root.
    let mut entries = std::fs::read_dir(dir.path()).unwrap();
    assert!(entries.next().is_some());
}

#[tokio::test]
async fn overwrites_replace_the_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FilesystemStorage::new(dir.path());
    let doc = DocumentId::new("things", "rewritten");

    storage.put(&doc, b"first".to_vec()).await.unwrap();
    storage.put(&doc, b"second".to_vec()).await.unwrap();
    assert_eq!(storage.load(&doc).await.unwrap(), Some(b"second".to_vec()));
}
