use std::path::PathBuf;

use crate::DocumentId;
use crate::storage::{Storage, StorageError};

/// Stores each document as one file under `root`.
///
/// Collection and id are hex-encoded into the path so arbitrary key strings
/// (slashes, dots, anything) cannot escape the root directory.
#[derive(Clone)]
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn doc_path(&self, id: &DocumentId) -> PathBuf {
        self.root
            .join(hex::encode(id.collection()))
            .join(hex::encode(id.id()))
    }
}

impl Storage for FilesystemStorage {
    fn load(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        let path = self.doc_path(id);
        async move {
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
    }

    fn put(
        &self,
        id: &DocumentId,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        let path = self.doc_path(id);
        async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            // Write to a sibling then rename so a crash mid-write never
            // leaves a truncated document behind.
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, &data).await?;
            tokio::fs::rename(&tmp, &path).await?;
            Ok(())
        }
    }
}
