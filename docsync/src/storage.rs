use crate::DocumentId;

mod filesystem;
mod in_memory;
pub use filesystem::FilesystemStorage;
pub use in_memory::InMemoryStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// The durable key-value port a [`DocServer`](crate::DocServer) persists
/// through. One opaque key per document, value is the JSON-serialized data.
///
/// Implementations are cloned into each document actor; for a given document
/// only that document's actor ever touches its key, so implementations need
/// no per-key coordination of their own.
pub trait Storage: Send + Sync + Clone + 'static {
    fn load(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;
    fn put(
        &self,
        id: &DocumentId,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
