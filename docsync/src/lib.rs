use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::channel::mpsc;
use tracing::Instrument;

mod actor;
mod builder;
pub use builder::ServerBuilder;
mod conn_finished_reason;
pub use conn_finished_reason::ConnFinishedReason;
mod connection;
mod connection_id;
pub use connection_id::ConnectionId;
mod doc_handle;
use doc_handle::DocHandle;
mod document_id;
pub use document_id::DocumentId;
#[cfg(feature = "axum")]
pub mod http;
pub mod protocol;
pub mod storage;
mod websocket;
pub use websocket::{NetworkError, WsMessage};

use crate::protocol::DocumentData;
use crate::storage::{InMemoryStorage, Storage, StorageError};

/// Holds the authoritative copy of every document touched through it.
///
/// Each document is owned by exactly one actor task which applies queries,
/// updates, and session joins and leaves strictly one at a time, so all
/// sessions observe the same per-document order of snapshots. Actors for
/// different documents run independently.
///
/// A `DocServer` is cheap to clone; clones share the same actors.
pub struct DocServer<S: Storage> {
    storage: S,
    actors: Arc<Mutex<HashMap<DocumentId, DocHandle>>>,
}

impl<S: Storage> Clone for DocServer<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            actors: self.actors.clone(),
        }
    }
}

impl DocServer<InMemoryStorage> {
    /// Create a new [`DocServer`], storing documents in memory unless
    /// [`ServerBuilder::with_storage`] says otherwise
    pub fn builder() -> ServerBuilder<InMemoryStorage> {
        ServerBuilder::new()
    }
}

impl<S: Storage> DocServer<S> {
    pub(crate) fn new(storage: S) -> Self {
        Self {
            storage,
            actors: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve `doc_id` to its live actor, spawning one if none exists.
    ///
    /// Creation happens under the registry lock, so there is never more than
    /// one actor for a given id. Actors live until the server is dropped.
    pub(crate) fn actor(&self, doc_id: &DocumentId) -> DocHandle {
        let mut actors = self.actors.lock().unwrap();
        if let Some(handle) = actors.get(doc_id) {
            return handle.clone();
        }
        let (tx, rx) = mpsc::unbounded();
        let handle = DocHandle::new(doc_id.clone(), tx);
        actors.insert(doc_id.clone(), handle.clone());
        tokio::spawn(
            actor::run(doc_id.clone(), self.storage.clone(), rx)
                .instrument(tracing::info_span!("doc_actor", document_id = %doc_id)),
        );
        handle
    }

    /// Read the current value of `doc_id` without opening a session.
    ///
    /// The read goes through the owning actor, so it serializes with any
    /// in-flight updates. A document that was never written reads as `{}`.
    pub async fn snapshot(&self, doc_id: &DocumentId) -> Result<DocumentData, StorageError> {
        self.actor(doc_id).snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    fn assert_send<S: Send>(_s: PhantomData<S>) {}

    #[test]
    fn make_sure_it_is_send() {
        assert_send::<super::storage::InMemoryStorage>(PhantomData);
        assert_send::<super::DocServer<super::storage::InMemoryStorage>>(PhantomData);
    }
}
