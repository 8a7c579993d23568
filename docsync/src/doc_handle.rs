use futures::channel::{mpsc, oneshot};

use crate::{
    DocumentId,
    actor::DocEvent,
    protocol::DocumentData,
    storage::StorageError,
};

/// A cheap cloneable handle onto one document's actor.
///
/// Handles are handed out by the registry in [`DocServer`](crate::DocServer);
/// all they do is queue events onto the actor's channel.
#[derive(Clone)]
pub(crate) struct DocHandle {
    document_id: DocumentId,
    tx: mpsc::UnboundedSender<DocEvent>,
}

impl std::fmt::Debug for DocHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocHandle")
            .field("document_id", &self.document_id)
            .finish()
    }
}

impl DocHandle {
    pub(crate) fn new(document_id: DocumentId, tx: mpsc::UnboundedSender<DocEvent>) -> Self {
        Self { document_id, tx }
    }

    pub(crate) fn send(&self, event: DocEvent) {
        if self.tx.unbounded_send(event).is_err() {
            tracing::warn!(document_id = %self.document_id, "document actor is gone, dropping event");
        }
    }

    /// One-shot read through the actor, so it serializes with in-flight
    /// mutations. Registers no session.
    pub(crate) async fn snapshot(&self) -> Result<DocumentData, StorageError> {
        let (reply, rx) = oneshot::channel();
        self.send(DocEvent::Read { reply });
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Other(
                "document actor stopped before replying".to_string(),
            )),
        }
    }
}
