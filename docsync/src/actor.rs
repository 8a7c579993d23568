use std::collections::HashMap;

use futures::{
    StreamExt,
    channel::{mpsc, oneshot},
};

use crate::{
    ConnectionId, DocumentId,
    protocol::{DocumentData, ServerMessage},
    storage::{Storage, StorageError},
};

pub(crate) type SessionSender = mpsc::UnboundedSender<ServerMessage>;

/// Everything a document actor can be asked to do. Events are queued on the
/// actor's channel and handled strictly one at a time, which is the whole
/// consistency mechanism: no locks, no versions, just a single consumer.
pub(crate) enum DocEvent {
    /// A new session joined. No snapshot is pushed until the session sends a
    /// GET of its own.
    Attach {
        conn_id: ConnectionId,
        tx: SessionSender,
    },
    /// A session's transport closed.
    Detach { conn_id: ConnectionId },
    /// A session asked for the current snapshot.
    Query { conn_id: ConnectionId },
    /// Replace the document's data, persist it, and broadcast the new value
    /// to every live session (the issuer included).
    Mutate { payload: DocumentData },
    /// One-shot read with no session involved (the HTTP snapshot path).
    Read {
        reply: oneshot::Sender<Result<DocumentData, StorageError>>,
    },
}

pub(crate) async fn run<S: Storage>(
    doc_id: DocumentId,
    storage: S,
    mut events: mpsc::UnboundedReceiver<DocEvent>,
) {
    let mut actor = DocActor {
        doc_id,
        storage,
        cache: None,
        sessions: HashMap::new(),
    };
    while let Some(event) = events.next().await {
        actor.handle_event(event).await;
    }
    tracing::debug!(document_id = %actor.doc_id, "document actor stopping");
}

struct DocActor<S> {
    doc_id: DocumentId,
    storage: S,
    cache: Option<DocumentData>,
    sessions: HashMap<ConnectionId, SessionSender>,
}

impl<S: Storage> DocActor<S> {
    async fn handle_event(&mut self, event: DocEvent) {
        match event {
            DocEvent::Attach { conn_id, tx } => {
                tracing::debug!(document_id = %self.doc_id, connection_id = %conn_id, "session attached");
                self.sessions.insert(conn_id, tx);
            }
            DocEvent::Detach { conn_id } => {
                // Idempotent: a second detach for the same session is a no-op.
                if self.sessions.remove(&conn_id).is_some() {
                    tracing::debug!(document_id = %self.doc_id, connection_id = %conn_id, "session detached");
                }
            }
            DocEvent::Query { conn_id } => match self.current().await {
                Ok(data) => {
                    let Some(tx) = self.sessions.get(&conn_id) else {
                        tracing::debug!(connection_id = %conn_id, "query from a session that already left");
                        return;
                    };
                    if tx.unbounded_send(ServerMessage::Init { data }).is_err() {
                        tracing::warn!(
                            document_id = %self.doc_id,
                            connection_id = %conn_id,
                            "failed to deliver snapshot"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(document_id = %self.doc_id, err = %e, "failed to read document");
                }
            },
            DocEvent::Mutate { payload } => self.handle_mutation(payload).await,
            DocEvent::Read { reply } => {
                let _ = reply.send(self.current().await);
            }
        }
    }

    /// Persist first, then cache, then broadcast. A failed write leaves the
    /// cached value and every session untouched; the actor keeps serving.
    async fn handle_mutation(&mut self, payload: DocumentData) {
        let bytes = match serde_json::to_vec(&payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(document_id = %self.doc_id, err = %e, "unserializable payload, ignoring update");
                return;
            }
        };
        if let Err(e) = self.storage.put(&self.doc_id, bytes).await {
            tracing::error!(
                document_id = %self.doc_id,
                err = %e,
                "failed to persist update, not broadcasting"
            );
            return;
        }
        self.cache = Some(payload.clone());
        self.broadcast(ServerMessage::Update { data: payload });
    }

    /// The current value: the cache if populated, otherwise loaded from
    /// storage, otherwise an empty object. Absent documents read as `{}`.
    async fn current(&mut self) -> Result<DocumentData, StorageError> {
        if let Some(data) = &self.cache {
            return Ok(data.clone());
        }
        let data = match self.storage.load(&self.doc_id).await? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        document_id = %self.doc_id,
                        err = %e,
                        "stored document is not a JSON object, reading as empty"
                    );
                    DocumentData::new()
                }
            },
            None => DocumentData::new(),
        };
        self.cache = Some(data.clone());
        Ok(data)
    }

    fn broadcast(&self, msg: ServerMessage) {
        for (conn_id, tx) in &self.sessions {
            // A failed send is isolated to that session and does not
            // unregister it; only a transport close does.
            if tx.unbounded_send(msg.clone()).is_err() {
                tracing::warn!(
                    document_id = %self.doc_id,
                    connection_id = %conn_id,
                    "failed to deliver update to session"
                );
            }
        }
    }
}
