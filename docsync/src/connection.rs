use futures::{Sink, SinkExt, Stream, StreamExt, channel::mpsc};

use crate::{
    ConnFinishedReason, ConnectionId, DocServer, DocumentId,
    actor::DocEvent,
    protocol::ClientMessage,
    storage::Storage,
};

impl<S: Storage> DocServer<S> {
    /// Bind a live session for `doc_id` over any pair of text-frame stream
    /// and sink.
    ///
    /// The session is registered with the document's actor immediately, but
    /// receives nothing until it sends a `GET`. Inbound frames that fail to
    /// parse, or parse to an unknown type, are logged and ignored; the
    /// session stays open. The returned future must be driven to completion
    /// to keep the session alive; when it resolves the session has been
    /// unregistered.
    #[tracing::instrument(skip(self, stream, sink))]
    pub fn connect<Str, Snk, SendErr, RecvErr>(
        &self,
        doc_id: DocumentId,
        stream: Str,
        mut sink: Snk,
    ) -> impl Future<Output = ConnFinishedReason> + 'static
    where
        SendErr: std::error::Error + Send + Sync + 'static,
        RecvErr: std::error::Error + Send + Sync + 'static,
        Snk: Sink<String, Error = SendErr> + Send + 'static + Unpin,
        Str: Stream<Item = Result<String, RecvErr>> + Send + 'static + Unpin,
    {
        let handle = self.actor(&doc_id);
        let conn_id = ConnectionId::new();
        let (tx_out, mut rx_out) = mpsc::unbounded();
        handle.send(DocEvent::Attach {
            conn_id,
            tx: tx_out,
        });

        async move {
            let mut stream = stream.fuse();
            let reason = loop {
                futures::select! {
                    next_inbound = stream.next() => {
                        match next_inbound {
                            Some(Ok(raw)) => match ClientMessage::decode(&raw) {
                                Ok(ClientMessage::Get) => {
                                    handle.send(DocEvent::Query { conn_id });
                                }
                                Ok(ClientMessage::Update { payload }) => {
                                    handle.send(DocEvent::Mutate { payload });
                                }
                                Err(e) => {
                                    tracing::warn!(connection_id = %conn_id, err = %e, "ignoring inbound message");
                                }
                            },
                            Some(Err(e)) => {
                                tracing::error!(err = ?e, "error receiving, closing connection");
                                break ConnFinishedReason::ErrorReceiving(e.to_string());
                            }
                            None => {
                                tracing::debug!("stream closed, closing connection");
                                break ConnFinishedReason::TheyDisconnected;
                            }
                        }
                    },
                    next_outbound = rx_out.next() => {
                        match next_outbound {
                            Some(msg) => {
                                let encoded = match serde_json::to_string(&msg) {
                                    Ok(encoded) => encoded,
                                    Err(e) => {
                                        tracing::error!(err = %e, "failed to encode outbound message");
                                        continue;
                                    }
                                };
                                if let Err(e) = sink.send(encoded).await {
                                    tracing::error!(err = ?e, "error sending, closing connection");
                                    break ConnFinishedReason::ErrorSending(e.to_string());
                                }
                            }
                            None => {
                                tracing::debug!(connection_id = %conn_id, "actor went away, closing connection");
                                break ConnFinishedReason::Shutdown;
                            }
                        }
                    }
                }
            };
            handle.send(DocEvent::Detach { conn_id });
            if let Err(e) = sink.close().await {
                tracing::error!(err = ?e, "error closing sink");
            }
            reason
        }
    }
}
