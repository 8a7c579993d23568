//! Reference client for a [`docsync`] server.
//!
//! Mirrors the server's three operations: a one-shot HTTP read
//! ([`DocRef::get`]), a live subscription over a websocket
//! ([`DocRef::subscribe`]), and a fire-and-forget write
//! ([`DocRef::publish`]).

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use docsync::protocol::{ClientMessage, DocumentData, ServerMessage};
use futures::{SinkExt, Stream, StreamExt, channel::mpsc};
use tokio_tungstenite::{connect_async, tungstenite};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    ErrorStatus(reqwest::StatusCode),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Entry point: a client bound to one server endpoint, e.g.
/// `http://localhost:8080`.
#[derive(Clone)]
pub struct Client {
    endpoint: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new<E: Into<String>>(endpoint: E) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn collection<N: Into<String>>(&self, name: N) -> CollectionRef {
        CollectionRef {
            client: self.clone(),
            name: name.into(),
        }
    }
}

pub struct CollectionRef {
    client: Client,
    name: String,
}

impl CollectionRef {
    pub fn doc<I: Into<String>>(&self, id: I) -> DocRef {
        DocRef {
            client: self.client.clone(),
            collection: self.name.clone(),
            id: id.into(),
        }
    }
}

/// A reference to one `(collection, id)` document on the server.
pub struct DocRef {
    client: Client,
    collection: String,
    id: String,
}

impl DocRef {
    fn http_url(&self) -> String {
        format!(
            "{}/docs/{}/{}",
            self.client.endpoint, self.collection, self.id
        )
    }

    fn ws_url(&self) -> String {
        // http -> ws, https -> wss
        self.http_url().replacen("http", "ws", 1)
    }

    /// Fetch the current snapshot without opening a live channel. A document
    /// that was never written reads as `{}`.
    pub async fn get(&self) -> Result<Snapshot, RequestError> {
        let response = self.client.http.get(self.http_url()).send().await?;
        if !response.status().is_success() {
            return Err(RequestError::ErrorStatus(response.status()));
        }
        let data = response.json::<DocumentData>().await?;
        Ok(Snapshot { data })
    }

    /// Open a live channel and ask for the current snapshot.
    ///
    /// The returned [`Subscription`] yields the initial snapshot followed by
    /// every subsequent update, in the order the server applied them. It ends
    /// when the connection drops.
    pub async fn subscribe(&self) -> Result<Subscription, RequestError> {
        let (ws, _) = connect_async(self.ws_url()).await?;
        let (mut sink, mut stream) = ws.split();
        let get = serde_json::to_string(&ClientMessage::Get)?;
        sink.send(tungstenite::Message::text(get)).await?;

        let (tx, rx) = mpsc::unbounded();
        tokio::spawn(async move {
            // The sink half has to stay alive for as long as we are reading.
            let _sink = sink;
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(tungstenite::Message::Text(raw)) => {
                        match serde_json::from_str::<ServerMessage>(raw.as_str()) {
                            Ok(
                                ServerMessage::Init { data } | ServerMessage::Update { data },
                            ) => {
                                if tx.unbounded_send(Snapshot { data }).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(err = %e, "ignoring unrecognized message");
                            }
                        }
                    }
                    Ok(tungstenite::Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(err = %e, "subscription transport error");
                        break;
                    }
                }
            }
        });
        Ok(Subscription { rx })
    }

    /// Replace the document's data wholesale.
    ///
    /// This opens its own channel, sends one UPDATE, and closes it. An error
    /// here means the message never left this process; there is no
    /// acknowledgment that the server applied it. Subscribers (including one
    /// held by this process) observe the applied value.
    pub async fn publish(&self, data: DocumentData) -> Result<(), RequestError> {
        let (ws, _) = connect_async(self.ws_url()).await?;
        let (mut sink, _stream) = ws.split();
        let update = serde_json::to_string(&ClientMessage::Update { payload: data })?;
        sink.send(tungstenite::Message::text(update)).await?;
        let _ = sink.close().await;
        Ok(())
    }
}

/// One observed value of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    data: DocumentData,
}

impl Snapshot {
    pub fn data(&self) -> &DocumentData {
        &self.data
    }

    pub fn into_data(self) -> DocumentData {
        self.data
    }
}

/// A live feed of [`Snapshot`]s for one document
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Snapshot>,
}

impl Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_next_unpin(cx)
    }
}
