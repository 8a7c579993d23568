use futures::{Future, Sink, SinkExt, Stream, StreamExt};

use crate::{ConnFinishedReason, DocServer, DocumentId, storage::Storage};

/// A transport-neutral copy of the websocket message type.
///
/// axum exposes its own `Message` type rather than tungstenite's, so the
/// session-binding logic is written once against this enum and each transport
/// maps into it.
pub enum WsMessage {
    Binary(Vec<u8>),
    Text(String),
    Close,
    Ping(Vec<u8>),
    Pong(Vec<u8>),
}

#[cfg(feature = "axum")]
impl From<WsMessage> for axum::extract::ws::Message {
    fn from(msg: WsMessage) -> Self {
        match msg {
            WsMessage::Binary(data) => axum::extract::ws::Message::Binary(data.into()),
            WsMessage::Text(data) => axum::extract::ws::Message::Text(data.into()),
            WsMessage::Close => axum::extract::ws::Message::Close(None),
            WsMessage::Ping(data) => axum::extract::ws::Message::Ping(data.into()),
            WsMessage::Pong(data) => axum::extract::ws::Message::Pong(data.into()),
        }
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::ws::Message> for WsMessage {
    fn from(msg: axum::extract::ws::Message) -> Self {
        match msg {
            axum::extract::ws::Message::Binary(data) => WsMessage::Binary(data.into()),
            axum::extract::ws::Message::Text(data) => WsMessage::Text(data.as_str().to_string()),
            axum::extract::ws::Message::Close(_) => WsMessage::Close,
            axum::extract::ws::Message::Ping(data) => WsMessage::Ping(data.into()),
            axum::extract::ws::Message::Pong(data) => WsMessage::Pong(data.into()),
        }
    }
}

impl<S: Storage> DocServer<S> {
    /// Accept a websocket in an axum handler as a session on `doc_id`
    #[cfg(feature = "axum")]
    pub fn accept_axum<WsStr>(
        &self,
        doc_id: DocumentId,
        stream: WsStr,
    ) -> impl Future<Output = ConnFinishedReason> + 'static
    where
        WsStr: Sink<axum::extract::ws::Message, Error = axum::Error>
            + Stream<Item = Result<axum::extract::ws::Message, axum::Error>>
            + Send
            + 'static,
    {
        use futures::TryStreamExt;

        let stream = stream
            .map_err(|e| NetworkError(format!("error receiving websocket message: {}", e)))
            .sink_map_err(|e| NetworkError(format!("error sending websocket message: {}", e)));
        self.connect_websocket(doc_id, stream)
    }

    /// Bind a session over any stream of [`WsMessage`]s
    ///
    /// Text frames carry the JSON protocol; binary frames are accepted if
    /// they hold UTF-8; ping, pong, and close frames are handled here and
    /// never reach the protocol layer.
    pub fn connect_websocket<WsStr, M>(
        &self,
        doc_id: DocumentId,
        stream: WsStr,
    ) -> impl Future<Output = ConnFinishedReason> + 'static
    where
        M: Into<WsMessage> + From<WsMessage> + Send + 'static,
        WsStr: Sink<M, Error = NetworkError>
            + Stream<Item = Result<M, NetworkError>>
            + Send
            + 'static,
    {
        let (sink, stream) = stream.split();

        let msg_stream = stream
            .filter_map::<_, Result<String, NetworkError>, _>({
                move |msg| async move {
                    let msg = match msg {
                        Ok(m) => m,
                        Err(e) => {
                            return Some(Err(NetworkError(format!(
                                "websocket receive error: {e}"
                            ))));
                        }
                    };
                    match msg.into() {
                        WsMessage::Text(raw) => Some(Ok(raw)),
                        WsMessage::Binary(data) => match String::from_utf8(data) {
                            Ok(raw) => Some(Ok(raw)),
                            Err(_) => Some(Err(NetworkError(
                                "non-utf8 binary message on websocket".to_string(),
                            ))),
                        },
                        WsMessage::Close => {
                            tracing::debug!("websocket closing");
                            None
                        }
                        WsMessage::Ping(_) | WsMessage::Pong(_) => None,
                    }
                }
            })
            .boxed();

        let msg_sink = Box::pin(sink.with(|raw: String| {
            futures::future::ready(Ok::<_, NetworkError>(WsMessage::Text(raw).into()))
        }));

        self.connect(doc_id, msg_stream, msg_sink)
    }
}

/// The error type transport adapters map their failures into before handing
/// a stream to [`DocServer::connect_websocket`]
pub struct NetworkError(String);

impl NetworkError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        NetworkError(msg.into())
    }
}

impl std::fmt::Debug for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for NetworkError {}
