/// How a session's connection future ended.
///
/// Produced by [`DocServer::connect`](crate::DocServer::connect) and the
/// websocket bindings once the session has been unregistered from its
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnFinishedReason {
    /// The document actor went away, which only happens when the server
    /// itself was dropped
    Shutdown,
    /// The remote end closed the channel
    TheyDisconnected,
    /// The transport failed while receiving a frame
    ErrorReceiving(String),
    /// The transport failed while sending a frame
    ErrorSending(String),
}

impl std::fmt::Display for ConnFinishedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnFinishedReason::Shutdown => write!(f, "server shut down"),
            ConnFinishedReason::TheyDisconnected => write!(f, "remote end disconnected"),
            ConnFinishedReason::ErrorReceiving(msg) => {
                write!(f, "transport receive error: {msg}")
            }
            ConnFinishedReason::ErrorSending(msg) => write!(f, "transport send error: {msg}"),
        }
    }
}
