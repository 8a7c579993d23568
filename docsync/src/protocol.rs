use serde::{Deserialize, Serialize};

/// The value held by a document: a schemaless JSON object.
pub type DocumentData = serde_json::Map<String, serde_json::Value>;

/// Messages sent from a client to a document actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request the current snapshot. The actor replies with
    /// [`ServerMessage::Init`] on the requesting session only.
    #[serde(rename = "GET")]
    Get,
    /// Replace the document's data wholesale. There is no partial merge and
    /// no acknowledgment; the new value is observed via the UPDATE broadcast.
    #[serde(rename = "UPDATE")]
    Update { payload: DocumentData },
}

/// Messages sent from a document actor to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Snapshot in response to a GET.
    #[serde(rename = "INIT")]
    Init { data: DocumentData },
    /// Broadcast of a newly applied value.
    #[serde(rename = "UPDATE")]
    Update { data: DocumentData },
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("message has no type field")]
    MissingType,
    #[error("unknown message type: {0}")]
    UnknownType(String),
    #[error("UPDATE message has no object payload")]
    MissingPayload,
}

impl ClientMessage {
    /// Decode an inbound frame, distinguishing unparseable JSON from a
    /// well-formed message of an unrecognized type. Neither is fatal to the
    /// session; callers log and carry on.
    pub fn decode(raw: &str) -> Result<Self, MessageError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let msg_type = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(MessageError::MissingType)?;
        match msg_type {
            "GET" => Ok(ClientMessage::Get),
            "UPDATE" => {
                let payload = value
                    .get("payload")
                    .and_then(serde_json::Value::as_object)
                    .cloned()
                    .ok_or(MessageError::MissingPayload)?;
                Ok(ClientMessage::Update { payload })
            }
            other => Err(MessageError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_get() {
        let msg = ClientMessage::decode(r#"{"type":"GET"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Get);
    }

    #[test]
    fn decode_update() {
        let msg = ClientMessage::decode(r#"{"type":"UPDATE","payload":{"x":1}}"#).unwrap();
        let ClientMessage::Update { payload } = msg else {
            panic!("expected an update");
        };
        assert_eq!(serde_json::Value::Object(payload), json!({"x": 1}));
    }

    #[test]
    fn decode_unknown_type() {
        let err = ClientMessage::decode(r#"{"type":"NOPE"}"#).unwrap_err();
        assert!(matches!(err, MessageError::UnknownType(t) if t == "NOPE"));
    }

    #[test]
    fn decode_update_without_payload() {
        let err = ClientMessage::decode(r#"{"type":"UPDATE"}"#).unwrap_err();
        assert!(matches!(err, MessageError::MissingPayload));
    }

    #[test]
    fn decode_garbage() {
        let err = ClientMessage::decode("not json at all").unwrap_err();
        assert!(matches!(err, MessageError::Malformed(_)));
    }

    #[test]
    fn server_messages_use_the_wire_shape() {
        let data = json!({"x": 1}).as_object().unwrap().clone();
        let init = serde_json::to_value(ServerMessage::Init { data: data.clone() }).unwrap();
        assert_eq!(init, json!({"type": "INIT", "data": {"x": 1}}));
        let update = serde_json::to_value(ServerMessage::Update { data }).unwrap();
        assert_eq!(update, json!({"type": "UPDATE", "data": {"x": 1}}));
    }

    #[test]
    fn client_update_encodes_payload_field() {
        let payload = json!({"x": 1}).as_object().unwrap().clone();
        let encoded = serde_json::to_value(ClientMessage::Update { payload }).unwrap();
        assert_eq!(encoded, json!({"type": "UPDATE", "payload": {"x": 1}}));
    }
}
