use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Request, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{DocServer, DocumentId, storage::Storage};

/// An axum [`Router`] serving the document endpoint.
///
/// `GET /docs/{collection}/{id}` either upgrades to a websocket session on
/// that document, or, for a plain request, returns the current snapshot as a
/// JSON object (`{}` for a document that was never written).
pub fn router<S: Storage>(server: DocServer<S>) -> Router {
    Router::new()
        .route("/docs/{collection}/{id}", get(serve_doc::<S>))
        .with_state(server)
}

async fn serve_doc<S: Storage>(
    State(server): State<DocServer<S>>,
    Path((collection, id)): Path<(String, String)>,
    request: Request,
) -> Response {
    let doc_id = DocumentId::new(collection, id);
    let (mut parts, _body) = request.into_parts();
    // Upgrade requests become live sessions, anything else is a one-shot read.
    match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
        Ok(ws) => ws
            .on_upgrade(move |socket| {
                async move {
                    let reason = server.accept_axum(doc_id.clone(), socket).await;
                    tracing::debug!(document_id = %doc_id, %reason, "websocket session finished");
                }
            })
            .into_response(),
        Err(_) => match server.snapshot(&doc_id).await {
            Ok(data) => Json(serde_json::Value::Object(data)).into_response(),
            Err(e) => {
                tracing::error!(document_id = %doc_id, err = %e, "snapshot read failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}
