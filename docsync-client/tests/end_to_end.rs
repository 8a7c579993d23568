use std::time::Duration;

use docsync::{DocServer, protocol::DocumentData};
use docsync_client::{Client, Snapshot, Subscription};
use futures::StreamExt;
use serde_json::json;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn start_server() -> String {
    let server = DocServer::builder().build();
    let app = docsync::http::router(server);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn data(value: serde_json::Value) -> DocumentData {
    value.as_object().unwrap().clone()
}

async fn next(sub: &mut Subscription) -> Snapshot {
    tokio::time::timeout(Duration::from_secs(5), sub.next())
        .await
        .expect("timed out waiting for a snapshot")
        .expect("subscription ended")
}

#[tokio::test]
async fn get_returns_empty_for_unwritten_documents() {
    init_logging();
    let endpoint = start_server().await;
    let client = Client::new(endpoint);

    let snapshot = client.collection("things").doc("nothing").get().await.unwrap();
    assert!(snapshot.data().is_empty());
}

#[tokio::test]
async fn subscribe_publish_and_read_back() {
    init_logging();
    let endpoint = start_server().await;
    let client = Client::new(endpoint.clone());
    let doc = client.collection("things").doc("foo");

    let mut sub = doc.subscribe().await.unwrap();
    assert_eq!(next(&mut sub).await.data(), &data(json!({})));

    // Publish from a second, unrelated client.
    let other = Client::new(endpoint);
    other
        .collection("things")
        .doc("foo")
        .publish(data(json!({"x": 1})))
        .await
        .unwrap();

    assert_eq!(next(&mut sub).await.data(), &data(json!({"x": 1})));
    assert_eq!(doc.get().await.unwrap().data(), &data(json!({"x": 1})));
}

#[tokio::test]
async fn subscriptions_only_see_their_own_document() {
    init_logging();
    let endpoint = start_server().await;
    let client = Client::new(endpoint);

    let doc_a = client.collection("things").doc("a");
    let doc_b = client.collection("things").doc("b");

    let mut sub_a = doc_a.subscribe().await.unwrap();
    let mut sub_b = doc_b.subscribe().await.unwrap();
    assert_eq!(next(&mut sub_a).await.data(), &data(json!({})));
    assert_eq!(next(&mut sub_b).await.data(), &data(json!({})));

    doc_a.publish(data(json!({"x": 1}))).await.unwrap();
    assert_eq!(next(&mut sub_a).await.data(), &data(json!({"x": 1})));

    let quiet = tokio::time::timeout(Duration::from_millis(200), sub_b.next()).await;
    assert!(quiet.is_err(), "expected nothing on doc b, got {quiet:?}");
}
