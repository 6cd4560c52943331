//! End-to-end session tests: a local WebSocket feed into a mock sink.

use std::time::Duration;

use futures::SinkExt;
use pubsub_relay::services::{EventForwarder, SessionEnd, StreamConnection};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn session_forwards_frames_and_reports_clean_close() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&sink)
        .await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let feed = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(socket).await.unwrap();

        // Keepalive noise, a text event, a binary event, then a clean close.
        ws.send(Message::Text("ping".into())).await.unwrap();
        ws.send(Message::Text(
            r#"{"event":"booking_created","booking_id":64855,"customer_id":7}"#.into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Binary(
            br#"{"event":"booking_updated","booking_id":"B-2"}"#.to_vec().into(),
        ))
        .await
        .unwrap();
        ws.close(None).await.unwrap();
    });

    let forwarder = EventForwarder::new(format!("{}/hook", sink.uri()), Duration::from_secs(2));
    let connection = StreamConnection::new(format!("ws://{addr}"), forwarder);

    let end = connection.run().await;
    assert_eq!(end, SessionEnd::Closed);

    feed.await.unwrap();
    assert_eq!(sink.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn connect_failure_reports_failed_session() {
    let forwarder =
        EventForwarder::new("http://127.0.0.1:9/hook".to_string(), Duration::from_secs(1));
    let connection = StreamConnection::new("ws://127.0.0.1:9".to_string(), forwarder);

    assert_eq!(connection.run().await, SessionEnd::Failed);
}
