// Shared primitives for booting a scoreboard server per integration test.
#![allow(dead_code)]

use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    time::Duration,
};

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Display = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Start a fresh server and return its base URL. Each test gets its own match.
pub fn spawn_server() -> String {
    // One-time slot where the server thread publishes its selected URL.
    let published_url = Arc::new(OnceLock::<String>::new());
    let published_url_thread = Arc::clone(&published_url);
    // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("test runtime");
        runtime.block_on(async move {
            // Bind to an ephemeral port to avoid collisions with local services.
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral test port");
            let addr = listener.local_addr().expect("get local addr");
            let _ = published_url_thread.set(format!("http://{}", addr));
            scoreboard_server::run(listener).await.expect("server failed");
        });
    });

    wait_for_server_url_and_readiness(published_url)
}

// Wait for URL publication and then for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) -> String {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://")
        .to_string();

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return base_url;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect_display(base_url: &str) -> Display {
    let ws_url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (socket, _response) = connect_async(ws_url.as_str())
        .await
        .expect("websocket handshake should succeed");
    socket
}

pub async fn send_button(display: &mut Display, button: &str, pressed: bool) {
    let payload = serde_json::json!({
        "type": "Button",
        "data": { "button": button, "pressed": pressed }
    });
    display
        .send(Message::text(payload.to_string()))
        .await
        .expect("send button event");
}

// Read server messages until one of the given type satisfies `predicate`.
pub async fn next_matching(
    display: &mut Display,
    message_type: &str,
    predicate: impl Fn(&Value) -> bool,
) -> Value {
    let wait = async {
        loop {
            let msg = display
                .next()
                .await
                .expect("socket should stay open")
                .expect("socket read should succeed");
            let Ok(text) = msg.to_text() else {
                continue;
            };
            let Ok(value) = serde_json::from_str::<Value>(text) else {
                continue;
            };
            if value["type"] == message_type && predicate(&value["data"]) {
                return value["data"].clone();
            }
        }
    };

    tokio::time::timeout(Duration::from_secs(10), wait)
        .await
        .expect("expected message before timeout")
}
