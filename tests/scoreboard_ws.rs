mod support;

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_display_receives_initial_board() {
    let base_url = support::spawn_server();
    let mut display = support::connect_display(&base_url).await;

    let board = support::next_matching(&mut display, "Scoreboard", |_| true).await;

    assert_eq!(board["phase"], "awaiting_ready");
    assert_eq!(board["left"]["score"], 0);
    assert_eq!(board["right"]["score"], 0);
    assert_eq!(board["winner"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_ready_handshake_then_click_scores_a_point() {
    let base_url = support::spawn_server();
    let mut display = support::connect_display(&base_url).await;

    support::send_button(&mut display, "primary", true).await;
    support::send_button(&mut display, "secondary", true).await;
    let started =
        support::next_matching(&mut display, "Scoreboard", |b| b["phase"] == "in_progress").await;
    assert!(started["serving"] == "left" || started["serving"] == "right");

    // Letting go of the ready buttons must not score.
    support::send_button(&mut display, "primary", false).await;
    support::send_button(&mut display, "secondary", false).await;

    support::send_button(&mut display, "secondary", true).await;
    support::send_button(&mut display, "secondary", false).await;
    let board =
        support::next_matching(&mut display, "Scoreboard", |b| b["right"]["score"] == 1).await;

    assert_eq!(board["left"]["score"], 0);
    assert_eq!(board["right"]["display"], "1");
}

#[tokio::test]
async fn test_long_press_takes_a_point_back() {
    let base_url = support::spawn_server();
    let mut display = support::connect_display(&base_url).await;
    support::send_button(&mut display, "primary", true).await;
    support::send_button(&mut display, "secondary", true).await;
    support::next_matching(&mut display, "Scoreboard", |b| b["phase"] == "in_progress").await;
    support::send_button(&mut display, "primary", false).await;
    support::send_button(&mut display, "secondary", false).await;

    support::send_button(&mut display, "primary", true).await;
    support::send_button(&mut display, "primary", false).await;
    support::next_matching(&mut display, "Scoreboard", |b| b["left"]["score"] == 1).await;

    support::send_button(&mut display, "primary", true).await;
    tokio::time::sleep(Duration::from_millis(1_700)).await;
    support::next_matching(&mut display, "Scoreboard", |b| b["left"]["score"] == 0).await;
    support::send_button(&mut display, "primary", false).await;
}

#[tokio::test]
async fn test_binary_frames_close_the_connection() {
    let base_url = support::spawn_server();
    let mut display = support::connect_display(&base_url).await;
    support::next_matching(&mut display, "Scoreboard", |_| true).await;

    display
        .send(Message::binary(vec![1u8, 2, 3]))
        .await
        .expect("send binary frame");

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(msg) = display.next().await {
            match msg {
                Ok(Message::Close(frame)) => return frame.map(|f| u16::from(f.code)),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
        None
    })
    .await
    .expect("expected close before timeout");

    assert_eq!(closed, Some(1003));
}
