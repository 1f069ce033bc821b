mod support;

#[tokio::test]
async fn test_state_endpoint_reports_fresh_match() {
    let base_url = support::spawn_server();
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{base_url}/state"))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = res.json().await.expect("expected json body");
    assert_eq!(body["phase"], "awaiting_ready");
    assert_eq!(body["clock"], "00:00");
    assert_eq!(body["left"]["ready"], false);
}

#[tokio::test]
async fn test_state_endpoint_reflects_ready_display() {
    let base_url = support::spawn_server();
    let mut display = support::connect_display(&base_url).await;
    support::send_button(&mut display, "primary", true).await;
    support::next_matching(&mut display, "Scoreboard", |b| b["left"]["ready"] == true).await;

    let body: serde_json::Value = reqwest::get(format!("{base_url}/state"))
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("expected json body");

    assert_eq!(body["phase"], "awaiting_ready");
    assert_eq!(body["left"]["ready"], true);
    assert_eq!(body["right"]["ready"], false);
}
