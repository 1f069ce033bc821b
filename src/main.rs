#[tokio::main]
async fn main() -> std::io::Result<()> {
    scoreboard_server::run_with_config().await
}
