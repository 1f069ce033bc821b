use crate::interface_adapters::net::client::ws_handler;
use crate::interface_adapters::protocol::ScoreboardDto;
use crate::interface_adapters::state::AppState;

use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/state", get(state_handler))
        .with_state(state)
}

// Current scoreboard for displays that poll instead of holding a socket.
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Json<ScoreboardDto> {
    let snapshot = *state.scoreboard.snapshot_tx.borrow();
    Json(ScoreboardDto::from(&snapshot))
}
