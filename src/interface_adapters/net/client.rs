// WebSocket adapter for the scoreboard display page.

use crate::domain::MatchSnapshot;
use crate::interface_adapters::protocol::{ClientMessage, ScoreboardDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{FeedbackCue, ScoreboardHandle, ScoreboardInput};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    ScoreboardClosed,
}

enum LoopControl {
    Continue,
    Disconnect,
}

const MAX_INVALID_JSON: u32 = 10;

struct ConnCtx {
    input_tx: mpsc::Sender<ScoreboardInput>,
    snapshot_rx: watch::Receiver<MatchSnapshot>,
    cue_rx: broadcast::Receiver<FeedbackCue>,
    msgs_in: u64,
    msgs_out: u64,
    invalid_json: u32,
    close_frame: Option<CloseFrame>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let scoreboard = state.scoreboard.clone();
    ws.on_upgrade(|socket| {
        // Separate connection id for correlating logs across one display session.
        let conn_id: u64 = rand::random();
        handle_socket(socket, scoreboard).instrument(info_span!("conn", conn_id))
    })
}

async fn handle_socket(mut socket: WebSocket, scoreboard: ScoreboardHandle) {
    // Subscribe before the first await so no change is missed.
    let mut ctx = ConnCtx {
        input_tx: scoreboard.input_tx.clone(),
        snapshot_rx: scoreboard.snapshot_tx.subscribe(),
        cue_rx: scoreboard.cue_tx.subscribe(),
        msgs_in: 0,
        msgs_out: 0,
        invalid_json: 0,
        close_frame: None,
    };

    info!("display connected");

    // Send Initial State
    let initial = *ctx.snapshot_rx.borrow_and_update();
    if let Err(e) = send_snapshot(&mut socket, &initial).await {
        warn!(error = ?e, "failed to send initial scoreboard");
        return;
    }
    ctx.msgs_out += 1;

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "display loop exited with error");
    }

    // Buttons held on a vanished display must not trigger long presses.
    if ctx.input_tx.send(ScoreboardInput::ReleaseAll).await.is_err() {
        debug!("scoreboard gone before disconnect cleanup");
    }

    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        invalid_json = ctx.invalid_json,
        "connection stats"
    );
    info!("display disconnected");
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        snapshot_rx,
        cue_rx,
        msgs_in,
        msgs_out,
        invalid_json,
        close_frame,
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let control = tokio::select! {
            incoming = socket.recv() => {
                handle_incoming_ws(incoming, input_tx, msgs_in, invalid_json, close_frame)
            }

            changed = snapshot_rx.changed() => match changed {
                Ok(()) => {
                    let snapshot = *snapshot_rx.borrow_and_update();
                    forward(send_snapshot(socket, &snapshot).await, msgs_out)
                }
                Err(_) => Err(NetError::ScoreboardClosed),
            },

            cue = cue_rx.recv() => match cue {
                Ok(cue) => {
                    let msg = ServerMessage::Cue(cue.into());
                    forward(send_message(socket, &msg).await, msgs_out)
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Cues are advisory; stale ones are not worth replaying.
                    debug!(missed, "feedback cues lagged");
                    Ok(LoopControl::Continue)
                }
                Err(broadcast::error::RecvError::Closed) => Err(NetError::ScoreboardClosed),
            },
        };

        let disconnect = match control {
            Ok(LoopControl::Continue) => false,
            Ok(LoopControl::Disconnect) => true,
            Err(e) => {
                fatal = Some(e);
                true
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    input_tx: &mpsc::Sender<ScoreboardInput>,
    msgs_in: &mut u64,
    invalid_json: &mut u32,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(Message::Text(text))) => {
            *msgs_in += 1;
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Button(payload)) => forward_input(input_tx, payload.into()),
                Err(parse_err) => {
                    *invalid_json += 1;
                    warn!(bytes = text.len(), error = %parse_err, "failed to parse client message");

                    if *invalid_json > MAX_INVALID_JSON {
                        *close_frame = Some(CloseFrame {
                            code: close_code::POLICY,
                            reason: "too many invalid messages".into(),
                        });
                        return Ok(LoopControl::Disconnect);
                    }
                    Ok(LoopControl::Continue)
                }
            }
        }
        Some(Ok(Message::Binary(_))) => {
            *close_frame = Some(CloseFrame {
                code: close_code::UNSUPPORTED,
                reason: "binary messages not supported".into(),
            });
            Ok(LoopControl::Disconnect)
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Ok(LoopControl::Continue),
        Some(Ok(Message::Close(_))) => Ok(LoopControl::Disconnect),
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            debug!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn forward_input(
    input_tx: &mpsc::Sender<ScoreboardInput>,
    input: ScoreboardInput,
) -> Result<LoopControl, NetError> {
    match input_tx.try_send(input) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!(input = ?dropped, "input channel full; dropping input");
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::InputClosed),
    }
}

// Counts a successful send; a failed send ends the connection.
fn forward(
    sent: Result<(), NetError>,
    msgs_out: &mut u64,
) -> Result<LoopControl, NetError> {
    match sent {
        Ok(()) => {
            *msgs_out += 1;
            Ok(LoopControl::Continue)
        }
        Err(err) => {
            warn!(error = ?err, "failed to send to display");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &MatchSnapshot) -> Result<(), NetError> {
    send_message(socket, &ServerMessage::Scoreboard(ScoreboardDto::from(snapshot))).await
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)
}
