// Wire protocol DTOs and conversions for the scoreboard display.

use crate::domain::rules::format_clock;
use crate::domain::{MatchSnapshot, Phase, Side, SideSnapshot};
use crate::use_cases::{Button, FeedbackCue, ScoreboardInput};
use serde::{Deserialize, Serialize};

/// Messages the server sends to the display over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Full scoreboard state after any change.
    Scoreboard(ScoreboardDto),
    // Advisory sound cue.
    Cue(CueDto),
}

/// Messages the display sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // A physical button went down or up.
    Button(ButtonPayload),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonPayload {
    pub button: ButtonDto,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonDto {
    Primary,
    Middle,
    Secondary,
}

impl From<ButtonDto> for Button {
    fn from(button: ButtonDto) -> Self {
        match button {
            ButtonDto::Primary => Button::Primary,
            ButtonDto::Middle => Button::Middle,
            ButtonDto::Secondary => Button::Secondary,
        }
    }
}

impl From<ButtonPayload> for ScoreboardInput {
    fn from(payload: ButtonPayload) -> Self {
        let button = Button::from(payload.button);
        if payload.pressed {
            ScoreboardInput::Pressed(button)
        } else {
            ScoreboardInput::Released(button)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideDto {
    Left,
    Right,
}

impl From<Side> for SideDto {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => SideDto::Left,
            Side::Right => SideDto::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDto {
    AwaitingReady,
    InProgress,
    Finished,
}

impl From<Phase> for PhaseDto {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::AwaitingReady => PhaseDto::AwaitingReady,
            Phase::InProgress => PhaseDto::InProgress,
            Phase::Finished => PhaseDto::Finished,
        }
    }
}

/// Per-side values as rendered on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideStateDto {
    pub score: u32,
    // "0".."11" or "ADV".
    pub display: String,
    pub ready: bool,
}

impl From<&SideSnapshot> for SideStateDto {
    fn from(side: &SideSnapshot) -> Self {
        Self {
            score: side.score,
            display: side.display.to_string(),
            ready: side.ready,
        }
    }
}

/// Snapshot of the scoreboard sent on every change and served by `GET /state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardDto {
    pub phase: PhaseDto,
    pub left: SideStateDto,
    pub right: SideStateDto,
    pub serving: Option<SideDto>,
    pub winner: Option<SideDto>,
    pub elapsed_seconds: u64,
    // Pre-formatted "MM:SS".
    pub clock: String,
}

impl From<&MatchSnapshot> for ScoreboardDto {
    fn from(snapshot: &MatchSnapshot) -> Self {
        Self {
            phase: snapshot.phase.into(),
            left: SideStateDto::from(&snapshot.left),
            right: SideStateDto::from(&snapshot.right),
            serving: snapshot.serving.map(SideDto::from),
            winner: snapshot.winner.map(SideDto::from),
            elapsed_seconds: snapshot.elapsed_seconds,
            clock: format_clock(snapshot.elapsed_seconds),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueDto {
    ServiceChange,
    MatchWon,
}

impl From<FeedbackCue> for CueDto {
    fn from(cue: FeedbackCue) -> Self {
        match cue {
            FeedbackCue::ServiceChange => CueDto::ServiceChange,
            FeedbackCue::MatchWon => CueDto::MatchWon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayScore;
    use serde_json::{Value, json};

    fn snapshot() -> MatchSnapshot {
        MatchSnapshot {
            phase: Phase::InProgress,
            left: SideSnapshot {
                score: 11,
                display: DisplayScore::Advantage,
                ready: false,
            },
            right: SideSnapshot {
                score: 10,
                display: DisplayScore::Points(10),
                ready: false,
            },
            serving: Some(Side::Right),
            winner: None,
            elapsed_seconds: 125,
        }
    }

    #[test]
    fn when_scoreboard_is_serialized_then_it_uses_tagged_snake_case_shape() {
        let msg = ServerMessage::Scoreboard(ScoreboardDto::from(&snapshot()));

        let value: Value = serde_json::to_value(&msg).expect("expected serializable message");

        assert_eq!(value["type"], "Scoreboard");
        assert_eq!(value["data"]["phase"], "in_progress");
        assert_eq!(value["data"]["left"]["display"], "ADV");
        assert_eq!(value["data"]["right"]["display"], "10");
        assert_eq!(value["data"]["serving"], "right");
        assert_eq!(value["data"]["winner"], Value::Null);
        assert_eq!(value["data"]["clock"], "02:05");
    }

    #[test]
    fn when_cue_is_serialized_then_it_is_a_tagged_string() {
        let msg = ServerMessage::Cue(FeedbackCue::MatchWon.into());

        let value = serde_json::to_value(&msg).expect("expected serializable message");

        assert_eq!(value, json!({ "type": "Cue", "data": "match_won" }));
    }

    #[test]
    fn when_button_message_is_parsed_then_it_maps_to_scoreboard_input() {
        let raw = r#"{"type":"Button","data":{"button":"secondary","pressed":false}}"#;

        let ClientMessage::Button(payload) =
            serde_json::from_str::<ClientMessage>(raw).expect("expected valid client message");

        assert_eq!(
            ScoreboardInput::from(payload),
            ScoreboardInput::Released(Button::Secondary)
        );
    }

    #[test]
    fn when_button_name_is_unknown_then_parsing_fails() {
        let raw = r#"{"type":"Button","data":{"button":"left","pressed":true}}"#;

        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }
}
