// Turns raw button presses and releases into match commands.

use crate::domain::{MatchCommand, Phase};
use crate::use_cases::types::Button;
use std::time::Duration;

/// Result of a button going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOutcome {
    pub command: Option<MatchCommand>,
    /// The caller should start the long-press timer for this button.
    pub arm_hold: bool,
}

/// Per-button click debouncing, long-press detection and the ready-up handshake.
///
/// The interpreter never owns timers: callers arm a hold timer when
/// [`PressOutcome::arm_hold`] is set, cancel it on release and report its
/// expiry through [`InputInterpreter::hold_elapsed`].
#[derive(Debug, Clone)]
pub struct InputInterpreter {
    click_cooldown_ms: u64,
    held: [bool; 3],
    hold_fired: [bool; 3],
    last_click_ms: [Option<u64>; 3],
}

impl InputInterpreter {
    pub fn new(click_cooldown: Duration) -> Self {
        Self {
            click_cooldown_ms: click_cooldown.as_millis() as u64,
            held: [false; 3],
            hold_fired: [false; 3],
            last_click_ms: [None; 3],
        }
    }

    pub fn press(&mut self, button: Button, phase: Phase) -> PressOutcome {
        let i = button.index();
        self.held[i] = true;
        self.hold_fired[i] = false;

        match (phase, button.side()) {
            (Phase::AwaitingReady, Some(side)) => PressOutcome {
                command: Some(MatchCommand::Ready(side)),
                arm_hold: false,
            },
            (Phase::InProgress, Some(_)) => PressOutcome {
                command: None,
                arm_hold: true,
            },
            _ => PressOutcome {
                command: None,
                arm_hold: false,
            },
        }
    }

    pub fn release(&mut self, button: Button, phase: Phase, now_ms: u64) -> Option<MatchCommand> {
        let i = button.index();
        let was_held = std::mem::replace(&mut self.held[i], false);
        let hold_fired = std::mem::replace(&mut self.hold_fired[i], false);

        if phase == Phase::AwaitingReady {
            return button.side().map(MatchCommand::Unready);
        }

        // A release that completes a long press is not also a click.
        if !was_held || hold_fired || !self.accept_click(button, now_ms) {
            return None;
        }

        match (phase, button.side()) {
            (Phase::InProgress, Some(side)) => Some(MatchCommand::Award(side)),
            (_, None) => Some(MatchCommand::Reset),
            (Phase::Finished, Some(_)) | (Phase::AwaitingReady, Some(_)) => None,
        }
    }

    /// Called when the long-press timer for `button` expires.
    pub fn hold_elapsed(&mut self, button: Button, phase: Phase, now_ms: u64) -> Option<MatchCommand> {
        let i = button.index();
        if !self.held[i] || phase != Phase::InProgress {
            return None;
        }
        let side = button.side()?;

        self.hold_fired[i] = true;
        self.last_click_ms[i] = Some(now_ms);
        Some(MatchCommand::Revoke(side))
    }

    /// Drops held state, e.g. when the display disconnects mid-press.
    pub fn release_all(&mut self) {
        self.held = [false; 3];
        self.hold_fired = [false; 3];
    }

    fn accept_click(&mut self, button: Button, now_ms: u64) -> bool {
        let slot = &mut self.last_click_ms[button.index()];
        let cooled_down = match *slot {
            Some(last) => now_ms.saturating_sub(last) > self.click_cooldown_ms,
            None => true,
        };
        if cooled_down {
            *slot = Some(now_ms);
        }
        cooled_down
    }
}
