// Use-case level inputs/outputs for the scoreboard loop.

use crate::domain::Side;
use std::time::Duration;

/// Physical buttons on the scoring device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Primary, Button::Middle, Button::Secondary];

    /// Side a button scores for; the middle button has none.
    pub fn side(self) -> Option<Side> {
        match self {
            Button::Primary => Some(Side::Left),
            Button::Middle => None,
            Button::Secondary => Some(Side::Right),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Button::Primary => 0,
            Button::Middle => 1,
            Button::Secondary => 2,
        }
    }
}

/// Raw input delivered by the display page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreboardInput {
    Pressed(Button),
    Released(Button),
    /// The display went away; forget every held button.
    ReleaseAll,
}

/// Advisory audio/feedback occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    ServiceChange,
    MatchWon,
}

/// Timing knobs for the presentation loop.
#[derive(Debug, Clone)]
pub struct ScoreboardSettings {
    /// Minimum gap between two accepted clicks of the same button.
    pub click_cooldown: Duration,
    /// How long a button must be held to take a point back.
    pub hold_threshold: Duration,
    /// How long the winner is shown before the next match is set up.
    pub winner_display: Duration,
    /// Interval at which the running clock is republished.
    pub clock_tick: Duration,
}

impl Default for ScoreboardSettings {
    fn default() -> Self {
        Self {
            click_cooldown: Duration::from_millis(750),
            hold_threshold: Duration::from_millis(1500),
            winner_display: Duration::from_millis(5000),
            clock_tick: Duration::from_secs(1),
        }
    }
}
