// Domain-level match types: sides, phases, commands and the snapshots renderers consume.

use std::fmt;

/// A player's side of the table. Stable for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Lifecycle of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingReady,
    InProgress,
    Finished,
}

/// What the scoreboard shows for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayScore {
    Points(u32),
    Advantage,
}

impl fmt::Display for DisplayScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayScore::Points(points) => write!(f, "{points}"),
            DisplayScore::Advantage => f.write_str("ADV"),
        }
    }
}

/// Interpreted input consumed by `MatchEngine::handle_input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCommand {
    Ready(Side),
    Unready(Side),
    Award(Side),
    Revoke(Side),
    Reset,
}

/// Observations queued by the engine for renderers and feedback sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    ScoresChanged,
    PhaseChanged(Phase),
    ReadyChanged { side: Side, ready: bool },
    ServiceChanged(Side),
    MatchFinished { winner: Side },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideSnapshot {
    pub score: u32,
    pub display: DisplayScore,
    pub ready: bool,
}

/// Immutable copy of everything a renderer needs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub left: SideSnapshot,
    pub right: SideSnapshot,
    pub serving: Option<Side>,
    pub winner: Option<Side>,
    pub elapsed_seconds: u64,
}

impl MatchSnapshot {
    pub fn total_points(&self) -> u32 {
        self.left.score + self.right.score
    }
}
