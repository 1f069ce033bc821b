// Match state machine: owns scores, service and the match clock for one match.

use crate::domain::errors::MatchError;
use crate::domain::ports::{Clock, ServeToss};
use crate::domain::rules;
use crate::domain::state::{
    DisplayScore, MatchCommand, MatchEvent, MatchSnapshot, Phase, Side, SideSnapshot,
};

/// A single match between two sides.
///
/// All transitions go through this type; renderers read [`MatchSnapshot`]s
/// and drain queued [`MatchEvent`]s with [`MatchEngine::take_events`].
/// Out-of-phase calls return [`MatchError::InvalidPhase`] and change
/// nothing.
pub struct MatchEngine<C, T> {
    clock: C,
    toss: T,
    phase: Phase,
    left_score: u32,
    right_score: u32,
    left_ready: bool,
    right_ready: bool,
    initial_server: Option<Side>,
    // Server currently shown; None while the indicator is hidden.
    shown_server: Option<Side>,
    winner: Option<Side>,
    clock_started_at: Option<u64>,
    clock_stopped_at: Option<u64>,
    events: Vec<MatchEvent>,
}

impl<C, T> MatchEngine<C, T>
where
    C: Clock,
    T: ServeToss,
{
    pub fn new(clock: C, toss: T) -> Self {
        Self {
            clock,
            toss,
            phase: Phase::AwaitingReady,
            left_score: 0,
            right_score: 0,
            left_ready: false,
            right_ready: false,
            initial_server: None,
            shown_server: None,
            winner: None,
            clock_started_at: None,
            clock_stopped_at: None,
            events: Vec::new(),
        }
    }

    /// Single entry point for interpreted input.
    pub fn handle_input(&mut self, command: MatchCommand) -> Result<MatchSnapshot, MatchError> {
        match command {
            MatchCommand::Ready(side) => self.mark_ready(side),
            MatchCommand::Unready(side) => self.clear_ready(side),
            MatchCommand::Award(side) => self.award_point(side),
            MatchCommand::Revoke(side) => self.revoke_point(side),
            MatchCommand::Reset => Ok(self.reset()),
        }
    }

    /// Starts a fresh match waiting for both sides to ready up.
    pub fn reset(&mut self) -> MatchSnapshot {
        self.phase = Phase::AwaitingReady;
        self.left_score = 0;
        self.right_score = 0;
        self.left_ready = false;
        self.right_ready = false;
        self.initial_server = None;
        self.shown_server = None;
        self.winner = None;
        self.clock_started_at = None;
        self.clock_stopped_at = None;

        self.events.push(MatchEvent::ScoresChanged);
        self.events.push(MatchEvent::PhaseChanged(Phase::AwaitingReady));
        self.snapshot()
    }

    /// Records readiness; the match starts once both sides are ready.
    pub fn mark_ready(&mut self, side: Side) -> Result<MatchSnapshot, MatchError> {
        self.expect_phase(Phase::AwaitingReady)?;
        self.set_ready(side, true);

        if self.left_ready && self.right_ready {
            return self.start();
        }
        Ok(self.snapshot())
    }

    /// Withdraws readiness before the match has started.
    pub fn clear_ready(&mut self, side: Side) -> Result<MatchSnapshot, MatchError> {
        self.expect_phase(Phase::AwaitingReady)?;
        self.set_ready(side, false);
        Ok(self.snapshot())
    }

    /// Tosses for the initial server and starts the clock.
    pub fn start(&mut self) -> Result<MatchSnapshot, MatchError> {
        self.expect_phase(Phase::AwaitingReady)?;

        let initial = self.toss.toss();
        self.initial_server = Some(initial);
        self.left_ready = false;
        self.right_ready = false;
        self.phase = Phase::InProgress;
        self.clock_started_at = Some(self.clock.now_millis());

        self.events.push(MatchEvent::PhaseChanged(Phase::InProgress));
        self.update_service();
        Ok(self.snapshot())
    }

    pub fn award_point(&mut self, side: Side) -> Result<MatchSnapshot, MatchError> {
        self.expect_phase(Phase::InProgress)?;

        *self.score_mut(side) += 1;
        self.events.push(MatchEvent::ScoresChanged);

        match rules::winner(self.left_score, self.right_score) {
            Some(winner) => self.finish(winner),
            None => self.update_service(),
        }
        Ok(self.snapshot())
    }

    /// Takes a point back from `side`, never going below zero.
    pub fn revoke_point(&mut self, side: Side) -> Result<MatchSnapshot, MatchError> {
        self.expect_phase(Phase::InProgress)?;

        let score = self.score_mut(side);
        if *score > 0 {
            *score -= 1;
            self.events.push(MatchEvent::ScoresChanged);
        }
        self.update_service();
        Ok(self.snapshot())
    }

    /// Whole seconds on the match clock; frozen once the match finishes.
    pub fn elapsed_seconds(&self) -> u64 {
        let Some(started) = self.clock_started_at else {
            return 0;
        };
        let until = self
            .clock_stopped_at
            .unwrap_or_else(|| self.clock.now_millis());
        rules::clock_seconds(until.saturating_sub(started))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    pub fn display_scores(&self) -> (DisplayScore, DisplayScore) {
        rules::display_scores(self.left_score, self.right_score)
    }

    pub fn is_ready(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_ready,
            Side::Right => self.right_ready,
        }
    }

    pub fn initial_server(&self) -> Option<Side> {
        self.initial_server
    }

    /// Side serving the next point; None unless a match is in progress.
    pub fn serving_side(&self) -> Option<Side> {
        self.shown_server
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let (left_display, right_display) = self.display_scores();
        MatchSnapshot {
            phase: self.phase,
            left: SideSnapshot {
                score: self.left_score,
                display: left_display,
                ready: self.left_ready,
            },
            right: SideSnapshot {
                score: self.right_score,
                display: right_display,
                ready: self.right_ready,
            },
            serving: self.shown_server,
            winner: self.winner,
            elapsed_seconds: self.elapsed_seconds(),
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), MatchError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MatchError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Left => &mut self.left_score,
            Side::Right => &mut self.right_score,
        }
    }

    fn set_ready(&mut self, side: Side, ready: bool) {
        let slot = match side {
            Side::Left => &mut self.left_ready,
            Side::Right => &mut self.right_ready,
        };
        if *slot != ready {
            *slot = ready;
            self.events.push(MatchEvent::ReadyChanged { side, ready });
        }
    }

    fn update_service(&mut self) {
        let Some(initial) = self.initial_server else {
            return;
        };
        let server = rules::serving_side(initial, self.left_score + self.right_score);
        if self.shown_server != Some(server) {
            self.shown_server = Some(server);
            self.events.push(MatchEvent::ServiceChanged(server));
        }
    }

    fn finish(&mut self, winner: Side) {
        self.phase = Phase::Finished;
        self.winner = Some(winner);
        self.shown_server = None;
        self.clock_stopped_at = Some(self.clock.now_millis());

        self.events.push(MatchEvent::PhaseChanged(Phase::Finished));
        self.events.push(MatchEvent::MatchFinished { winner });
    }
}
