// Scoreboard control loop: the single task that drives the match engine.

use crate::domain::{
    Clock, MatchCommand, MatchEngine, MatchEvent, MatchSnapshot, Phase, ServeToss, Side,
};
use crate::use_cases::input::InputInterpreter;
use crate::use_cases::types::{Button, FeedbackCue, ScoreboardInput, ScoreboardSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Channels for talking to a running scoreboard task.
#[derive(Clone)]
pub struct ScoreboardHandle {
    /// Raw button events into the scoreboard task.
    pub input_tx: mpsc::Sender<ScoreboardInput>,
    /// Latest snapshot, republished after every handled event.
    pub snapshot_tx: watch::Sender<MatchSnapshot>,
    /// Advisory feedback cues (audio on the display page).
    pub cue_tx: broadcast::Sender<FeedbackCue>,
    /// Stops the scoreboard task.
    pub shutdown: Arc<Notify>,
}

/// Spawns the scoreboard task for `engine` and returns its handle.
pub fn spawn_scoreboard<C, T>(
    engine: MatchEngine<C, T>,
    clock: C,
    settings: ScoreboardSettings,
    input_channel_capacity: usize,
    cue_broadcast_capacity: usize,
) -> ScoreboardHandle
where
    C: Clock + 'static,
    T: ServeToss + 'static,
{
    let (input_tx, input_rx) = mpsc::channel::<ScoreboardInput>(input_channel_capacity);
    let (snapshot_tx, _snapshot_rx) = watch::channel::<MatchSnapshot>(engine.snapshot());
    let (cue_tx, _cue_rx) = broadcast::channel::<FeedbackCue>(cue_broadcast_capacity);
    let shutdown = Arc::new(Notify::new());

    tokio::spawn(scoreboard_task(
        engine,
        clock,
        settings,
        input_rx,
        snapshot_tx.clone(),
        cue_tx.clone(),
        shutdown.clone(),
    ));

    ScoreboardHandle {
        input_tx,
        snapshot_tx,
        cue_tx,
        shutdown,
    }
}

enum LoopEvent {
    Shutdown,
    Input(ScoreboardInput),
    HoldExpired { button: Button, generation: u64 },
    Tick,
    Restart,
}

// Cancellable long-press timers, one per button.
struct HoldTimers {
    threshold: Duration,
    expired_tx: mpsc::Sender<(Button, u64)>,
    pending: [Option<(u64, JoinHandle<()>)>; 3],
    next_generation: u64,
}

impl HoldTimers {
    fn new(threshold: Duration, expired_tx: mpsc::Sender<(Button, u64)>) -> Self {
        Self {
            threshold,
            expired_tx,
            pending: [None, None, None],
            next_generation: 0,
        }
    }

    fn arm(&mut self, button: Button) {
        self.cancel(button);

        self.next_generation += 1;
        let generation = self.next_generation;
        let threshold = self.threshold;
        let expired_tx = self.expired_tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(threshold).await;
            let _ = expired_tx.send((button, generation)).await;
        });
        self.pending[button.index()] = Some((generation, timer));
    }

    fn cancel(&mut self, button: Button) {
        if let Some((_, timer)) = self.pending[button.index()].take() {
            timer.abort();
        }
    }

    fn cancel_all(&mut self) {
        for button in Button::ALL {
            self.cancel(button);
        }
    }

    // True when `generation` is the live timer for `button`; stale expiries are dropped.
    fn take_expired(&mut self, button: Button, generation: u64) -> bool {
        let slot = &mut self.pending[button.index()];
        match slot {
            Some((live, _)) if *live == generation => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for HoldTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

pub async fn scoreboard_task<C, T>(
    mut engine: MatchEngine<C, T>,
    clock: C,
    settings: ScoreboardSettings,
    mut input_rx: mpsc::Receiver<ScoreboardInput>,
    snapshot_tx: watch::Sender<MatchSnapshot>,
    cue_tx: broadcast::Sender<FeedbackCue>,
    shutdown: Arc<Notify>,
) where
    C: Clock,
    T: ServeToss,
{
    let mut interpreter = InputInterpreter::new(settings.click_cooldown);
    let (expired_tx, mut expired_rx) = mpsc::channel::<(Button, u64)>(8);
    let mut holds = HoldTimers::new(settings.hold_threshold, expired_tx);
    let mut restart_at: Option<Instant> = None;

    // Republish the running clock on a fixed cadence.
    let mut tick = tokio::time::interval(settings.clock_tick);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    snapshot_tx.send_replace(engine.snapshot());

    loop {
        let restart_deadline = restart_at;
        let event = tokio::select! {
            _ = shutdown.notified() => LoopEvent::Shutdown,
            input = input_rx.recv() => match input {
                Some(input) => LoopEvent::Input(input),
                None => {
                    debug!("scoreboard input channel closed");
                    LoopEvent::Shutdown
                }
            },
            Some((button, generation)) = expired_rx.recv() => {
                LoopEvent::HoldExpired { button, generation }
            }
            _ = tick.tick() => LoopEvent::Tick,
            _ = async move {
                match restart_deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => LoopEvent::Restart,
        };

        let phase = engine.phase();
        let command = match event {
            LoopEvent::Shutdown => break,
            LoopEvent::Tick => {
                if phase == Phase::InProgress {
                    snapshot_tx.send_replace(engine.snapshot());
                }
                continue;
            }
            LoopEvent::Restart => {
                restart_at = None;
                info!("winner display elapsed; setting up next match");
                engine.reset();
                None
            }
            LoopEvent::HoldExpired { button, generation } => {
                if holds.take_expired(button, generation) {
                    interpreter.hold_elapsed(button, phase, clock.now_millis())
                } else {
                    None
                }
            }
            LoopEvent::Input(ScoreboardInput::Pressed(button)) => {
                let outcome = interpreter.press(button, phase);
                if outcome.arm_hold {
                    holds.arm(button);
                }
                outcome.command
            }
            LoopEvent::Input(ScoreboardInput::Released(button)) => {
                holds.cancel(button);
                interpreter.release(button, phase, clock.now_millis())
            }
            LoopEvent::Input(ScoreboardInput::ReleaseAll) => {
                holds.cancel_all();
                interpreter.release_all();
                // Nothing is held any more, so nobody can still be ready.
                if phase == Phase::AwaitingReady {
                    for side in [Side::Left, Side::Right] {
                        if let Err(err) = engine.handle_input(MatchCommand::Unready(side)) {
                            debug!(?side, ?err, "unready rejected");
                        }
                    }
                }
                None
            }
        };

        if let Some(command) = command {
            debug!(?command, "applying command");
            if let Err(err) = engine.handle_input(command) {
                debug!(?command, ?err, "command rejected");
            }
        }

        let snapshot = engine.snapshot();
        for event in engine.take_events() {
            match event {
                MatchEvent::PhaseChanged(Phase::InProgress) => {
                    // Presses that readied the match are not clicks.
                    interpreter.release_all();
                    holds.cancel_all();
                    tick.reset();
                    info!(initial_server = ?engine.initial_server(), "match started");
                }
                MatchEvent::PhaseChanged(Phase::AwaitingReady) => {
                    interpreter.release_all();
                    holds.cancel_all();
                    restart_at = None;
                }
                MatchEvent::PhaseChanged(Phase::Finished) => {
                    holds.cancel_all();
                }
                MatchEvent::MatchFinished { winner } => {
                    info!(
                        ?winner,
                        left = snapshot.left.score,
                        right = snapshot.right.score,
                        elapsed_seconds = snapshot.elapsed_seconds,
                        "match finished"
                    );
                    restart_at = Some(Instant::now() + settings.winner_display);
                    let _ = cue_tx.send(FeedbackCue::MatchWon);
                }
                MatchEvent::ServiceChanged(side) => {
                    if snapshot.total_points() > 0 {
                        debug!(?side, "service changed");
                        let _ = cue_tx.send(FeedbackCue::ServiceChange);
                    }
                }
                MatchEvent::ScoresChanged | MatchEvent::ReadyChanged { .. } => {}
            }
        }

        snapshot_tx.send_replace(snapshot);
    }

    info!("scoreboard task stopped");
}
