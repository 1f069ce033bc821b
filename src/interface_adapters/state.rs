use crate::domain::{Clock, ServeToss, Side};
use crate::use_cases::ScoreboardHandle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

#[derive(Clone)]
pub struct AppState {
    // Channels into and out of the single scoreboard task.
    pub scoreboard: ScoreboardHandle,
}

// Monotonic clock backed by the tokio timer, so paused test time applies.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// Fair coin toss for the initial server.
pub struct RandomToss<R> {
    rng: R,
}

impl RandomToss<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng + Send> RandomToss<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> ServeToss for RandomToss<R> {
    fn toss(&mut self) -> Side {
        if self.rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}
