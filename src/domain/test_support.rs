use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ports::{Clock, ServeToss};
use crate::domain::state::Side;

// Hand-driven time source shared between a test and the engine it feeds.
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub(crate) fn new(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    pub(crate) fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// Toss that always lands on the same side.
pub(crate) struct FixedToss(pub(crate) Side);

impl ServeToss for FixedToss {
    fn toss(&mut self) -> Side {
        self.0
    }
}

// Toss that replays a fixed sequence, cycling when exhausted.
pub(crate) struct SequenceToss {
    sides: Vec<Side>,
    next: usize,
}

impl SequenceToss {
    pub(crate) fn new(sides: Vec<Side>) -> Self {
        Self { sides, next: 0 }
    }
}

impl ServeToss for SequenceToss {
    fn toss(&mut self) -> Side {
        let side = self.sides[self.next % self.sides.len()];
        self.next += 1;
        side
    }
}
