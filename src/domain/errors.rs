// Domain-level errors for match transitions.

use crate::domain::state::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    // The transition is only legal in `expected`; state was left untouched.
    InvalidPhase { expected: Phase, actual: Phase },
}
