// Domain layer: scoring rules and the match state machine.

pub mod engine;
pub mod errors;
pub mod ports;
pub mod rules;
pub mod state;

pub use engine::MatchEngine;
pub use errors::MatchError;
pub use ports::{Clock, ServeToss};
pub use state::{DisplayScore, MatchCommand, MatchEvent, MatchSnapshot, Phase, Side, SideSnapshot};

#[cfg(test)]
pub(crate) mod test_support;
