// Use cases layer: input interpretation and the scoreboard control loop.

pub mod input;
pub mod scoreboard;
pub mod types;

pub use input::InputInterpreter;
pub use scoreboard::{ScoreboardHandle, scoreboard_task, spawn_scoreboard};
pub use types::{Button, FeedbackCue, ScoreboardInput, ScoreboardSettings};
