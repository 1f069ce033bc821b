use std::{env, time::Duration};

use crate::use_cases::ScoreboardSettings;

// Runtime/server constants (not scoring rules).

pub fn http_port() -> u16 {
    env::var("SCOREBOARD_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn click_cooldown() -> Duration {
    millis_from_env("SCOREBOARD_CLICK_COOLDOWN_MS", 750)
}

pub fn hold_threshold() -> Duration {
    millis_from_env("SCOREBOARD_HOLD_THRESHOLD_MS", 1500)
}

pub fn winner_display() -> Duration {
    millis_from_env("SCOREBOARD_WINNER_DISPLAY_MS", 5000)
}

pub fn scoreboard_settings() -> ScoreboardSettings {
    ScoreboardSettings {
        click_cooldown: click_cooldown(),
        hold_threshold: hold_threshold(),
        winner_display: winner_display(),
        clock_tick: CLOCK_TICK_INTERVAL,
    }
}

fn millis_from_env(key: &str, default_ms: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(millis)
}

pub const INPUT_CHANNEL_CAPACITY: usize = 256;
pub const CUE_BROADCAST_CAPACITY: usize = 32;

// The clock only shows whole seconds.
pub const CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(1);
