// Pure scoring rules: display values, match end, service rotation and clock formatting.

use crate::domain::state::{DisplayScore, Side};

/// Points a side needs before it can win.
pub const WINNING_POINTS: u32 = 11;
/// Lead required to close out a game.
pub const WINNING_MARGIN: u32 = 2;
/// Total points at which both sides have reached 10 and deuce rules apply.
pub const DEUCE_TOTAL: u32 = 2 * (WINNING_POINTS - 1);
/// Largest value the "MM:SS" clock can show.
pub const MAX_CLOCK_SECONDS: u64 = 99 * 60 + 59;

/// Maps raw point counts to what the scoreboard shows.
///
/// Below the deuce total both sides show their raw score. Once both sides
/// have reached 10 a tie shows as 10-10, a one point lead as ADV-10 and a
/// two point lead as 11 for the leader. In that last case the trailing side
/// keeps its raw count.
pub fn display_scores(left: u32, right: u32) -> (DisplayScore, DisplayScore) {
    if left + right < DEUCE_TOTAL {
        return (DisplayScore::Points(left), DisplayScore::Points(right));
    }

    let deuce = DisplayScore::Points(WINNING_POINTS - 1);
    let game = DisplayScore::Points(WINNING_POINTS);

    match left.abs_diff(right) {
        0 => (deuce, deuce),
        1 if left > right => (DisplayScore::Advantage, deuce),
        1 => (deuce, DisplayScore::Advantage),
        _ if left > right => (game, DisplayScore::Points(right)),
        _ => (DisplayScore::Points(left), game),
    }
}

/// Returns the side that has won, if either has.
pub fn winner(left: u32, right: u32) -> Option<Side> {
    if left >= WINNING_POINTS && left >= right + WINNING_MARGIN {
        Some(Side::Left)
    } else if right >= WINNING_POINTS && right >= left + WINNING_MARGIN {
        Some(Side::Right)
    } else {
        None
    }
}

/// Server for the next point given the total points played so far.
///
/// Below the deuce total the initial server takes two points, then the
/// other side two, and so on. From 10-10 service alternates every point.
pub fn serving_side(initial: Side, total: u32) -> Side {
    if total >= DEUCE_TOTAL {
        return if total % 2 == 0 { initial } else { initial.opponent() };
    }

    let mut adjusted = total + 1;
    if adjusted % 2 != 0 {
        adjusted += 1;
    }

    if adjusted % 4 == 0 {
        initial.opponent()
    } else {
        initial
    }
}

/// Rounds a millisecond span to whole seconds and clamps it to the clock range.
pub fn clock_seconds(elapsed_millis: u64) -> u64 {
    ((elapsed_millis + 500) / 1000).min(MAX_CLOCK_SECONDS)
}

/// Formats seconds as a zero padded "MM:SS" string.
pub fn format_clock(seconds: u64) -> String {
    let seconds = seconds.min(MAX_CLOCK_SECONDS);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
