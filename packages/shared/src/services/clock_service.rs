use chrono::{DateTime, Utc};

use crate::models::game::{Color, Game, GameMode};

/// Result of adjudicating a move against the mover's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockOutcome {
    pub timed_out: bool,
    pub winner: Option<Color>,
}

impl ClockOutcome {
    fn ongoing() -> Self {
        ClockOutcome {
            timed_out: false,
            winner: None,
        }
    }
}

/// Server-authoritative clock arithmetic for a single game. All methods
/// take `now` explicitly; the caller reads it once per operation from
/// the server time source, never from a client.
#[derive(Clone)]
pub struct ClockService;

impl ClockService {
    pub fn new() -> Self {
        ClockService
    }

    /// Sets up the clock fields at game creation. The start timestamp is
    /// deliberately left unset: no time runs while the host waits for an
    /// opponent, so the clock only starts on the first move.
    pub fn initialize_clocks(
        &self,
        game: &mut Game,
        base_time_seconds: i64,
        increment_seconds: i64,
    ) {
        match game.mode {
            GameMode::Training => {
                game.base_time_seconds = 0;
                game.increment_seconds = 0;
                game.white_time_remaining = 0;
                game.black_time_remaining = 0;
                game.last_move_at = None;
            }
            GameMode::Timed => {
                game.base_time_seconds = base_time_seconds;
                game.increment_seconds = increment_seconds;
                game.white_time_remaining = base_time_seconds;
                game.black_time_remaining = base_time_seconds;
                game.last_move_at = None;
            }
        }
    }

    /// Deducts the mover's elapsed time and applies the increment, or
    /// reports a timeout. The timeout check runs before the increment is
    /// considered: an expired clock must never be resurrected by the
    /// increment of the move that flagged it.
    pub fn update_clock_after_move(
        &self,
        game: &mut Game,
        moving_color: Color,
        now: DateTime<Utc>,
    ) -> ClockOutcome {
        if game.mode == GameMode::Training {
            return ClockOutcome::ongoing();
        }

        let Some(last_move_at) = game.last_move_at else {
            // Very first move: the clock was dormant, nothing to deduct.
            game.last_move_at = Some(now);
            return ClockOutcome::ongoing();
        };

        let elapsed = elapsed_seconds(last_move_at, now);
        let candidate = game.time_remaining(moving_color) - elapsed;

        if candidate <= 0 {
            // Clamp and flag. The timestamp is not advanced and the
            // increment is not applied; the game is over.
            game.set_time_remaining(moving_color, 0);
            return ClockOutcome {
                timed_out: true,
                winner: Some(moving_color.opposite()),
            };
        }

        game.set_time_remaining(moving_color, candidate + game.increment_seconds);
        game.last_move_at = Some(now);
        ClockOutcome::ongoing()
    }

    /// Read-only expiry check, usable before accepting a move. For the
    /// side on the move the elapsed time is recomputed live; the other
    /// side's clock is not running, so its persisted value is the truth.
    pub fn is_time_expired(
        &self,
        game: &Game,
        color: Color,
        active_color: Color,
        now: DateTime<Utc>,
    ) -> bool {
        if game.mode == GameMode::Training {
            return false;
        }
        self.current_time_remaining(game, color, active_color, now) <= 0
    }

    /// Remaining time for display. May return a negative value for the
    /// active side: "already expired, not yet adjudicated".
    pub fn current_time_remaining(
        &self,
        game: &Game,
        color: Color,
        active_color: Color,
        now: DateTime<Utc>,
    ) -> i64 {
        if game.mode == GameMode::Training {
            return 0;
        }
        match game.last_move_at {
            Some(last_move_at) if color == active_color => {
                game.time_remaining(color) - elapsed_seconds(last_move_at, now)
            }
            _ => game.time_remaining(color),
        }
    }
}

impl Default for ClockService {
    fn default() -> Self {
        ClockService::new()
    }
}

/// Whole seconds between two instants, rounded up: a move taking 12.4s
/// costs 13s. A backwards wall-clock step counts as zero elapsed.
fn elapsed_seconds(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - last).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 999) / 1000
}
