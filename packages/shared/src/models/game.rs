use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Room codes avoid 0/O and 1/I so they survive being read out loud.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LENGTH: usize = 6;

pub const MIN_BASE_TIME_SECONDS: i64 = 60;
pub const MAX_INCREMENT_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreference {
    White,
    Black,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    WaitingForGuest,
    Active,
    Abandoned,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Timed,
    Training,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub room_code: String,
    pub host_id: String,
    pub guest_id: Option<String>,
    pub host_color: Color,
    pub guest_color: Color,
    pub status: GameStatus,
    pub mode: GameMode,
    pub current_fen: String,
    pub move_history: Vec<String>,
    pub winner: Option<Color>,
    pub base_time_seconds: i64,
    pub increment_seconds: i64,
    pub white_time_remaining: i64,
    pub black_time_remaining: i64,
    /// None until the first move: the clock stays dormant while the
    /// host waits for an opponent.
    pub last_move_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(host_id: &str, host_color: Color, mode: GameMode, room_code: String) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            room_code,
            host_id: host_id.to_string(),
            guest_id: None,
            host_color,
            guest_color: host_color.opposite(),
            status: GameStatus::WaitingForGuest,
            mode,
            current_fen: STARTING_FEN.to_string(),
            move_history: vec![],
            winner: None,
            base_time_seconds: 0,
            increment_seconds: 0,
            white_time_remaining: 0,
            black_time_remaining: 0,
            last_move_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.color_of(user_id).is_some()
    }

    pub fn color_of(&self, user_id: &str) -> Option<Color> {
        if self.host_id == user_id {
            Some(self.host_color)
        } else if self.guest_id.as_deref() == Some(user_id) {
            Some(self.guest_color)
        } else {
            None
        }
    }

    pub fn time_remaining(&self, color: Color) -> i64 {
        match color {
            Color::White => self.white_time_remaining,
            Color::Black => self.black_time_remaining,
        }
    }

    pub fn set_time_remaining(&mut self, color: Color, seconds: i64) {
        match color {
            Color::White => self.white_time_remaining = seconds,
            Color::Black => self.black_time_remaining = seconds,
        }
    }
}
