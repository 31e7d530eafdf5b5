use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::ColorPreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationKind {
    QuickGame,
    Lesson,
    PuzzleSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Expired,
}

impl InvitationStatus {
    /// Every status except Pending is terminal; a terminal invitation
    /// never transitions again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub kind: InvitationKind,
    pub status: InvitationStatus,
    pub sender_color: Option<ColorPreference>,
    pub base_time_seconds: Option<i64>,
    pub increment_seconds: Option<i64>,
    /// Set only after a successful accept.
    pub game_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sender_id: &str,
        recipient_id: &str,
        kind: InvitationKind,
        sender_color: Option<ColorPreference>,
        base_time_seconds: Option<i64>,
        increment_seconds: Option<i64>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Invitation {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            kind,
            status: InvitationStatus::Pending,
            sender_color,
            base_time_seconds,
            increment_seconds,
            game_id: None,
            created_at,
            expires_at,
        }
    }
}
