use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::models::game::Game;
use crate::models::invitation::Invitation;
use crate::repositories::websocket_repository::WebSocketRepository;

/// Pushes entity-changed events to connected participants. Delivery is
/// fire-and-forget: a push failure is logged and never fails the
/// operation that produced the state change.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn WebSocketRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn WebSocketRepository>) -> Self {
        Self { repository }
    }

    pub async fn notify_game_updated(&self, game: &Game) {
        let payload = json!({
            "event": "game_updated",
            "game": game,
        })
        .to_string();

        self.push(&game.host_id, &payload).await;
        if let Some(guest_id) = &game.guest_id {
            self.push(guest_id, &payload).await;
        }
    }

    pub async fn notify_invitation_updated(&self, invitation: &Invitation) {
        let payload = json!({
            "event": "invitation_updated",
            "invitation": invitation,
        })
        .to_string();

        self.push(&invitation.sender_id, &payload).await;
        self.push(&invitation.recipient_id, &payload).await;
    }

    async fn push(&self, user_id: &str, payload: &str) {
        match self.repository.get_connection_id(user_id).await {
            Ok(Some(connection_id)) => {
                if let Err(e) = self.repository.send_message(&connection_id, payload).await {
                    warn!("failed to push notification to {}: {}", user_id, e);
                }
            }
            Ok(None) => {
                debug!("user {} is not connected, skipping notification", user_id);
            }
            Err(e) => {
                warn!("failed to look up connection for {}: {}", user_id, e);
            }
        }
    }
}
