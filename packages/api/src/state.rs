use std::sync::Arc;

use shared::services::auth_service::AuthService;
use shared::services::game_service::GameService;
use shared::services::invitation_service::InvitationService;

#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
    pub invitation_service: Arc<InvitationService>,
    pub auth_service: Arc<AuthService>,
}
