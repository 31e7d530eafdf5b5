use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::game::ColorPreference;
use shared::models::invitation::{Invitation, InvitationKind};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invitations", post(send_invitation))
        .route("/invitations/pending", get(list_pending))
        .route("/invitations/{invitation_id}/accept", post(accept_invitation))
        .route("/invitations/{invitation_id}/decline", post(decline_invitation))
        .route("/invitations/{invitation_id}/cancel", post(cancel_invitation))
}

#[derive(Debug, Deserialize)]
pub struct SendInvitationRequest {
    pub recipient_id: String,
    pub kind: InvitationKind,
    pub sender_color: Option<ColorPreference>,
    pub base_time_seconds: Option<i64>,
    pub increment_seconds: Option<i64>,
}

async fn send_invitation(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<SendInvitationRequest>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = state
        .invitation_service
        .send_invitation(
            &authenticated_user.user_id,
            &payload.recipient_id,
            payload.kind,
            payload.sender_color,
            payload.base_time_seconds,
            payload.increment_seconds,
        )
        .await?;
    Ok(Json(invitation))
}

async fn accept_invitation(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(invitation_id): Path<String>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = state
        .invitation_service
        .accept_invitation(&invitation_id, &authenticated_user.user_id)
        .await?;
    Ok(Json(invitation))
}

async fn decline_invitation(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(invitation_id): Path<String>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = state
        .invitation_service
        .decline_invitation(&invitation_id, &authenticated_user.user_id)
        .await?;
    Ok(Json(invitation))
}

async fn cancel_invitation(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(invitation_id): Path<String>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = state
        .invitation_service
        .cancel_invitation(&invitation_id, &authenticated_user.user_id)
        .await?;
    Ok(Json(invitation))
}

async fn list_pending(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Vec<Invitation>>, ApiError> {
    let pending = state
        .invitation_service
        .list_pending_invitations_for(&authenticated_user.user_id)
        .await?;
    Ok(Json(pending))
}
