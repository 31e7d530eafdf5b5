use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info};

use crate::models::game::{ColorPreference, GameMode};
use crate::models::invitation::{Invitation, InvitationKind, InvitationStatus};
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::invitation_repository::InvitationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::invitation_service_errors::InvitationServiceError;
use crate::services::game_service::GameService;
use crate::services::notification_service::NotificationService;
use crate::sync::EntityLocks;
use crate::time::TimeSource;

/// At most this many invitations per ordered (sender, recipient) pair
/// within the rolling window.
pub const INVITATION_RATE_LIMIT: usize = 3;
pub const INVITATION_RATE_WINDOW_SECONDS: i64 = 60;
pub const INVITATION_TTL_SECONDS: i64 = 3600;

const DEFAULT_BASE_TIME_SECONDS: i64 = 600;
const DEFAULT_INCREMENT_SECONDS: i64 = 5;

pub struct InvitationService {
    invitations: Arc<dyn InvitationRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    game_service: Arc<GameService>,
    time: Arc<dyn TimeSource + Send + Sync>,
    locks: Arc<EntityLocks>,
    notifications: NotificationService,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn InvitationRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        game_service: Arc<GameService>,
        time: Arc<dyn TimeSource + Send + Sync>,
        locks: Arc<EntityLocks>,
        notifications: NotificationService,
    ) -> Self {
        InvitationService {
            invitations,
            users,
            game_service,
            time,
            locks,
            notifications,
        }
    }

    pub async fn send_invitation(
        &self,
        sender_id: &str,
        recipient_id: &str,
        kind: InvitationKind,
        sender_color: Option<ColorPreference>,
        base_time_seconds: Option<i64>,
        increment_seconds: Option<i64>,
    ) -> Result<Invitation, InvitationServiceError> {
        if sender_id == recipient_id {
            return Err(InvitationServiceError::ValidationError(
                "Cannot invite yourself".to_string(),
            ));
        }

        self.users
            .get_user_by_id(sender_id)
            .await
            .map_err(map_user_error)?;
        self.users
            .get_user_by_id(recipient_id)
            .await
            .map_err(map_user_error)?;

        if self
            .invitations
            .find_pending_between(sender_id, recipient_id)
            .await?
            .is_some()
        {
            return Err(InvitationServiceError::InvalidState(
                "A pending invitation for this recipient already exists".to_string(),
            ));
        }

        let now = self.time.now();
        let window_start = now - Duration::seconds(INVITATION_RATE_WINDOW_SECONDS);
        let recent = self
            .invitations
            .count_sent_between_since(sender_id, recipient_id, window_start)
            .await?;
        if recent >= INVITATION_RATE_LIMIT {
            return Err(InvitationServiceError::RateLimited);
        }

        let invitation = Invitation::new(
            sender_id,
            recipient_id,
            kind,
            sender_color,
            base_time_seconds,
            increment_seconds,
            now,
            now + Duration::seconds(INVITATION_TTL_SECONDS),
        );

        self.invitations.create_invitation(&invitation).await?;
        info!(
            "invitation {} sent from {} to {}",
            invitation.id, sender_id, recipient_id
        );

        self.notifications.notify_invitation_updated(&invitation).await;
        Ok(invitation)
    }

    /// Accepts and materializes the game, sender as host. Invitation and
    /// game live in different aggregates, so this is a manual saga: if
    /// game creation fails after the invitation was marked accepted, the
    /// status is compensated back to pending and the error surfaced.
    pub async fn accept_invitation(
        &self,
        invitation_id: &str,
        caller_id: &str,
    ) -> Result<Invitation, InvitationServiceError> {
        let _guard = self.locks.acquire(invitation_id).await;
        let mut invitation = self.load(invitation_id).await?;

        if invitation.recipient_id != caller_id {
            return Err(InvitationServiceError::Unauthorized(
                "Only the recipient can accept an invitation".to_string(),
            ));
        }
        self.ensure_pending(&invitation)?;

        invitation.status = InvitationStatus::Accepted;
        self.invitations.update_invitation(&invitation).await?;

        let (mode, base, increment) = match invitation.kind {
            InvitationKind::QuickGame => (
                GameMode::Timed,
                Some(
                    invitation
                        .base_time_seconds
                        .unwrap_or(DEFAULT_BASE_TIME_SECONDS),
                ),
                Some(
                    invitation
                        .increment_seconds
                        .unwrap_or(DEFAULT_INCREMENT_SECONDS),
                ),
            ),
            InvitationKind::Lesson | InvitationKind::PuzzleSession => {
                (GameMode::Training, None, None)
            }
        };
        let color_preference = invitation
            .sender_color
            .unwrap_or(ColorPreference::Random);

        let game = match self
            .game_service
            .create_game(&invitation.sender_id, color_preference, mode, base, increment)
            .await
        {
            Ok(game) => game,
            Err(e) => {
                self.revert_to_pending(&mut invitation).await;
                return Err(InvitationServiceError::GameCreation(e.to_string()));
            }
        };

        invitation.game_id = Some(game.id.clone());
        if let Err(e) = self.invitations.update_invitation(&invitation).await {
            // The game exists but could not be linked; the invitation
            // must not stay accepted without it.
            self.revert_to_pending(&mut invitation).await;
            return Err(InvitationServiceError::from(e));
        }

        info!(
            "invitation {} accepted, game {} created",
            invitation.id, game.id
        );
        self.notifications.notify_invitation_updated(&invitation).await;
        Ok(invitation)
    }

    pub async fn decline_invitation(
        &self,
        invitation_id: &str,
        caller_id: &str,
    ) -> Result<Invitation, InvitationServiceError> {
        let _guard = self.locks.acquire(invitation_id).await;
        let mut invitation = self.load(invitation_id).await?;

        if invitation.recipient_id != caller_id {
            return Err(InvitationServiceError::Unauthorized(
                "Only the recipient can decline an invitation".to_string(),
            ));
        }
        self.ensure_pending(&invitation)?;

        invitation.status = InvitationStatus::Declined;
        self.invitations.update_invitation(&invitation).await?;
        info!("invitation {} declined", invitation.id);

        self.notifications.notify_invitation_updated(&invitation).await;
        Ok(invitation)
    }

    pub async fn cancel_invitation(
        &self,
        invitation_id: &str,
        caller_id: &str,
    ) -> Result<Invitation, InvitationServiceError> {
        let _guard = self.locks.acquire(invitation_id).await;
        let mut invitation = self.load(invitation_id).await?;

        if invitation.sender_id != caller_id {
            return Err(InvitationServiceError::Unauthorized(
                "Only the sender can cancel an invitation".to_string(),
            ));
        }
        self.ensure_pending(&invitation)?;

        invitation.status = InvitationStatus::Cancelled;
        self.invitations.update_invitation(&invitation).await?;
        info!("invitation {} cancelled", invitation.id);

        self.notifications.notify_invitation_updated(&invitation).await;
        Ok(invitation)
    }

    pub async fn list_pending_invitations_for(
        &self,
        user_id: &str,
    ) -> Result<Vec<Invitation>, InvitationServiceError> {
        Ok(self.invitations.list_pending_for(user_id).await?)
    }

    /// Driven by the external scheduler. Each candidate is re-checked
    /// under its entity lock: an accept racing the sweep wins if it got
    /// there first.
    pub async fn sweep_expired(&self) -> Result<usize, InvitationServiceError> {
        let now = self.time.now();
        let candidates = self
            .invitations
            .list_pending_expiring_before(now)
            .await?;

        let mut swept = 0;
        for candidate in candidates {
            let _guard = self.locks.acquire(&candidate.id).await;
            let Some(mut invitation) = self.invitations.get_invitation(&candidate.id).await? else {
                continue;
            };
            if invitation.status != InvitationStatus::Pending || invitation.expires_at > now {
                continue;
            }

            invitation.status = InvitationStatus::Expired;
            self.invitations.update_invitation(&invitation).await?;
            self.notifications.notify_invitation_updated(&invitation).await;
            swept += 1;
        }

        if swept > 0 {
            info!("expired {} invitations", swept);
        }
        Ok(swept)
    }

    async fn load(&self, invitation_id: &str) -> Result<Invitation, InvitationServiceError> {
        self.invitations
            .get_invitation(invitation_id)
            .await?
            .ok_or(InvitationServiceError::NotFound)
    }

    fn ensure_pending(&self, invitation: &Invitation) -> Result<(), InvitationServiceError> {
        if invitation.status.is_terminal() {
            return Err(InvitationServiceError::InvalidState(
                "Invitation is no longer pending".to_string(),
            ));
        }
        Ok(())
    }

    async fn revert_to_pending(&self, invitation: &mut Invitation) {
        invitation.status = InvitationStatus::Pending;
        invitation.game_id = None;
        if let Err(e) = self.invitations.update_invitation(invitation).await {
            // Nothing more can be done here; the sweep or a retry will
            // see the stale accepted status.
            error!(
                "failed to revert invitation {} to pending: {}",
                invitation.id, e
            );
        }
    }
}

fn map_user_error(err: UserRepositoryError) -> InvitationServiceError {
    match err {
        UserRepositoryError::NotFound => InvitationServiceError::NotFound,
        other => InvitationServiceError::RepositoryError(other.to_string()),
    }
}
