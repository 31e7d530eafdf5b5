use crate::repositories::errors::invitation_repository_errors::InvitationRepositoryError;

#[derive(Debug)]
pub enum InvitationServiceError {
    NotFound,
    InvalidState(String),
    Unauthorized(String),
    ValidationError(String),
    RateLimited,
    /// The accept flow reached game creation and game creation failed.
    /// The invitation has been reverted to pending.
    GameCreation(String),
    RepositoryError(String),
}

impl std::fmt::Display for InvitationServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationServiceError::NotFound => write!(f, "Invitation or user not found"),
            InvitationServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            InvitationServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            InvitationServiceError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            InvitationServiceError::RateLimited => {
                write!(f, "Too many invitations sent to this recipient")
            }
            InvitationServiceError::GameCreation(msg) => {
                write!(f, "Game creation failed: {}", msg)
            }
            InvitationServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for InvitationServiceError {}

impl From<InvitationRepositoryError> for InvitationServiceError {
    fn from(err: InvitationRepositoryError) -> Self {
        InvitationServiceError::RepositoryError(err.to_string())
    }
}
