use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum GameServiceError {
    NotFound,
    InvalidState(String),
    Unauthorized(String),
    ValidationError(String),
    RoomCodeExhausted,
    RepositoryError(String),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::NotFound => write!(f, "Game or user not found"),
            GameServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            GameServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            GameServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            GameServiceError::RoomCodeExhausted => {
                write!(f, "Could not allocate a unique room code")
            }
            GameServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        GameServiceError::RepositoryError(err.to_string())
    }
}
