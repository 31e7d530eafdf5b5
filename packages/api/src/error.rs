use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, game_service_errors::GameServiceError,
    invitation_service_errors::InvitationServiceError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    GameService(GameServiceError),
    InvitationService(InvitationServiceError),
    AuthService(AuthServiceError),
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl From<InvitationServiceError> for ApiError {
    fn from(error: InvitationServiceError) -> Self {
        ApiError::InvitationService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::GameService(e) => {
                let status = match e {
                    GameServiceError::NotFound => StatusCode::NOT_FOUND,
                    GameServiceError::InvalidState(_) => StatusCode::CONFLICT,
                    GameServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
                    GameServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    GameServiceError::RoomCodeExhausted
                    | GameServiceError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::InvitationService(e) => {
                let status = match e {
                    InvitationServiceError::NotFound => StatusCode::NOT_FOUND,
                    InvitationServiceError::InvalidState(_) => StatusCode::CONFLICT,
                    InvitationServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
                    InvitationServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    InvitationServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    InvitationServiceError::GameCreation(_)
                    | InvitationServiceError::RepositoryError(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            ApiError::AuthService(e) => {
                let status = match e {
                    AuthServiceError::InvalidToken | AuthServiceError::ExpiredToken => {
                        StatusCode::UNAUTHORIZED
                    }
                    AuthServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                };
                (status, e.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
