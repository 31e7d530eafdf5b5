use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::models::auth::TokenClaims;
use crate::services::errors::auth_service_errors::AuthServiceError;

/// Verifies bearer tokens issued by the identity provider. Issuing
/// tokens (login, signup) happens outside this core; the services only
/// need an authenticated user id.
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new() -> Self {
        let jwt_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET environment variable must be set");
        AuthService { jwt_secret }
    }

    pub fn with_jwt_secret(jwt_secret: String) -> Self {
        AuthService { jwt_secret }
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError> {
        if token.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Token cannot be empty".to_string(),
            ));
        }

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthServiceError::ExpiredToken,
            _ => AuthServiceError::InvalidToken,
        })
    }

    pub fn extract_user_id_from_token(&self, token: &str) -> Result<String, AuthServiceError> {
        Ok(self.verify_token(token)?.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, sub: &str, expires_in: Duration) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: sub.to_string(),
            exp: (now + expires_in).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let service = AuthService::with_jwt_secret("secret".to_string());
        let token = make_token("secret", "user-1", Duration::hours(1));

        let user_id = service.extract_user_id_from_token(&token).unwrap();
        assert_eq!(user_id, "user-1");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service = AuthService::with_jwt_secret("secret".to_string());
        let token = make_token("other-secret", "user-1", Duration::hours(1));

        assert!(matches!(
            service.verify_token(&token),
            Err(AuthServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = AuthService::with_jwt_secret("secret".to_string());
        let token = make_token("secret", "user-1", Duration::hours(-2));

        assert!(matches!(
            service.verify_token(&token),
            Err(AuthServiceError::ExpiredToken)
        ));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let service = AuthService::with_jwt_secret("secret".to_string());

        assert!(matches!(
            service.verify_token(""),
            Err(AuthServiceError::ValidationError(_))
        ));
    }
}
