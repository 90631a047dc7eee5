//! Bearer-token authentication
//!
//! The identity provider issues HS256 JWTs whose `sub` claim is the user id.
//! This middleware validates the token and attaches an [`AuthContext`] to
//! the request; unauthenticated callers are rejected before any handler or
//! side effect runs.

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Authentication context attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("Token validation failed: {0}")]
    TokenValidation(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Expiration time
    pub exp: usize,
}

/// Validator for bearer tokens
#[derive(Clone)]
pub struct TokenValidator {
    jwt_secret: Vec<u8>,
}

impl TokenValidator {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.as_bytes().to_vec(),
        }
    }

    /// Authenticate a request by its headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(&self.jwt_secret),
            &jsonwebtoken::Validation::default(),
        )
        .map_err(|e| AuthError::TokenValidation(e.to_string()))?;

        Ok(AuthContext {
            user_id: token_data.claims.sub,
        })
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(validator): State<TokenValidator>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = validator.authenticate(req.headers())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(user_id: Uuid, secret: &str) -> String {
        let claims = Claims {
            sub: user_id,
            exp: usize::MAX,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_authenticates() {
        let validator = TokenValidator::new("test-secret");
        let user_id = Uuid::new_v4();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token_for(user_id, "test-secret"))
                .parse()
                .unwrap(),
        );

        let ctx = validator.authenticate(&headers).unwrap();
        assert_eq!(ctx.user_id, user_id);
    }

    #[test]
    fn test_missing_header_rejected() {
        let validator = TokenValidator::new("test-secret");
        let err = validator.authenticate(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator = TokenValidator::new("test-secret");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token_for(Uuid::new_v4(), "other-secret"))
                .parse()
                .unwrap(),
        );

        let err = validator.authenticate(&headers).unwrap_err();
        assert!(matches!(err, AuthError::TokenValidation(_)));
    }
}
