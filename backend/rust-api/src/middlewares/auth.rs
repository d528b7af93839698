use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::services::{AppState, AuthContext};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String,  // user_id
    pub role: String, // student or admin
    pub exp: usize,   // expiration timestamp
    pub iat: usize,   // issued at timestamp
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid token signature")]
    InvalidSignature,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, claims: &JwtClaims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        use jsonwebtoken::errors::ErrorKind;

        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::InvalidToken,
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Attaches the [`AuthContext`] of the caller to the request.
///
/// A missing or invalid token is not rejected here; it produces an
/// anonymous context and the service decides whether identity is needed.
pub async fn auth_context_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = bearer_token(&headers).and_then(|token| {
        JwtService::new(&state.config.jwt_secret)
            .validate_token(token)
            .map_err(|e| tracing::warn!("JWT validation failed: {}", e))
            .ok()
    });

    if let Some(claims) = &claims {
        tracing::debug!("Authenticated user: {} (role: {})", claims.sub, claims.role);
    }

    request
        .extensions_mut()
        .insert(AuthContext::from_claims(claims.as_ref()));

    next.run(request).await
}

pub async fn admin_guard_middleware(request: Request, next: Next) -> Response {
    let allowed = request
        .extensions()
        .get::<AuthContext>()
        .map(|ctx| ctx.require_admin().map(|_| ()))
        .unwrap_or(Err(ServiceError::NotAuthenticated));

    match allowed {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!("Access denied: admin role required");
            err.into_response()
        }
    }
}
