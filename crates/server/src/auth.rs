use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::Role;
use service::booking::BookingService;
use service::notifier::Notifier;
use service::user_service;

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub booking: Arc<BookingService>,
    pub notifier: Arc<dyn Notifier>,
}

/// HS256 token claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
fn token_from(req: &Request) -> Result<String, ApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => {
                tracing::warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(ApiError::unauthorized("expected a Bearer token"))
            }
        };
    }

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let prefix = format!("{AUTH_COOKIE}=");
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix(prefix.as_str()))
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
            ApiError::unauthorized("missing credentials")
        })
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!(err = %e, "token validation failed");
            ApiError::unauthorized("invalid or expired token")
        })
}

/// Validates the token, provisions the user row, and stores the
/// resulting `Actor` in request extensions for handlers.
pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = token_from(&req)?;
    let claims = decode_claims(&token, &state.jwt_secret)?;
    let actor = user_service::provision(&state.db, claims.sub, &claims.email, &claims.name, claims.role).await?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn claims(exp: usize) -> Claims {
        Claims { sub: Uuid::new_v4(), email: "a@example.com".into(), name: "A".into(), role: Role::Stylist, exp }
    }

    fn mint(c: &Claims, secret: &str) -> String {
        encode(&Header::default(), c, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decodes_valid_token() {
        let c = claims(4_000_000_000);
        let decoded = decode_claims(&mint(&c, "k"), "k").unwrap();
        assert_eq!(decoded.sub, c.sub);
        assert_eq!(decoded.role, Role::Stylist);
    }

    #[test]
    fn rejects_wrong_secret_and_expired() {
        let c = claims(4_000_000_000);
        assert_eq!(decode_claims(&mint(&c, "k"), "other").unwrap_err().kind, "unauthorized");
        let old = claims(1_000);
        assert_eq!(decode_claims(&mint(&old, "k"), "k").unwrap_err().kind, "unauthorized");
    }
}
