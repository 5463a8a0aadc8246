use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tourbook_core::Requester;

use crate::{error::AppError, state::AppState};

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
}

impl From<SessionClaims> for Requester {
    fn from(claims: SessionClaims) -> Self {
        Requester {
            id: claims.sub,
            email: claims.email.map(tourbook_shared::Masked),
            display_name: claims.name,
        }
    }
}

/// Verifies the bearer token and injects the caller as a `Requester`
/// extension for downstream handlers.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|e| AppError::AuthenticationError(format!("Invalid session: {}", e)))?;

    let requester: Requester = token_data.claims.into();
    req.extensions_mut().insert(requester);

    Ok(next.run(req).await)
}
