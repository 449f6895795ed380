use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    headers::{authorization::Bearer, Authorization},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    RequestPartsExt, TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::IdTokenService;

/// The verified caller, placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}

/// Resolve a bearer token into the caller's identity
pub fn authenticate(tokens: &IdTokenService, token: &str) -> Option<AuthUser> {
    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Token validation failed: {}", e);
            return None;
        }
    };

    match Uuid::parse_str(&claims.sub) {
        Ok(uid) => Some(AuthUser {
            uid,
            email: claims.email,
        }),
        Err(e) => {
            warn!("Invalid uid in token: {}", e);
            None
        }
    }
}

/// Authentication middleware to protect routes
pub async fn auth_middleware<B>(
    State(tokens): State<Arc<IdTokenService>>,
    req: Request<B>,
    next: Next<B>,
) -> Result<Response, Response> {
    let (mut parts, body) = req.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|e| {
            debug!("Authorization header extraction failed: {:?}", e);
            unauthorized()
        })?;

    let auth_user = authenticate(&tokens, bearer.token()).ok_or_else(unauthorized)?;
    debug!("User authenticated: {}", auth_user.uid);

    parts.extensions.insert(auth_user);

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Extractor for authenticated user
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(unauthorized)
    }
}
