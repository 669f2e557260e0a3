//! Bearer-token extractor for protected handlers.
use crate::api::error::{api_unauthorized, ApiError};
use crate::app::AppState;
use crate::auth::{AuthError, Claims};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Verification covers the signature, expiry, and the logout blacklist; a
/// handler taking `AuthUser` never runs for an unauthenticated request.
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| api_unauthorized("missing authorization header"))?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| api_unauthorized("invalid authorization header"))?;

        let claims = state.verifier.verify(token).await.map_err(|err| match err {
            AuthError::Blacklisted => api_unauthorized("access denied: token is blacklisted"),
            _ => api_unauthorized("invalid or expired token"),
        })?;

        Ok(AuthUser(claims))
    }
}
