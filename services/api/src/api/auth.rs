//! Login and logout handlers.
use crate::api::error::{
    api_internal, api_unauthorized, api_validation_error, ApiError,
};
use crate::api::types::{LoginRequest, LoginResponse, LogoutResponse};
use crate::api::validate;
use crate::app::AppState;
use crate::auth::password;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid payload", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate::login_body(&body).map_err(|message| api_validation_error(&message))?;

    // Unknown email and wrong password produce the same response so the
    // endpoint does not leak which accounts exist.
    let user = state
        .store
        .find_user_by_email(&body.user_name)
        .await
        .map_err(|err| api_internal("failed to look up user", &err))?
        .ok_or_else(|| api_unauthorized("invalid credentials"))?;

    if !password::verify_password(&body.password, &user.password_hash) {
        return Err(api_unauthorized("invalid credentials"));
    }

    let token = state
        .verifier
        .mint(&user)
        .map_err(|err| api_internal("failed to sign token", &err))?;
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Token blacklisted", body = LogoutResponse),
        (status = 400, description = "Token missing", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Token invalid", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| api_validation_error("token is required for logout"))?;

    state
        .verifier
        .blacklist(token)
        .await
        .map_err(|_| api_unauthorized("invalid token"))?;

    Ok(Json(LogoutResponse {
        token: token.to_string(),
    }))
}
