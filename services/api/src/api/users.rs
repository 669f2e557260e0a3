//! User signup handler.
use crate::api::error::{api_conflict, api_internal, api_validation_error, ApiError};
use crate::api::types::SignupRequest;
use crate::api::validate;
use crate::app::AppState;
use crate::auth::password;
use crate::model::{NewUser, PublicUser};
use crate::store::StoreError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = PublicUser),
        (status = 400, description = "Invalid payload", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::signup_body(&body).map_err(|message| api_validation_error(&message))?;

    let existing = state
        .store
        .find_user_by_email(&body.email)
        .await
        .map_err(|err| api_internal("failed to check email", &err))?;
    if existing.is_some() {
        return Err(api_conflict("email_exists", "email already registered"));
    }

    let password_hash = password::hash_password(&body.password)
        .map_err(|err| api_internal("failed to hash password", &err))?;

    let created = state
        .store
        .create_user(NewUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password_hash,
        })
        .await
        .map_err(|err| match err {
            // Lost the race against a concurrent signup with the same email.
            StoreError::Conflict(_) => api_conflict("email_exists", "email already registered"),
            other => api_internal("failed to create user", &other),
        })?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(&created))))
}
