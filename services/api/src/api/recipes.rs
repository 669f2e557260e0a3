//! Recipe API handlers.
//!
//! # Purpose
//! CRUD, search, feedback, and image upload endpoints. Handlers validate the
//! payload, then delegate to the service facade; every error path goes
//! through the shared `ServiceError` → `ApiError` mapping.
use crate::api::error::{api_validation_error, ApiError};
use crate::api::types::{CommentRequest, RatingRequest, RecipeListResponse, UploadImageResponse};
use crate::api::validate;
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::feedback::FeedbackStatus;
use crate::model::{NewRecipe, Recipe, RecipeDetail};
use crate::search::SearchFilters;
use crate::service::ServiceError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = NewRecipe,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDetail),
        (status = 400, description = "Invalid payload", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Owner not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn create_recipe(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<NewRecipe>,
) -> Result<impl IntoResponse, ApiError> {
    validate::recipe_body(&body).map_err(|message| api_validation_error(&message))?;
    let created = state.service.add_recipe(body, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(SearchFilters),
    responses(
        (status = 200, description = "Filtered, paginated recipes", body = RecipeListResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn list_recipes(
    AuthUser(_claims): AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let page = state.service.get_all_recipes(&filters).await?;
    Ok(Json(RecipeListResponse {
        data: page.data,
        pagination: page.pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{recipe_id}",
    tag = "recipes",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe with expanded owner and feedback", body = RecipeDetail),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn get_recipe(
    AuthUser(_claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let detail = state.service.get_recipe(&recipe_id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{recipe_id}",
    tag = "recipes",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    request_body = NewRecipe,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeDetail),
        (status = 400, description = "Invalid payload", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found or not owned", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn update_recipe(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(body): Json<NewRecipe>,
) -> Result<Json<RecipeDetail>, ApiError> {
    validate::recipe_body(&body).map_err(|message| api_validation_error(&message))?;
    let updated = state
        .service
        .update_recipe(&recipe_id, body, &claims.sub)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{recipe_id}",
    tag = "recipes",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found or not owned", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn delete_recipe(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_recipe(&recipe_id, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/recipes/rating/{recipe_id}",
    tag = "feedback",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = Recipe),
        (status = 400, description = "Invalid rating", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Recipe already rated by this user", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn add_rating(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(body): Json<RatingRequest>,
) -> Result<Json<Recipe>, ApiError> {
    validate::rating_body(&body).map_err(|message| api_validation_error(&message))?;
    let updated = state
        .service
        .add_rating(&recipe_id, &claims.sub, body.rating)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    put,
    path = "/api/recipes/comment/{recipe_id}",
    tag = "feedback",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment recorded (resubmission overwrites)", body = Recipe),
        (status = 400, description = "Invalid comment", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn add_comment(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(body): Json<CommentRequest>,
) -> Result<Json<Recipe>, ApiError> {
    validate::comment_body(&body).map_err(|message| api_validation_error(&message))?;
    let updated = state
        .service
        .add_comment(&recipe_id, &claims.sub, &body.comment)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/recipes/user-feedback/{recipe_id}",
    tag = "feedback",
    params(("recipe_id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Whether the caller rated or commented", body = FeedbackStatus),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn user_feedback(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<Json<FeedbackStatus>, ApiError> {
    let status = state
        .service
        .check_user_feedback(&recipe_id, &claims.sub)
        .await?;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/api/recipes/upload-image",
    tag = "recipes",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image under the `image` field"),
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Missing or invalid image", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse),
        (status = 502, description = "Object store failure", body = crate::api::types::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub(crate) async fn upload_image(
    AuthUser(_claims): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let mut image: Option<(Bytes, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| api_validation_error("failed to read multipart data"))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| api_validation_error("failed to read image data"))?;
        image = Some((bytes, content_type));
        break;
    }

    let (bytes, content_type) = image.ok_or(ServiceError::ImageNotFound)?;
    let uploaded = state.service.upload_image(bytes, &content_type).await?;
    Ok(Json(UploadImageResponse { url: uploaded.url }))
}
