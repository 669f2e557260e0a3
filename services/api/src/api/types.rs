//! HTTP API request/response types.
//!
//! # Purpose
//! Shared payload shapes for the REST API and OpenAPI schema generation.
//! Entity shapes (`Recipe`, `RecipeDetail`, ...) live in `model` and are used
//! directly as bodies; this module holds the payloads that exist only at the
//! HTTP boundary.
use crate::model::RecipeWithStats;
use crate::search::Pagination;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeListResponse {
    pub data: Vec<RecipeWithStats>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// The account email.
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    /// The token that was just blacklisted.
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RatingRequest {
    pub rating: u8,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CommentRequest {
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub api_version: String,
    pub store_backend: String,
    pub cache_backend: String,
}
