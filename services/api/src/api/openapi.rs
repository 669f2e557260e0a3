//! OpenAPI schema aggregation.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    auth, recipes, system,
    types::{
        CommentRequest, ErrorResponse, HealthStatus, LoginRequest, LoginResponse, LogoutResponse,
        RatingRequest, RecipeListResponse, SignupRequest, SystemInfo, UploadImageResponse,
    },
    users,
};
use crate::feedback::FeedbackStatus;
use crate::model::{
    Comment, CommentView, NewRecipe, PublicUser, Rating, RatingView, Recipe, RecipeDetail,
    RecipeWithStats,
};
use crate::search::Pagination;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tastytales",
        version = "v1",
        description = "Recipe sharing HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        users::signup,
        auth::login,
        auth::logout,
        recipes::create_recipe,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::add_rating,
        recipes::add_comment,
        recipes::user_feedback,
        recipes::upload_image
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        SystemInfo,
        SignupRequest,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        RatingRequest,
        CommentRequest,
        UploadImageResponse,
        PublicUser,
        Rating,
        Comment,
        RatingView,
        CommentView,
        Recipe,
        NewRecipe,
        RecipeDetail,
        RecipeWithStats,
        Pagination,
        RecipeListResponse,
        FeedbackStatus
    )),
    tags(
        (name = "system", description = "Service metadata and health"),
        (name = "users", description = "Account signup"),
        (name = "auth", description = "Login and logout"),
        (name = "recipes", description = "Recipe CRUD and search"),
        (name = "feedback", description = "Ratings and comments")
    )
)]
pub struct ApiDoc;
