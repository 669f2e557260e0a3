//! Recipe model, embedded feedback records, and read projections.
//!
//! # Purpose
//! Recipes own their ratings and comments as embedded records rather than
//! separate collections. That makes the whole recipe the atomicity unit for
//! feedback writes: append-or-overwrite happens on a loaded document, and
//! the document is saved back as one piece.
//!
//! # Key invariants
//! - At most one `Rating` per user on a recipe; ratings are final.
//! - At most one `Comment` per user on a recipe; resubmission overwrites.
//! - `owner` is immutable after creation; mutations filter by `(id, owner)`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PublicUser;

/// A single user's star rating, embedded in the recipe document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    /// User id; identity equality is what "already rated" means.
    pub user: String,
    /// Stars in `1..=5`.
    pub rating: u8,
}

/// A single user's comment, embedded in the recipe document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A recipe document as stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<String>,
    /// Minutes; absent means "not stated" and is excluded by time filters.
    pub preparation_time: Option<u32>,
    /// Owning user's id. Immutable after creation.
    pub owner: String,
    pub stars: Vec<Rating>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or fully replacing a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub preparation_time: Option<u32>,
}

/// A rating with its author expanded for responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatingView {
    pub user: PublicUser,
    pub rating: u8,
}

/// A comment with its author expanded for responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub user: PublicUser,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Single-recipe read shape: owner and feedback authors expanded, rating
/// statistics derived.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<String>,
    pub preparation_time: Option<u32>,
    pub owner: PublicUser,
    pub stars: Vec<RatingView>,
    pub comments: Vec<CommentView>,
    pub stars_count: u64,
    pub average_stars: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: owner expanded, rating statistics derived, feedback bodies
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWithStats {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<String>,
    pub preparation_time: Option<u32>,
    pub owner: PublicUser,
    pub stars_count: u64,
    pub average_stars: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
