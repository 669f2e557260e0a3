//! Recipe-sharing data model.
//!
//! # Purpose
//! Re-exports the recipe and user entities, their embedded feedback records,
//! and the public projections used by the API and store layers.
mod recipe;
mod user;

pub use recipe::{
    Comment, CommentView, NewRecipe, Rating, RatingView, Recipe, RecipeDetail, RecipeWithStats,
};
pub use user::{NewUser, PublicUser, User};
