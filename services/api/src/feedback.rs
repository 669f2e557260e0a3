//! Ratings and comments on recipes.
//!
//! # Purpose
//! Enforces the at-most-one-rating / at-most-one-comment per `(recipe, user)`
//! invariants with find-or-append semantics over the embedded arrays, then
//! persists with an optimistic whole-document save. Ratings are final:
//! a second rating from the same user is a conflict, not an update. Comments
//! are last-write-wins.
use crate::model::{Comment, Rating, Recipe};
use crate::service::ServiceError;
use crate::store::RecipeStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Read-only summary of one user's feedback on one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatus {
    pub user_commented: bool,
    pub user_rated: bool,
    pub comment: Option<Comment>,
    pub rating: Option<Rating>,
}

pub struct FeedbackManager {
    store: Arc<dyn RecipeStore>,
}

impl FeedbackManager {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Record a rating. Fails with `AlreadyRated` when the user has rated
    /// this recipe before; the stored rating is left untouched.
    pub async fn add_rating(
        &self,
        recipe_id: &str,
        user_id: &str,
        rating: u8,
    ) -> Result<Recipe, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::Invalid(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        let mut recipe = self
            .store
            .load_recipe(recipe_id)
            .await?
            .ok_or(ServiceError::RecipeNotFound)?;

        if recipe.stars.iter().any(|star| star.user == user_id) {
            return Err(ServiceError::AlreadyRated);
        }
        recipe.stars.push(Rating {
            user: user_id.to_string(),
            rating,
        });

        self.store
            .save_recipe(recipe)
            .await?
            .ok_or(ServiceError::PersistenceRace)
    }

    /// Record or overwrite the user's comment on a recipe.
    pub async fn add_comment(
        &self,
        recipe_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Recipe, ServiceError> {
        let mut recipe = self
            .store
            .load_recipe(recipe_id)
            .await?
            .ok_or(ServiceError::RecipeNotFound)?;

        if let Some(existing) = recipe
            .comments
            .iter_mut()
            .find(|comment| comment.user == user_id)
        {
            // Last write wins; the original timestamp is kept.
            existing.text = text.to_string();
        } else {
            recipe.comments.push(Comment {
                user: user_id.to_string(),
                text: text.to_string(),
                created_at: Utc::now(),
            });
        }

        self.store
            .save_recipe(recipe)
            .await?
            .ok_or(ServiceError::PersistenceRace)
    }

    /// Whether (and how) a user has already rated or commented. Never mutates.
    pub async fn check_user_feedback(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> Result<FeedbackStatus, ServiceError> {
        let recipe = self
            .store
            .load_recipe(recipe_id)
            .await?
            .ok_or(ServiceError::RecipeNotFound)?;

        let comment = recipe
            .comments
            .iter()
            .find(|comment| comment.user == user_id)
            .cloned();
        let rating = recipe.stars.iter().find(|star| star.user == user_id).cloned();

        Ok(FeedbackStatus {
            user_commented: comment.is_some(),
            user_rated: rating.is_some(),
            comment,
            rating,
        })
    }
}
