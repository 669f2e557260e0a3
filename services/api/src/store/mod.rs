//! Typed storage contract for recipes and users.
//!
//! # Purpose
//! The service layer depends on this trait, not on a concrete database.
//! Absence is data, not failure: every lookup returns `Ok(None)` for a
//! missing or not-owned document, and callers must explicit-check. `Err` is
//! reserved for infrastructure problems and constraint violations.
use crate::model::{NewRecipe, NewUser, Recipe, RecipeDetail, User};
use crate::search::{PipelineOutput, RecipePipeline};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid document: {0}")]
    Invalid(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_user_by_id(&self, user_id: &str) -> StoreResult<Option<User>>;

    /// Email lookup is case-insensitive; the stored casing is preserved.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn create_recipe(&self, recipe: NewRecipe, owner_id: &str) -> StoreResult<Recipe>;

    /// Single-recipe read with owner and feedback authors expanded.
    async fn find_recipe_by_id(&self, recipe_id: &str) -> StoreResult<Option<RecipeDetail>>;

    /// The full document, unexpanded, for read-modify-write feedback flows.
    async fn load_recipe(&self, recipe_id: &str) -> StoreResult<Option<Recipe>>;

    /// Lookup filtered jointly by `(id, owner)`; an ownership mismatch is
    /// indistinguishable from absence.
    async fn find_recipe_by_id_and_owner(
        &self,
        recipe_id: &str,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>>;

    /// Full replace of the mutable fields, filtered by `(id, owner)`.
    async fn update_recipe_by_id(
        &self,
        recipe_id: &str,
        update: NewRecipe,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>>;

    async fn delete_recipe_by_id_and_owner(
        &self,
        recipe_id: &str,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>>;

    /// Whole-document save used by feedback mutations. Re-validates the
    /// embedded-array invariants; returns `Ok(None)` when the document
    /// vanished between load and save.
    async fn save_recipe(&self, recipe: Recipe) -> StoreResult<Option<Recipe>>;

    /// Execute a listing pipeline built by [`crate::search`].
    async fn run_aggregation(&self, pipeline: &RecipePipeline) -> StoreResult<PipelineOutput>;

    async fn health_check(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}
