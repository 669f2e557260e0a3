//! In-memory implementation of the recipe store.
//!
//! # Purpose
//! Implements `RecipeStore` entirely in memory using `HashMap`s guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: reads take read locks, mutations take
//!   write locks, so each operation observes a consistent document set.
//!
//! # Aggregation
//! Listing pipelines built by [`crate::search`] are executed here: the match
//! predicate and rating statistics are evaluated per document, then the
//! terminal stage either counts or sorts/slices. Both pipeline shapes share
//! the same evaluation path, which keeps page and count consistent.
use super::{RecipeStore, StoreError, StoreResult};
use crate::model::{
    CommentView, NewRecipe, NewUser, PublicUser, RatingView, Recipe, RecipeDetail,
    RecipeWithStats, User,
};
use crate::search::{self, OutputStage, PipelineOutput, RatingStats, RecipePipeline};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory recipe/user store.
///
/// Maps are wrapped in `RwLock` so the store can sit behind an `Arc` shared
/// across request handlers: reads proceed concurrently, writes serialize.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, User>>,
    recipes: RwLock<HashMap<String, Recipe>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn expand_owner(users: &HashMap<String, User>, owner_id: &str) -> StoreResult<PublicUser> {
    users
        .get(owner_id)
        .map(PublicUser::from)
        .ok_or_else(|| StoreError::Unexpected(anyhow!("dangling user reference: {owner_id}")))
}

fn expand_detail(
    users: &HashMap<String, User>,
    recipe: &Recipe,
    stats: RatingStats,
) -> StoreResult<RecipeDetail> {
    let stars = recipe
        .stars
        .iter()
        .map(|star| {
            Ok(RatingView {
                user: expand_owner(users, &star.user)?,
                rating: star.rating,
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;
    let comments = recipe
        .comments
        .iter()
        .map(|comment| {
            Ok(CommentView {
                user: expand_owner(users, &comment.user)?,
                text: comment.text.clone(),
                created_at: comment.created_at,
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;
    Ok(RecipeDetail {
        id: recipe.id.clone(),
        title: recipe.title.clone(),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        image: recipe.image.clone(),
        preparation_time: recipe.preparation_time,
        owner: expand_owner(users, &recipe.owner)?,
        stars,
        comments,
        stars_count: stats.count,
        average_stars: stats.average,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

fn project_row(
    users: &HashMap<String, User>,
    recipe: &Recipe,
    stats: RatingStats,
) -> StoreResult<RecipeWithStats> {
    Ok(RecipeWithStats {
        id: recipe.id.clone(),
        title: recipe.title.clone(),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        image: recipe.image.clone(),
        preparation_time: recipe.preparation_time,
        owner: expand_owner(users, &recipe.owner)?,
        stars_count: stats.count,
        average_stars: stats.average,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

// Embedded-array invariants checked on every whole-document save.
fn validate_embedded(recipe: &Recipe) -> StoreResult<()> {
    for star in &recipe.stars {
        if !(1..=5).contains(&star.rating) {
            return Err(StoreError::Invalid(format!(
                "rating {} out of range 1..=5",
                star.rating
            )));
        }
    }
    let mut raters: Vec<&str> = recipe.stars.iter().map(|star| star.user.as_str()).collect();
    raters.sort_unstable();
    if raters.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(StoreError::Invalid(
            "more than one rating from the same user".to_string(),
        ));
    }
    let mut commenters: Vec<&str> = recipe
        .comments
        .iter()
        .map(|comment| comment.user.as_str())
        .collect();
    commenters.sort_unstable();
    if commenters.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(StoreError::Invalid(
            "more than one comment from the same user".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn find_user_by_id(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4().to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id.clone(), created.clone());
        metrics::gauge!("tastytales_users_total").set(users.len() as f64);
        Ok(created)
    }

    async fn create_recipe(&self, recipe: NewRecipe, owner_id: &str) -> StoreResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        let now = Utc::now();
        let created = Recipe {
            id: Uuid::new_v4().to_string(),
            title: recipe.title,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            image: recipe.image,
            preparation_time: recipe.preparation_time,
            owner: owner_id.to_string(),
            stars: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        recipes.insert(created.id.clone(), created.clone());
        metrics::counter!("tastytales_recipe_changes_total", "op" => "created").increment(1);
        metrics::gauge!("tastytales_recipes_total").set(recipes.len() as f64);
        Ok(created)
    }

    async fn find_recipe_by_id(&self, recipe_id: &str) -> StoreResult<Option<RecipeDetail>> {
        let recipes = self.recipes.read().await;
        let Some(recipe) = recipes.get(recipe_id) else {
            return Ok(None);
        };
        let users = self.users.read().await;
        let stats = search::rating_stats(&recipe.stars);
        expand_detail(&users, recipe, stats).map(Some)
    }

    async fn load_recipe(&self, recipe_id: &str) -> StoreResult<Option<Recipe>> {
        Ok(self.recipes.read().await.get(recipe_id).cloned())
    }

    async fn find_recipe_by_id_and_owner(
        &self,
        recipe_id: &str,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>> {
        Ok(self
            .recipes
            .read()
            .await
            .get(recipe_id)
            .filter(|recipe| recipe.owner == owner_id)
            .cloned())
    }

    async fn update_recipe_by_id(
        &self,
        recipe_id: &str,
        update: NewRecipe,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        let Some(recipe) = recipes
            .get_mut(recipe_id)
            .filter(|recipe| recipe.owner == owner_id)
        else {
            return Ok(None);
        };
        recipe.title = update.title;
        recipe.ingredients = update.ingredients;
        recipe.steps = update.steps;
        recipe.image = update.image;
        recipe.preparation_time = update.preparation_time;
        recipe.updated_at = Utc::now();
        metrics::counter!("tastytales_recipe_changes_total", "op" => "updated").increment(1);
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe_by_id_and_owner(
        &self,
        recipe_id: &str,
        owner_id: &str,
    ) -> StoreResult<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        let owned = recipes
            .get(recipe_id)
            .map(|recipe| recipe.owner == owner_id)
            .unwrap_or(false);
        if !owned {
            return Ok(None);
        }
        let removed = recipes.remove(recipe_id);
        metrics::counter!("tastytales_recipe_changes_total", "op" => "deleted").increment(1);
        metrics::gauge!("tastytales_recipes_total").set(recipes.len() as f64);
        Ok(removed)
    }

    async fn save_recipe(&self, mut recipe: Recipe) -> StoreResult<Option<Recipe>> {
        validate_embedded(&recipe)?;
        let mut recipes = self.recipes.write().await;
        if !recipes.contains_key(&recipe.id) {
            // The document vanished between load and save; the caller decides
            // what that means.
            return Ok(None);
        }
        recipe.updated_at = Utc::now();
        recipes.insert(recipe.id.clone(), recipe.clone());
        metrics::counter!("tastytales_recipe_changes_total", "op" => "saved").increment(1);
        Ok(Some(recipe))
    }

    async fn run_aggregation(&self, pipeline: &RecipePipeline) -> StoreResult<PipelineOutput> {
        let recipes = self.recipes.read().await;
        let mut matched: Vec<(&Recipe, RatingStats)> = recipes
            .values()
            .filter(|recipe| search::criteria_matches(&pipeline.criteria, recipe))
            .map(|recipe| (recipe, search::rating_stats(&recipe.stars)))
            .filter(|(_, stats)| stats.average >= pipeline.min_average_stars)
            .collect();

        match pipeline.stage {
            OutputStage::Count => Ok(PipelineOutput::Count(matched.len() as u64)),
            OutputStage::Page { skip, take } => {
                // Creation time descending; equal instants stay in whatever
                // order the scan produced.
                matched.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
                let users = self.users.read().await;
                let rows = matched
                    .into_iter()
                    .skip(skip as usize)
                    .take(take as usize)
                    .map(|(recipe, stats)| project_row(&users, recipe, stats))
                    .collect::<StoreResult<Vec<_>>>()?;
                Ok(PipelineOutput::Page(rows))
            }
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always healthy while the process runs.
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
