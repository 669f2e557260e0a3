//! Recipe service facade.
//!
//! # Purpose
//! Orchestrates the store, the cache, the feedback manager, and the upload
//! collaborator into the operations the HTTP layer consumes. Reads are
//! cache-aside with a bounded TTL; mutations write the store first and then
//! invalidate the affected cache keys.
//!
//! # Cache policy
//! The store is authoritative. Cache reads, writes, and deletes are
//! fire-and-check: a failing cache backend is logged and treated as a miss,
//! never as a request failure, and a cache delete failure does not roll back
//! the store write that preceded it. A crash between store write and cache
//! invalidation leaves a stale entry that heals at TTL expiry.
use crate::feedback::{FeedbackManager, FeedbackStatus};
use crate::model::{NewRecipe, Recipe, RecipeDetail, RecipeWithStats};
use crate::search::{self, Paginated, Pagination, SearchFilters};
use crate::store::{RecipeStore, StoreError};
use crate::upload::{ObjectStoreUploader, UploadError, UploadedImage};
use anyhow::anyhow;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tastytales_cache::{keys, CacheStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("recipe already rated")]
    AlreadyRated,
    #[error("{0}")]
    Invalid(String),
    #[error("recipe disappeared while saving feedback")]
    PersistenceRace,
    #[error("image not found")]
    ImageNotFound,
    #[error("image upload failed: {0}")]
    UploadFailed(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn CacheStore>,
    feedback: FeedbackManager,
    uploader: Arc<dyn ObjectStoreUploader>,
    cache_ttl: Duration,
}

impl RecipeService {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        cache: Arc<dyn CacheStore>,
        uploader: Arc<dyn ObjectStoreUploader>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            feedback: FeedbackManager::new(store.clone()),
            store,
            cache,
            uploader,
            cache_ttl,
        }
    }

    /// Create a recipe owned by `owner_id`.
    ///
    /// Every cached listing is invalidated: any filter combination might now
    /// include the new recipe.
    pub async fn add_recipe(
        &self,
        data: NewRecipe,
        owner_id: &str,
    ) -> Result<RecipeDetail, ServiceError> {
        let owner = self.store.find_user_by_id(owner_id).await?;
        if owner.is_none() {
            return Err(ServiceError::UserNotFound);
        }

        let created = self.store.create_recipe(data, owner_id).await?;
        self.cache_delete_prefix(keys::RECIPE_LIST_PREFIX).await;

        self.store
            .find_recipe_by_id(&created.id)
            .await?
            .ok_or(ServiceError::PersistenceRace)
    }

    /// Replace a recipe's fields. The recipe must exist *and* belong to
    /// `owner_id`; a mismatch looks exactly like absence so non-owners learn
    /// nothing.
    pub async fn update_recipe(
        &self,
        recipe_id: &str,
        data: NewRecipe,
        owner_id: &str,
    ) -> Result<RecipeDetail, ServiceError> {
        let existing = self
            .store
            .find_recipe_by_id_and_owner(recipe_id, owner_id)
            .await?;
        if existing.is_none() {
            return Err(ServiceError::RecipeNotFound);
        }

        let updated = self
            .store
            .update_recipe_by_id(recipe_id, data, owner_id)
            .await?
            .ok_or(ServiceError::RecipeNotFound)?;
        self.cache_delete(&keys::recipe_detail(&updated.id)).await;

        self.store
            .find_recipe_by_id(&updated.id)
            .await?
            .ok_or(ServiceError::PersistenceRace)
    }

    /// Cache-aside listing over the aggregation pipelines.
    pub async fn get_all_recipes(
        &self,
        filters: &SearchFilters,
    ) -> Result<Paginated<RecipeWithStats>, ServiceError> {
        let key = list_key(filters);
        if let Some(page) = self.cache_fetch::<Paginated<RecipeWithStats>>(&key).await {
            return Ok(page);
        }

        let page_plan = search::page_pipeline(filters);
        let count_plan = search::count_pipeline(filters);
        // The two pipelines have no ordering dependency; issue them together
        // and join before composing the response.
        let (page_output, count_output) = tokio::join!(
            self.store.run_aggregation(&page_plan),
            self.store.run_aggregation(&count_plan),
        );
        let data = page_output?
            .into_rows()
            .ok_or_else(|| StoreError::Unexpected(anyhow!("page pipeline returned a count")))?;
        let total = count_output?
            .into_total()
            .ok_or_else(|| StoreError::Unexpected(anyhow!("count pipeline returned rows")))?;

        let page = Paginated {
            data,
            pagination: Pagination::compute(total, filters.page(), filters.limit()),
        };
        self.cache_put(&key, &page).await;
        Ok(page)
    }

    /// Cache-aside single-recipe read with full expansion.
    pub async fn get_recipe(&self, recipe_id: &str) -> Result<RecipeDetail, ServiceError> {
        let key = keys::recipe_detail(recipe_id);
        if let Some(detail) = self.cache_fetch::<RecipeDetail>(&key).await {
            return Ok(detail);
        }

        let detail = self
            .store
            .find_recipe_by_id(recipe_id)
            .await?
            .ok_or(ServiceError::RecipeNotFound)?;
        self.cache_put(&key, &detail).await;
        Ok(detail)
    }

    /// Delete a recipe; only the owner's delete matches anything.
    pub async fn delete_recipe(&self, recipe_id: &str, owner_id: &str) -> Result<(), ServiceError> {
        let deleted = self
            .store
            .delete_recipe_by_id_and_owner(recipe_id, owner_id)
            .await?;
        if deleted.is_none() {
            return Err(ServiceError::RecipeNotFound);
        }
        self.cache_delete(&keys::recipe_detail(recipe_id)).await;
        Ok(())
    }

    /// Rate a recipe. On the already-rated conflict path nothing mutated,
    /// so the cache entry is deliberately left alone.
    pub async fn add_rating(
        &self,
        recipe_id: &str,
        user_id: &str,
        rating: u8,
    ) -> Result<Recipe, ServiceError> {
        let updated = self.feedback.add_rating(recipe_id, user_id, rating).await?;
        self.cache_delete(&keys::recipe_detail(recipe_id)).await;
        Ok(updated)
    }

    /// Comment on a recipe (last write from a user wins).
    pub async fn add_comment(
        &self,
        recipe_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Recipe, ServiceError> {
        let updated = self.feedback.add_comment(recipe_id, user_id, text).await?;
        self.cache_delete(&keys::recipe_detail(recipe_id)).await;
        Ok(updated)
    }

    pub async fn check_user_feedback(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> Result<FeedbackStatus, ServiceError> {
        self.feedback.check_user_feedback(recipe_id, user_id).await
    }

    /// Hand an image to the object-store collaborator and return its URL.
    pub async fn upload_image(
        &self,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<UploadedImage, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::ImageNotFound);
        }
        match self.uploader.upload(bytes, content_type).await {
            Ok(uploaded) => Ok(uploaded),
            Err(UploadError::UnsupportedContentType(kind)) => Err(ServiceError::Invalid(format!(
                "unsupported image content type: {kind}"
            ))),
            Err(UploadError::TooLarge) => {
                Err(ServiceError::Invalid("image too large".to_string()))
            }
            Err(err) => Err(ServiceError::UploadFailed(err.to_string())),
        }
    }

    async fn cache_fetch<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(%key, error = %err, "cache read failed; reading from store");
                metrics::counter!("tastytales_cache_errors_total", "op" => "get").increment(1);
                None
            }
        }?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                metrics::counter!("tastytales_cache_hits_total").increment(1);
                Some(value)
            }
            Err(err) => {
                // An undecodable entry is as good as a miss; drop it so the
                // next read repopulates.
                tracing::warn!(%key, error = %err, "discarding undecodable cache entry");
                self.cache_delete(key).await;
                None
            }
        }
    }

    async fn cache_put<T: Serialize>(&self, key: &str, value: &T) {
        metrics::counter!("tastytales_cache_misses_total").increment(1);
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::warn!(%key, error = %err, "skipping cache of unserializable value");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &serialized, self.cache_ttl).await {
            tracing::warn!(%key, error = %err, "cache write failed");
            metrics::counter!("tastytales_cache_errors_total", "op" => "set").increment(1);
        }
    }

    async fn cache_delete(&self, key: &str) {
        if let Err(err) = self.cache.delete(key).await {
            tracing::warn!(%key, error = %err, "cache invalidation failed; entry expires by TTL");
            metrics::counter!("tastytales_cache_errors_total", "op" => "delete").increment(1);
        }
    }

    async fn cache_delete_prefix(&self, prefix: &str) {
        if let Err(err) = self.cache.delete_prefix(prefix).await {
            tracing::warn!(%prefix, error = %err, "cache family invalidation failed; entries expire by TTL");
            metrics::counter!("tastytales_cache_errors_total", "op" => "delete_prefix").increment(1);
        }
    }
}

fn list_key(filters: &SearchFilters) -> String {
    keys::recipe_list(
        filters.ingredients.as_deref(),
        filters.title.as_deref(),
        filters.min_rating,
        filters.max_preparation_time,
        filters.page(),
        filters.limit(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_key_is_stable_for_equal_filters() {
        let filters = SearchFilters {
            ingredients: Some("egg".to_string()),
            title: None,
            min_rating: Some(2.0),
            max_preparation_time: None,
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(list_key(&filters), list_key(&filters.clone()));
    }

    #[test]
    fn list_key_defaults_match_default_pagination() {
        let key = list_key(&SearchFilters::default());
        assert!(key.ends_with(":1:10000000"));
    }
}
