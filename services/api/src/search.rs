//! Recipe search: filter translation, rating statistics, and pagination.
//!
//! # Purpose
//! Translates a [`SearchFilters`] value into a deterministic two-pipeline
//! plan (page + count), both derived from the same predicate so the reported
//! total always agrees with the page contents. The pipeline is a pure tagged
//! structure; the store decides how to execute it.
//!
//! # Ordering
//! Pages are sorted by creation time descending only. Recipes created in the
//! same instant have unspecified relative order; that non-determinism is
//! accepted.
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::{Rating, Recipe, RecipeWithStats};

/// Pages are 1-based.
pub const DEFAULT_PAGE: u64 = 1;
/// Effectively unbounded: callers that do not paginate get everything.
pub const DEFAULT_LIMIT: u64 = 10_000_000;

/// Query parameters accepted by the recipe listing. Never persisted.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Comma-separated substrings, matched case-insensitively against each
    /// ingredient; OR semantics across terms.
    pub ingredients: Option<String>,
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Inclusive lower bound on the average rating.
    pub min_rating: Option<f64>,
    /// Inclusive upper bound on preparation time in minutes.
    pub max_preparation_time: Option<u32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl SearchFilters {
    pub fn page(&self) -> u64 {
        // Guard page 0: pages are 1-based, anything below clamps to the first.
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn min_rating(&self) -> f64 {
        self.min_rating.unwrap_or(0.0)
    }
}

/// Match-stage criteria, normalized for evaluation: terms are trimmed and
/// lowercased once here so the execution path only does substring checks.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCriteria {
    pub ingredient_terms: Vec<String>,
    pub title_term: Option<String>,
    pub max_preparation_time: Option<u32>,
}

/// Build the shared match criteria for a filter tuple.
///
/// Both pipelines go through this single function; that is what guarantees
/// the count pipeline and the page pipeline agree on the predicate.
pub fn match_criteria(filters: &SearchFilters) -> MatchCriteria {
    let ingredient_terms = filters
        .ingredients
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    let title_term = filters
        .title
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    MatchCriteria {
        ingredient_terms,
        title_term,
        max_preparation_time: filters.max_preparation_time,
    }
}

/// Whether a recipe passes the match stage.
pub fn criteria_matches(criteria: &MatchCriteria, recipe: &Recipe) -> bool {
    if !criteria.ingredient_terms.is_empty() {
        let any_term_matches = recipe.ingredients.iter().any(|ingredient| {
            let ingredient = ingredient.to_lowercase();
            criteria
                .ingredient_terms
                .iter()
                .any(|term| ingredient.contains(term))
        });
        if !any_term_matches {
            return false;
        }
    }

    if let Some(term) = &criteria.title_term {
        if !recipe.title.to_lowercase().contains(term) {
            return false;
        }
    }

    if let Some(bound) = criteria.max_preparation_time {
        // Recipes without a stated preparation time are excluded by a time
        // bound, matching an upper-bound comparison on an absent field.
        match recipe.preparation_time {
            Some(minutes) if minutes <= bound => {}
            _ => return false,
        }
    }

    true
}

/// Derived rating statistics for one recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub count: u64,
    pub average: f64,
}

/// Average of the embedded ratings, defined as 0 when there are none.
pub fn rating_stats(stars: &[Rating]) -> RatingStats {
    if stars.is_empty() {
        return RatingStats {
            count: 0,
            average: 0.0,
        };
    }
    let sum: u64 = stars.iter().map(|star| u64::from(star.rating)).sum();
    RatingStats {
        count: stars.len() as u64,
        average: sum as f64 / stars.len() as f64,
    }
}

/// Terminal stage of a pipeline: either a sorted page slice or a bare count.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputStage {
    Page { skip: u64, take: u64 },
    Count,
}

/// A complete, store-independent execution plan for one listing query.
#[derive(Debug, Clone)]
pub struct RecipePipeline {
    pub criteria: MatchCriteria,
    /// Inclusive lower bound applied to the derived average after the match
    /// stage.
    pub min_average_stars: f64,
    pub stage: OutputStage,
}

/// Plan producing the requested page, newest first.
pub fn page_pipeline(filters: &SearchFilters) -> RecipePipeline {
    let limit = filters.limit();
    RecipePipeline {
        criteria: match_criteria(filters),
        min_average_stars: filters.min_rating(),
        stage: OutputStage::Page {
            skip: (filters.page() - 1).saturating_mul(limit),
            take: limit,
        },
    }
}

/// Plan producing the total count under the same predicate as the page.
pub fn count_pipeline(filters: &SearchFilters) -> RecipePipeline {
    RecipePipeline {
        criteria: match_criteria(filters),
        min_average_stars: filters.min_rating(),
        stage: OutputStage::Count,
    }
}

/// Result of executing a pipeline.
#[derive(Debug)]
pub enum PipelineOutput {
    Page(Vec<RecipeWithStats>),
    Count(u64),
}

impl PipelineOutput {
    pub fn into_rows(self) -> Option<Vec<RecipeWithStats>> {
        match self {
            PipelineOutput::Page(rows) => Some(rows),
            PipelineOutput::Count(_) => None,
        }
    }

    pub fn into_total(self) -> Option<u64> {
        match self {
            PipelineOutput::Count(total) => Some(total),
            PipelineOutput::Page(_) => None,
        }
    }
}

/// Pagination summary composed alongside page data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn compute(total: u64, page: u64, limit: u64) -> Self {
        // limit 0 means "no pagination": no page math is meaningful, and the
        // division below must not run.
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// A page of results plus its pagination summary.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
