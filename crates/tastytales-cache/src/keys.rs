//! Deterministic cache-key construction.
//!
//! Keys compose the operation name with every parameter value in a fixed
//! field order, substituting the literal `"all"` for unset optional
//! parameters. Identical parameter tuples therefore always hit the same key,
//! and the separator is escaped inside values so distinct tuples can never
//! alias each other.

/// Prefix shared by every cached recipe listing, regardless of filters.
pub const RECIPE_LIST_PREFIX: &str = "recipes:all:";

const UNSET: &str = "all";

/// Key for a cached recipe listing under the given filter tuple.
pub fn recipe_list(
    ingredients: Option<&str>,
    title: Option<&str>,
    min_rating: Option<f64>,
    max_preparation_time: Option<u32>,
    page: u64,
    limit: u64,
) -> String {
    format!(
        "{}{}:{}:{}:{}:{}:{}",
        RECIPE_LIST_PREFIX,
        component(ingredients.unwrap_or(UNSET)),
        component(title.unwrap_or(UNSET)),
        min_rating.map_or_else(|| UNSET.to_string(), |value| value.to_string()),
        max_preparation_time.map_or_else(|| UNSET.to_string(), |value| value.to_string()),
        page,
        limit,
    )
}

/// Key for a cached single-recipe read.
pub fn recipe_detail(recipe_id: &str) -> String {
    format!("recipes:id:{}", component(recipe_id))
}

/// Key under which a blacklisted token digest is stored.
pub fn auth_blacklist(token_digest: &str) -> String {
    format!("auth:blacklist:{token_digest}")
}

// Escape the separator so a value containing ':' cannot collide with the
// field boundaries of another tuple.
fn component(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace(':', "\\:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_filters_produce_identical_keys() {
        let a = recipe_list(Some("egg,flour"), Some("cake"), Some(3.0), Some(45), 2, 10);
        let b = recipe_list(Some("egg,flour"), Some("cake"), Some(3.0), Some(45), 2, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn unset_parameters_use_the_all_sentinel() {
        let key = recipe_list(None, None, None, None, 1, 10_000_000);
        assert_eq!(key, "recipes:all:all:all:all:all:1:10000000");
    }

    #[test]
    fn distinct_filters_never_alias() {
        let by_title = recipe_list(None, Some("soup"), None, None, 1, 10);
        let by_ingredients = recipe_list(Some("soup"), None, None, None, 1, 10);
        assert_ne!(by_title, by_ingredients);

        // A crafted ':' inside a value must not collide with field boundaries.
        let crafted = recipe_list(Some("a:b"), None, None, None, 1, 10);
        let split = recipe_list(Some("a"), Some("b"), None, None, 1, 10);
        assert_ne!(crafted, split);
    }

    #[test]
    fn list_keys_share_the_family_prefix() {
        let key = recipe_list(Some("egg"), None, None, None, 1, 10);
        assert!(key.starts_with(RECIPE_LIST_PREFIX));
    }

    #[test]
    fn detail_and_blacklist_keys_are_scoped() {
        assert_eq!(recipe_detail("r1"), "recipes:id:r1");
        assert_eq!(auth_blacklist("abc123"), "auth:blacklist:abc123");
    }
}
