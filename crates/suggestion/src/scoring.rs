use crate::attributes::RecipeAttributes;

/// Weight added when two recipes share a cuisine.
pub const CUISINE_WEIGHT: f32 = 0.25;
/// Weight added when two recipes share a main ingredient.
pub const MAIN_INGREDIENT_WEIGHT: f32 = 0.25;

/// Similarity between two recipes from shared cuisine, shared main
/// ingredient and ingredient-set overlap.
///
/// The overlap term is an overlap coefficient (intersection over the
/// smaller set), not a Jaccard index, and the total is not clamped: two
/// recipes with equal cuisine, equal main ingredient and identical
/// ingredient sets score 1.5. Downstream ranking only compares scores, so
/// the inflated upper bound is harmless and is kept as-is.
pub fn similarity(a: &RecipeAttributes, b: &RecipeAttributes) -> f32 {
    let mut score = 0.0;

    if let (Some(ca), Some(cb)) = (a.cuisine_id.as_deref(), b.cuisine_id.as_deref()) {
        if ca == cb {
            score += CUISINE_WEIGHT;
        }
    }

    if let (Some(ma), Some(mb)) = (
        a.main_ingredient_id.as_deref(),
        b.main_ingredient_id.as_deref(),
    ) {
        if ma == mb {
            score += MAIN_INGREDIENT_WEIGHT;
        }
    }

    let smaller = a.ingredient_ids.len().min(b.ingredient_ids.len());
    if smaller > 0 {
        let shared = a.ingredient_ids.intersection(&b.ingredient_ids).count();
        score += shared as f32 / smaller as f32;
    }

    score
}

/// Diversity of a candidate relative to the recipes already selected.
///
/// `1.0` when nothing has been selected yet, otherwise one minus the mean
/// similarity against the selected set. Because similarity is uncapped the
/// result can go negative; ordering, not magnitude, is what the engine
/// uses.
pub fn diversity_score(candidate: &RecipeAttributes, selected: &[RecipeAttributes]) -> f32 {
    if selected.is_empty() {
        return 1.0;
    }

    let total: f32 = selected.iter().map(|s| similarity(candidate, s)).sum();
    1.0 - total / selected.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn recipe(
        id: &str,
        cuisine: Option<&str>,
        main: Option<&str>,
        ingredients: &[&str],
    ) -> RecipeAttributes {
        RecipeAttributes {
            id: id.to_string(),
            cuisine_id: cuisine.map(str::to_string),
            main_ingredient_id: main.map(str::to_string),
            ingredient_ids: ingredients.iter().map(|s| s.to_string()).collect(),
            allergy_ids: HashSet::new(),
        }
    }

    #[test]
    fn test_similarity_shared_cuisine_and_main_disjoint_ingredients() {
        // Scenario: identical cuisine and main ingredient, disjoint sets.
        let a = recipe("a", Some("italian"), Some("tomato"), &["tomato", "basil"]);
        let b = recipe("b", Some("italian"), Some("tomato"), &["beef", "onion"]);

        assert_eq!(similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_similarity_absent_fields_add_nothing() {
        let a = recipe("a", None, None, &[]);
        let b = recipe("b", Some("italian"), Some("tomato"), &["tomato"]);

        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_similarity_overlap_divides_by_smaller_set() {
        // Intersection of 1 over min(1, 3) = 1.0, not 1/3 as Jaccard would give.
        let a = recipe("a", None, None, &["tomato"]);
        let b = recipe("b", None, None, &["tomato", "basil", "onion"]);

        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_similarity_is_uncapped() {
        let a = recipe("a", Some("italian"), Some("tomato"), &["tomato", "basil"]);
        let b = recipe("b", Some("italian"), Some("tomato"), &["tomato", "basil"]);

        assert_eq!(similarity(&a, &b), 1.5);
    }

    #[test]
    fn test_similarity_empty_ingredient_set_contributes_zero() {
        // min(|a|, |b|) = 0 must not divide.
        let a = recipe("a", Some("italian"), None, &[]);
        let b = recipe("b", Some("italian"), None, &["tomato"]);

        assert_eq!(similarity(&a, &b), 0.25);
    }

    #[test]
    fn test_diversity_empty_selected_is_one() {
        let candidate = recipe("a", Some("thai"), Some("rice"), &["rice"]);
        assert_eq!(diversity_score(&candidate, &[]), 1.0);
    }

    #[test]
    fn test_diversity_against_single_twin() {
        let candidate = recipe("a", Some("italian"), Some("tomato"), &["tomato", "basil"]);
        let selected = vec![recipe("b", Some("italian"), Some("tomato"), &["beef", "rice"])];

        assert_eq!(diversity_score(&candidate, &selected), 0.5);
    }

    #[test]
    fn test_diversity_can_go_negative() {
        let candidate = recipe("a", Some("italian"), Some("tomato"), &["tomato", "basil"]);
        let selected = vec![recipe("b", Some("italian"), Some("tomato"), &["tomato", "basil"])];

        assert_eq!(diversity_score(&candidate, &selected), -0.5);
    }

    #[test]
    fn test_diversity_averages_over_selected() {
        let candidate = recipe("a", Some("italian"), None, &[]);
        let selected = vec![
            recipe("b", Some("italian"), None, &[]), // similarity 0.25
            recipe("c", Some("thai"), None, &[]),    // similarity 0.0
        ];

        assert_eq!(diversity_score(&candidate, &selected), 1.0 - 0.125);
    }
}
