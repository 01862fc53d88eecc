use async_trait::async_trait;
use platewise_suggestion::{
    Constraint, RecipeAttributes, RecipeCatalog, SuggestionEngine, SuggestionError,
    SuggestionRequest, matches,
};
use std::collections::HashSet;

/// In-memory catalog over a fixed recipe list, in insertion order.
struct StubCatalog {
    recipes: Vec<RecipeAttributes>,
    fail: bool,
}

impl StubCatalog {
    fn new(recipes: Vec<RecipeAttributes>) -> Self {
        StubCatalog {
            recipes,
            fail: false,
        }
    }

    fn failing() -> Self {
        StubCatalog {
            recipes: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl RecipeCatalog for StubCatalog {
    async fn resolve(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<RecipeAttributes>> {
        if self.fail {
            anyhow::bail!("catalog unavailable");
        }

        Ok(self
            .recipes
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn by_constraints(
        &self,
        constraints: &[Constraint],
    ) -> anyhow::Result<Vec<RecipeAttributes>> {
        if self.fail {
            anyhow::bail!("catalog unavailable");
        }

        Ok(self
            .recipes
            .iter()
            .filter(|r| matches(r, constraints))
            .cloned()
            .collect())
    }

    async fn page(
        &self,
        excluding: &HashSet<String>,
        page_size: usize,
    ) -> anyhow::Result<Vec<RecipeAttributes>> {
        if self.fail {
            anyhow::bail!("catalog unavailable");
        }

        Ok(self
            .recipes
            .iter()
            .filter(|r| !excluding.contains(&r.id))
            .take(page_size)
            .cloned()
            .collect())
    }
}

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

fn ids(values: &[&str]) -> HashSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_single_suggestion_with_empty_selected_set() -> anyhow::Result<()> {
    // Five recipes, two sharing a cuisine; with nothing selected yet every
    // candidate scores 1.0, so the first recipe in catalog order wins.
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("italian"), Some("tomato"), &["tomato"]),
        recipe("r2", Some("italian"), Some("beef"), &["beef"]),
        recipe("r3", Some("thai"), Some("rice"), &["rice"]),
        recipe("r4", Some("mexican"), Some("corn"), &["corn"]),
        recipe("r5", Some("french"), Some("butter"), &["butter"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 1,
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(result, vec!["r1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_unmatched_day_falls_through_to_top_up() -> anyhow::Result<()> {
    // No Italian recipe exists: the day contributes nothing and the
    // remainder comes from the unconstrained catalog.
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("thai"), Some("rice"), &["rice"]),
        recipe("r2", Some("mexican"), Some("corn"), &["corn"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 2,
                constraints_per_day: vec![vec![Constraint::Cuisine("italian".to_string())]],
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(result.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_under_fulfillment_is_not_an_error() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("thai"), Some("rice"), &["rice"]),
        recipe("r2", Some("mexican"), Some("corn"), &["corn"]),
        recipe("r3", Some("french"), Some("butter"), &["butter"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 10,
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(result.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_days_are_processed_in_reverse_input_order() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("r_ita", Some("italian"), Some("tomato"), &["tomato"]),
        recipe("r_thai", Some("thai"), Some("rice"), &["rice"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 2,
                constraints_per_day: vec![
                    vec![Constraint::Cuisine("italian".to_string())],
                    vec![Constraint::Cuisine("thai".to_string())],
                ],
                ..Default::default()
            },
        )
        .await?;

    // The last supplied day is attempted first.
    assert_eq!(result, vec!["r_thai".to_string(), "r_ita".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_day_constraints_are_and_combined() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        // Matches the cuisine constraint only.
        recipe("r1", Some("italian"), Some("tomato"), &["tomato"]),
        // Matches both.
        recipe("r2", Some("italian"), Some("beef"), &["beef", "onion"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 1,
                constraints_per_day: vec![vec![
                    Constraint::Cuisine("italian".to_string()),
                    Constraint::Ingredient("beef".to_string()),
                ]],
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(result, vec!["r2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_day_pick_maximizes_diversity_against_selected() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("already", Some("italian"), Some("tomato"), &["tomato", "basil"]),
        // Near-twin of the already selected recipe.
        recipe("twin", Some("italian"), Some("tomato"), &["tomato", "basil"]),
        recipe("distinct", Some("thai"), Some("rice"), &["rice", "chili"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 1,
                constraints_per_day: vec![vec![]],
                already_selected: ids(&["already"]),
            },
        )
        .await?;

    assert_eq!(result, vec!["distinct".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_top_up_ranks_page_by_descending_diversity() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("already", Some("italian"), Some("tomato"), &["tomato", "basil"]),
        // similarity 0.5 -> diversity 0.5
        recipe("b", Some("italian"), Some("tomato"), &["penne", "garlic"]),
        // similarity 0.0 -> diversity 1.0
        recipe("c", Some("thai"), Some("rice"), &["rice", "chili"]),
        // similarity 0.75 -> diversity 0.25
        recipe("d", Some("italian"), Some("rice"), &["rice", "basil"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 3,
                already_selected: ids(&["already"]),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(
        result,
        vec!["c".to_string(), "b".to_string(), "d".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_equal_scores_resolve_to_first_catalog_occurrence() -> anyhow::Result<()> {
    // Both candidates are equally diverse; the earlier one must win, both
    // for the day pick and across repeated runs.
    let catalog = StubCatalog::new(vec![
        recipe("first", Some("thai"), Some("rice"), &["rice"]),
        recipe("second", Some("thai"), Some("rice"), &["rice"]),
    ]);

    let request = SuggestionRequest {
        amount_to_suggest: 1,
        constraints_per_day: vec![vec![Constraint::Cuisine("thai".to_string())]],
        ..Default::default()
    };

    let result = SuggestionEngine::default()
        .suggest(&catalog, request.clone())
        .await?;
    assert_eq!(result, vec!["first".to_string()]);

    let again = SuggestionEngine::default().suggest(&catalog, request).await?;
    assert_eq!(again, result);
    Ok(())
}

#[tokio::test]
async fn test_no_duplicates_and_already_selected_stays_excluded() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("italian"), Some("tomato"), &["tomato"]),
        recipe("r2", Some("thai"), Some("rice"), &["rice"]),
        recipe("r3", Some("mexican"), Some("corn"), &["corn"]),
    ]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 10,
                constraints_per_day: vec![
                    vec![Constraint::Cuisine("thai".to_string())],
                    vec![Constraint::Cuisine("thai".to_string())],
                ],
                // "gone" no longer resolves but must still be excluded.
                already_selected: ids(&["r1", "gone"]),
            },
        )
        .await?;

    let unique: HashSet<&String> = result.iter().collect();
    assert_eq!(unique.len(), result.len());
    assert!(!result.contains(&"r1".to_string()));
    assert!(!result.contains(&"gone".to_string()));
    assert_eq!(result.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_zero_amount_returns_empty() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![recipe("r1", Some("thai"), Some("rice"), &["rice"])]);

    let result = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 0,
                constraints_per_day: vec![vec![Constraint::Cuisine("thai".to_string())]],
                ..Default::default()
            },
        )
        .await?;

    assert!(result.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_negative_amount_is_rejected_before_any_catalog_call() {
    // A failing catalog proves validation happens first.
    let catalog = StubCatalog::failing();

    let err = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: -1,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SuggestionError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_catalog_failure_propagates_unchanged() {
    let catalog = StubCatalog::failing();

    let err = SuggestionEngine::default()
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        SuggestionError::Catalog(e) => assert_eq!(e.to_string(), "catalog unavailable"),
        other => panic!("expected catalog error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_top_up_pages_until_amount_reached() -> anyhow::Result<()> {
    // Page size 1 forces one fetch per pick; exclusion must advance the
    // page window each time.
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("thai"), Some("rice"), &["rice"]),
        recipe("r2", Some("mexican"), Some("corn"), &["corn"]),
        recipe("r3", Some("french"), Some("butter"), &["butter"]),
        recipe("r4", Some("italian"), Some("tomato"), &["tomato"]),
    ]);

    let result = SuggestionEngine::new(1)
        .suggest(
            &catalog,
            SuggestionRequest {
                amount_to_suggest: 3,
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(
        result,
        vec!["r1".to_string(), "r2".to_string(), "r3".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_deterministic_across_runs() -> anyhow::Result<()> {
    let catalog = StubCatalog::new(vec![
        recipe("r1", Some("italian"), Some("tomato"), &["tomato", "basil"]),
        recipe("r2", Some("italian"), Some("beef"), &["beef", "onion"]),
        recipe("r3", Some("thai"), Some("rice"), &["rice", "chili"]),
        recipe("r4", Some("mexican"), Some("corn"), &["corn", "beans"]),
    ]);

    let request = SuggestionRequest {
        amount_to_suggest: 4,
        constraints_per_day: vec![
            vec![Constraint::Cuisine("italian".to_string())],
            vec![Constraint::Ingredient("rice".to_string())],
        ],
        ..Default::default()
    };

    let first = SuggestionEngine::default()
        .suggest(&catalog, request.clone())
        .await?;
    let second = SuggestionEngine::default()
        .suggest(&catalog, request)
        .await?;

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
    Ok(())
}
