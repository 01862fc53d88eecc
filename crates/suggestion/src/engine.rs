use crate::attributes::RecipeAttributes;
use crate::constraint::Constraint;
use crate::error::SuggestionError;
use crate::scoring::diversity_score;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

/// Page size used for unconstrained top-up fetches unless configured
/// otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Read access to the recipe catalog, the engine's only collaborator.
///
/// Implementations typically sit on a denormalized index of recipe
/// attributes; the engine only requires AND semantics for
/// `by_constraints` and a stable iteration order (the same input must
/// yield the same sequence) so that suggestions stay deterministic.
/// Errors are infrastructure failures and flow back to the caller
/// untouched.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Fetch full attributes for known recipe ids. Ids missing from the
    /// catalog are silently absent from the result.
    async fn resolve(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<RecipeAttributes>>;

    /// Recipes satisfying every constraint in the set. An empty set matches
    /// the whole catalog.
    async fn by_constraints(
        &self,
        constraints: &[Constraint],
    ) -> anyhow::Result<Vec<RecipeAttributes>>;

    /// Unconstrained paged fetch, excluding the given ids.
    async fn page(
        &self,
        excluding: &HashSet<String>,
        page_size: usize,
    ) -> anyhow::Result<Vec<RecipeAttributes>>;
}

/// One meal-plan suggestion request.
///
/// `constraints_per_day` holds one AND-combined constraint set per planning
/// day. `amount_to_suggest` arrives signed because transport layers hand us
/// whatever the wire carried; it is validated non-negative before the engine
/// does any work.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SuggestionRequest {
    #[validate(range(min = 0))]
    pub amount_to_suggest: i64,
    pub constraints_per_day: Vec<Vec<Constraint>>,
    pub already_selected: HashSet<String>,
}

/// Greedy, deterministic meal suggestion engine.
///
/// Holds no per-request state: every `suggest` call materializes its own
/// selected-set accumulator and drops it on return, so independent requests
/// can run concurrently against the same engine value.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    page_size: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        SuggestionEngine {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SuggestionEngine {
    pub fn new(page_size: usize) -> Self {
        SuggestionEngine { page_size }
    }

    /// Select an ordered list of recipe ids for the request.
    ///
    /// Day constraint sets are processed as a stack, most recently supplied
    /// day first; each day contributes at most the single candidate with
    /// the highest diversity score against everything selected so far (ties
    /// go to the earliest candidate in catalog order). Days whose
    /// constraints match nothing are skipped silently. Once the stack is
    /// exhausted, remaining slots are topped up from unconstrained catalog
    /// pages ranked by diversity. A catalog that runs dry ends the request
    /// early: under-fulfillment is a normal outcome, never an error.
    pub async fn suggest(
        &self,
        catalog: &dyn RecipeCatalog,
        request: SuggestionRequest,
    ) -> Result<Vec<String>, SuggestionError> {
        request.validate()?;
        let amount = request.amount_to_suggest as usize;

        // Materialize the pre-selected recipes so diversity is scored
        // against them from the first pick. Ids the catalog cannot resolve
        // still count for exclusion.
        let mut selected = catalog.resolve(&request.already_selected).await?;
        let mut selected_ids: HashSet<String> = request.already_selected.clone();
        selected_ids.extend(selected.iter().map(|r| r.id.clone()));

        let mut result: Vec<String> = Vec::new();
        let mut days = request.constraints_per_day;

        while result.len() < amount {
            let Some(constraints) = days.pop() else {
                break;
            };

            let candidates = catalog.by_constraints(&constraints).await?;

            let mut best: Option<(f32, RecipeAttributes)> = None;
            for candidate in candidates {
                if selected_ids.contains(&candidate.id) {
                    continue;
                }
                let score = diversity_score(&candidate, &selected);
                // Strict comparison keeps the first occurrence on ties.
                let is_better = match &best {
                    Some((top, _)) => score > *top,
                    None => true,
                };
                if is_better {
                    best = Some((score, candidate));
                }
            }

            match best {
                Some((score, pick)) => {
                    tracing::debug!(
                        recipe_id = %pick.id,
                        score,
                        days_left = days.len(),
                        "day pick"
                    );
                    result.push(pick.id.clone());
                    selected_ids.insert(pick.id.clone());
                    selected.push(pick);
                }
                None => {
                    tracing::debug!(days_left = days.len(), "no candidate for day, skipping");
                }
            }
        }

        // Top-up phase: fill the remainder from unconstrained pages.
        while result.len() < amount {
            let page = catalog.page(&selected_ids, self.page_size).await?;
            if page.is_empty() {
                break;
            }

            let mut ranked: Vec<(f32, RecipeAttributes)> = page
                .into_iter()
                .filter(|c| !selected_ids.contains(&c.id))
                .map(|c| (diversity_score(&c, &selected), c))
                .collect();
            if ranked.is_empty() {
                // Catalog returned nothing new despite the exclusion list;
                // treat as exhausted rather than loop on the same page.
                break;
            }

            // Stable sort: ties keep catalog iteration order.
            ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

            for (_, pick) in ranked {
                if result.len() >= amount {
                    break;
                }
                result.push(pick.id.clone());
                selected_ids.insert(pick.id.clone());
                selected.push(pick);
            }
        }

        if result.len() < amount {
            tracing::debug!(
                requested = amount,
                suggested = result.len(),
                "catalog exhausted before request was filled"
            );
        }

        Ok(result)
    }
}
