pub mod attributes;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod scoring;

pub use attributes::RecipeAttributes;
pub use constraint::{AllergySemantics, Constraint, ConstraintKind, matches, matches_with};
pub use engine::{DEFAULT_PAGE_SIZE, RecipeCatalog, SuggestionEngine, SuggestionRequest};
pub use error::SuggestionError;
