use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggestionError {
    /// Request failed precondition validation before any catalog call.
    #[error("invalid suggestion request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// Catalog failure, passed through untouched. The engine never retries;
    /// retries, if any, belong to the catalog collaborator.
    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}
