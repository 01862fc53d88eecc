use platewise_suggestion::{Constraint, ConstraintKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DaySpecError {
    #[error("invalid constraint item {0:?}: expected kind:entity-id")]
    MissingSeparator(String),

    #[error("unknown constraint kind {0:?}")]
    UnknownKind(String),

    #[error("empty entity id in {0:?}")]
    EmptyEntityId(String),
}

/// Parse one `--day` argument into a constraint set.
///
/// A spec is a comma-separated list of `kind:entity-id` items, e.g.
/// `cuisine:italian,allergy:gluten`. An empty spec yields an empty set,
/// i.e. a day without constraints.
pub fn parse_day_spec(spec: &str) -> Result<Vec<Constraint>, DaySpecError> {
    let mut constraints = Vec::new();

    for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((kind, entity_id)) = item.split_once(':') else {
            return Err(DaySpecError::MissingSeparator(item.to_string()));
        };

        let kind = kind
            .trim()
            .parse::<ConstraintKind>()
            .map_err(|_| DaySpecError::UnknownKind(kind.trim().to_string()))?;

        let entity_id = entity_id.trim();
        if entity_id.is_empty() {
            return Err(DaySpecError::EmptyEntityId(item.to_string()));
        }

        constraints.push(Constraint::new(kind, entity_id));
    }

    Ok(constraints)
}
