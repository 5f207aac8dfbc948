use thiserror::Error;

/// Domain-level errors shared across crates that this crate's types do not
/// otherwise carry a more specific error for.
#[derive(Clone, Debug, Error)]
pub enum DomainError {
    #[error("operation id '{0}' is not unique within this run")]
    DuplicateOperationId(String),
}
