use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Canceled: {0}")]
    Canceled(String),
}
