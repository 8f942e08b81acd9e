use settings_store::StoreError;

use crate::{CategoryId, MAX_CATEGORY_ID};

/// Errors returned by [`CategoryRegistry`](crate::CategoryRegistry) operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Registration was attempted with an empty name.
    #[error("category names must not be empty")]
    EmptyName,

    /// Every id below the limit is already assigned.
    #[error("no category id available below {MAX_CATEGORY_ID}")]
    Exhausted,

    /// The id does not belong to a registered category.
    #[error("category {0} is not registered")]
    UnknownCategory(CategoryId),

    /// Persisting the record failed.
    #[error("failed to persist category settings: {0}")]
    Store(#[from] StoreError),
}
