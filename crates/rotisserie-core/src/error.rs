use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An insert that must produce a row produced none.
    #[error("{entity} was not persisted")]
    NotPersisted { entity: &'static str },

    #[error("pattern {pattern:?} is too short: at least {min_len} characters required")]
    InvalidPattern { pattern: String, min_len: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Input that violates a recipe invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("recipe name is required")]
    EmptyName,

    #[error("recipe name is {len} characters long, the maximum is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("instructions are required")]
    EmptyInstructions,

    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },

    #[error("ingredient {index}: quantity must be a positive number")]
    InvalidQuantity { index: usize },

    #[error("ingredient {index}: name is required")]
    EmptyIngredientName { index: usize },

    #[error("at least one ingredient is required")]
    NoIngredients,

    #[error("tag {index}: name is required")]
    EmptyTag { index: usize },

    #[error("{kind} name is blank")]
    BlankName { kind: &'static str },

    #[error("invalid source URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
