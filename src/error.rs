use thiserror::Error;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Person not found: {0}")]
    PersonNotFound(String),

    #[error("No daily log for {person} on {date}")]
    LogNotFound { person: String, date: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Select at least one food that is not a supplement")]
    InsufficientSelection,

    #[error("Missing {0} target")]
    MissingTargets(&'static str),

    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, MealError>;
