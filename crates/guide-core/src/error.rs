use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("tour not found: {0}")]
    TourNotFound(String),

    #[error("duplicate tour id: {0}")]
    DuplicateTour(String),

    #[error("invalid tour id '{0}': must be lowercase alphanumeric with underscores")]
    InvalidTourId(String),

    #[error("tour '{0}' has no steps")]
    EmptyTour(String),

    #[error("invalid completion status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuideError>;
