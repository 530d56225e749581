use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickError {
    #[error("Invalid todo: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Invalid file format: {0}")]
    Format(String),

    #[error("This todo list belongs to another user ({document}) and cannot be imported")]
    Ownership { document: String, current: String },

    #[error("{0}")]
    Eligibility(String),

    #[error("Completed todos cannot be deleted, archive them instead: {0}")]
    CompletedNotRemovable(String),

    #[error("No todos to export")]
    NothingToExport,

    #[error("User identification error, log out and log in again")]
    Unidentified,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl TickError {
    /// Whether the error is an advisory for the user rather than a failure of
    /// the engine. Advisories leave state untouched and can be dismissed.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            TickError::Validation(_)
                | TickError::NotFound(_)
                | TickError::Format(_)
                | TickError::Ownership { .. }
                | TickError::Eligibility(_)
                | TickError::CompletedNotRemovable(_)
                | TickError::NothingToExport
                | TickError::Unidentified
                | TickError::Auth(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TickError>;
