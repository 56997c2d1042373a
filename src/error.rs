#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Could not resolve ticker for '{0}'. Try a different company name.")]
    ResolutionFailure(String),

    #[error("No price data found for '{0}'.")]
    EmptyData(String),

    #[error("Not enough data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid starting price: {0}")]
    InvalidPrice(f64),

    #[error("Market returns have zero variance; beta is undefined")]
    ZeroVariance,

    #[error("Stock and market returns share too few dates; beta is undefined")]
    NoOverlap,

    #[error("API error [{code}]: {description}")]
    Api { code: String, description: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl AnalyzerError {
    /// Errors that end a request with a message meant for the person who
    /// typed the company name, as opposed to computation or transport faults.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AnalyzerError::ResolutionFailure(_) | AnalyzerError::EmptyData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
