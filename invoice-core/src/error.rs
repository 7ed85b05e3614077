use thiserror::Error;

/// Message shown to the user whenever item entry fails validation.
pub const INVALID_ENTRY_MESSAGE: &str = "Please fill in all fields correctly";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Nothing to render: {0}")]
    NothingToRender(String),

    #[error("Render error: {0}")]
    RenderError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    /// Short text suitable for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => INVALID_ENTRY_MESSAGE.to_string(),
            AppError::BadRequest(err) => err.to_string(),
            AppError::NothingToRender(msg) => msg.clone(),
            AppError::RenderError(err) => format!("Failed to generate PDF: {}", err),
            AppError::InternalError(err) => format!("Unexpected error: {}", err),
            AppError::ConfigError(err) => format!("Configuration error: {}", err),
        }
    }

    /// Whether the failure came from user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::NothingToRender(_)
        )
    }
}
