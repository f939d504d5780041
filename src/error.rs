use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Password hash error")]
    PasswordHash,
}

/// Blocking notification shown to the user when a requested operation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

impl AppError {
    pub fn notice(&self) -> Notice {
        let message = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {:?}", e);
                "Something went wrong. Please try again.".to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Unauthorized => "Invalid email or password".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong. Please try again.".to_string()
            }
            AppError::PasswordHash => {
                tracing::error!("Password hash error");
                "Something went wrong. Please try again.".to_string()
            }
        };

        Notice {
            title: "Error",
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
