use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Error codes for sign-up / sign-in failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    InvalidCredential,
    Other,
}

impl AuthErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
            AuthErrorCode::Other => "auth/internal-error",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => {
                "This email address is already in use by another account."
            }
            AuthErrorCode::WeakPassword => {
                "The password is too weak. Please use at least 6 characters."
            }
            AuthErrorCode::InvalidEmail => "The email address is not valid.",
            AuthErrorCode::InvalidCredential => "Invalid email or password.",
            AuthErrorCode::Other => "An unexpected error occurred. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Detail is only logged, never shown to the caller.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Auth error: {}", .0.code())]
    Auth(AuthErrorCode),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Configuration(_) => {
                "API key is not configured. Please contact support.".to_string()
            }
            AppError::Upstream { message, .. } => format!("API Error: {}", message),
            AppError::Network(_) => {
                "Failed to connect to the API. Please check your network connection.".to_string()
            }
            AppError::Database(_) => "A database error occurred. Please try again later.".to_string(),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Auth(code) => code.user_message().to_string(),
            AppError::Internal(_) => AuthErrorCode::Other.user_message().to_string(),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Database(format!("Failed to serialize document: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Auth(AuthErrorCode::InvalidCredential) => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthErrorCode::Other) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ {}", self);
        } else {
            log::warn!("⚠️  {}", self);
        }

        let mut body = serde_json::json!({
            "success": false,
            "error": self.user_message(),
        });
        if let AppError::Auth(code) = self {
            body["code"] = serde_json::Value::from(code.code());
        }

        HttpResponse::build(status).json(body)
    }
}
