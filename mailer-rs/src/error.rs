use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template compile error: {0}")]
    Compile(String),

    #[error("Template render error: {0}")]
    Render(String),

    #[error("Email queue is full")]
    QueueFull,

    #[error("Email queue is closed")]
    QueueClosed,

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MailError {
    /// HTTP status the API reports for this error.
    ///
    /// Request-shape problems are client errors; a template that compiled
    /// but failed to execute, or a saturated queue, is a server error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MailError::Validation(_) | MailError::InvalidEmail(_) | MailError::Compile(_) => {
                StatusCode::BAD_REQUEST
            }
            MailError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            MailError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, MailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(
            MailError::Validation("Missing 'to' field".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MailError::Compile("unexpected end of input".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MailError::TemplateNotFound("welcome".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            MailError::Render("undefined value".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(MailError::QueueFull.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(MailError::QueueClosed.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
