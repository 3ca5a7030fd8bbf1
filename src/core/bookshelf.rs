use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum BookshelfError {
    NotFound {
        message: String,
    },
    // Any failure of the backing store: connectivity, query, serialization or
    // use after close. The reason code carries the underlying cause for logging.
    Storage {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl BookshelfError {
    pub fn not_found(message: &str) -> BookshelfError {
        BookshelfError::NotFound { message: message.to_string() }
    }

    pub fn book_not_found(operation: &str, id: i64) -> BookshelfError {
        BookshelfError::not_found(format!("{}: book {} not found", operation, id).as_str())
    }

    pub fn storage(message: &str, reason_code: Option<String>, retryable: bool) -> BookshelfError {
        BookshelfError::Storage { message: message.to_string(), reason_code, retryable }
    }

    pub fn closed(operation: &str) -> BookshelfError {
        BookshelfError::storage(format!("{}: database is closed", operation).as_str(), None, false)
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> BookshelfError {
        BookshelfError::Validation { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            BookshelfError::NotFound { .. } => { false }
            BookshelfError::Storage { retryable, .. } => { *retryable }
            BookshelfError::Validation { .. } => { false }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BookshelfError::NotFound { .. })
    }

    // prefixes the message with the operation that failed, keeping the kind
    pub(crate) fn within(self, operation: &str) -> BookshelfError {
        match self {
            BookshelfError::NotFound { message } => {
                BookshelfError::NotFound { message: format!("{}: {}", operation, message) }
            }
            BookshelfError::Storage { message, reason_code, retryable } => {
                BookshelfError::Storage { message: format!("{}: {}", operation, message), reason_code, retryable }
            }
            BookshelfError::Validation { message, reason_code } => {
                BookshelfError::Validation { message: format!("{}: {}", operation, message), reason_code }
            }
        }
    }
}

impl From<serde_json::Error> for BookshelfError {
    fn from(err: serde_json::Error) -> Self {
        BookshelfError::storage(
            format!("serde json parsing {:?}", err).as_str(), Some("Serialization".to_string()), false)
    }
}

impl From<String> for BookshelfError {
    fn from(err: String) -> Self {
        BookshelfError::storage(
            format!("serde parsing {:?}", err).as_str(), Some("Serialization".to_string()), false)
    }
}

impl Display for BookshelfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BookshelfError::NotFound { message } => {
                write!(f, "{}", message)
            }
            BookshelfError::Storage { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            BookshelfError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for BookshelfError {}

/// A specialized Result type for book databases.
pub type BookshelfResult<T> = Result<T, BookshelfError>;
