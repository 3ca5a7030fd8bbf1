use async_trait::async_trait;
use crate::core::bookshelf::BookshelfError;

#[derive(Debug)]
pub enum CommandError {
    NotFound {
        message: String,
    },
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

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<BookshelfError> for CommandError {
    fn from(other: BookshelfError) -> Self {
        match other {
            BookshelfError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            BookshelfError::Storage { message, reason_code, retryable } => {
                CommandError::Storage { message, reason_code, retryable }
            }
            BookshelfError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::bookshelf::BookshelfError;
    use crate::core::command::CommandError;

    #[tokio::test]
    async fn test_should_build_command_error() {
        let _ = CommandError::NotFound { message: "test".to_string() };
        let _ = CommandError::Storage { message: "test".to_string(), reason_code: None, retryable: false };
        let _ = CommandError::Validation { message: "test".to_string(), reason_code: None };
    }

    #[tokio::test]
    async fn test_should_convert_bookshelf_error() {
        assert!(matches!(CommandError::from(BookshelfError::book_not_found("get_book", 1)), CommandError::NotFound { .. }));
        assert!(matches!(CommandError::from(BookshelfError::closed("get_book")), CommandError::Storage { retryable: false, .. }));
        assert!(matches!(CommandError::from(BookshelfError::validation("bad", None)), CommandError::Validation { .. }));
    }
}
