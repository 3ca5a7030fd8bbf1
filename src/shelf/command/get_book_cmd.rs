use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;
use crate::books::repository::BookDatabase;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    book_database: Arc<dyn BookDatabase>,
}

impl GetBookCommand {
    pub(crate) fn new(book_database: Arc<dyn BookDatabase>) -> Self {
        Self {
            book_database,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) id: i64,
}

impl GetBookCommandRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub book: Book,
}

impl GetBookCommandResponse {
    pub fn new(book: Book) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.book_database.get_book(req.id)
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}
