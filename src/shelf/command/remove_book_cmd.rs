use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::repository::BookDatabase;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveBookCommand {
    book_database: Arc<dyn BookDatabase>,
}

impl RemoveBookCommand {
    pub(crate) fn new(book_database: Arc<dyn BookDatabase>) -> Self {
        Self {
            book_database,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) id: i64,
}

impl RemoveBookCommandRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {}

impl RemoveBookCommandResponse {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.book_database.delete_book(req.id).await
            .map_err(CommandError::from).map(|_| RemoveBookCommandResponse::new())
    }
}
