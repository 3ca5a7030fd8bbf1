use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;
use crate::books::dto::BookDto;
use crate::books::repository::BookDatabase;
use crate::core::command::{Command, CommandError};

pub(crate) struct AddBookCommand {
    book_database: Arc<dyn BookDatabase>,
}

impl AddBookCommand {
    pub(crate) fn new(book_database: Arc<dyn BookDatabase>) -> Self {
        Self {
            book_database,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) book: BookDto,
    pub(crate) created_by_id: Option<String>,
}

impl AddBookCommandRequest {
    pub fn new(book: BookDto, created_by_id: Option<String>) -> Self {
        Self {
            book,
            created_by_id,
        }
    }
    pub fn build_book(&self) -> Book {
        self.book.build_book(0, self.created_by_id.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub id: i64,
}

impl AddBookCommandResponse {
    pub fn new(id: i64) -> Self {
        Self {
            id,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book();
        self.book_database.add_book(&book).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
