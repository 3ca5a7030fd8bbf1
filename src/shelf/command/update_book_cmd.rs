use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;
use crate::books::dto::BookDto;
use crate::books::repository::BookDatabase;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    book_database: Arc<dyn BookDatabase>,
}

impl UpdateBookCommand {
    pub(crate) fn new(book_database: Arc<dyn BookDatabase>) -> Self {
        Self {
            book_database,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBookCommandRequest {
    pub id: i64,
    pub book: BookDto,
    pub created_by_id: Option<String>,
}

impl UpdateBookCommandRequest {
    pub fn new(id: i64, book: BookDto, created_by_id: Option<String>) -> Self {
        Self {
            id,
            book,
            created_by_id,
        }
    }
    pub fn build_book(&self) -> Book {
        self.book.build_book(self.id, self.created_by_id.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: Book,
}

impl UpdateBookCommandResponse {
    pub fn new(book: Book) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let book = req.build_book();
        self.book_database.update_book(&book).await.map_err(CommandError::from).map(|_| UpdateBookCommandResponse::new(book))
    }
}
