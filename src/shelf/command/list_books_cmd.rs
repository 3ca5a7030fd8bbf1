use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;
use crate::books::repository::BookDatabase;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    book_database: Arc<dyn BookDatabase>,
}

impl ListBooksCommand {
    pub(crate) fn new(book_database: Arc<dyn BookDatabase>) -> Self {
        Self {
            book_database,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct ListBooksCommandRequest {
    // when set, only books created by this user are listed
    pub(crate) created_by_id: Option<String>,
}

impl ListBooksCommandRequest {
    pub fn all() -> Self {
        Self {
            created_by_id: None,
        }
    }

    pub fn created_by(created_by_id: &str) -> Self {
        Self {
            created_by_id: Some(created_by_id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<Book>,
}

impl ListBooksCommandResponse {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let res = match req.created_by_id {
            Some(created_by_id) => self.book_database.list_books_created_by(created_by_id.as_str()).await,
            None => self.book_database.list_books().await,
        };
        res.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}
