pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::core::bookshelf::BookshelfResult;

/// BookDatabase provides thread-safe access to a database of books.
///
/// Listings are ordered by title (ties by id). Lookups, updates and deletes of
/// an identifier that was never assigned, or was deleted, fail with
/// `BookshelfError::NotFound`; every other failure is `BookshelfError::Storage`.
#[async_trait]
pub trait BookDatabase: Sync + Send {
    // returns all books, ordered by title
    async fn list_books(&self) -> BookshelfResult<Vec<Book>>;

    // returns the books created by the given user, ordered by title; an empty
    // user id matches books without a creator
    async fn list_books_created_by(&self, created_by_id: &str) -> BookshelfResult<Vec<Book>>;

    // retrieves a book by its id
    async fn get_book(&self, id: i64) -> BookshelfResult<Book>;

    // saves a copy of the book under a newly assigned id, ignoring `book.id`
    async fn add_book(&self, book: &Book) -> BookshelfResult<i64>;

    // removes a book by its id
    async fn delete_book(&self, id: i64) -> BookshelfResult<()>;

    // replaces all fields of the book stored under `book.id`
    async fn update_book(&self, book: &Book) -> BookshelfResult<()>;

    // releases held resources; later calls fail with a storage error
    fn close(&self);
}
