use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::books::domain::model::{Book, sort_by_title};
use crate::books::repository::BookDatabase;
use crate::core::bookshelf::{BookshelfError, BookshelfResult};
use crate::core::domain::Identifiable;

// MemoryBookDatabase keeps books in process memory; used for tests and local runs.
#[derive(Debug)]
pub struct MemoryBookDatabase {
    books: RwLock<BTreeMap<i64, Book>>,
    next_id: AtomicI64,
    closed: AtomicBool,
}

impl MemoryBookDatabase {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    fn check_open(&self, operation: &str) -> BookshelfResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BookshelfError::closed(operation));
        }
        Ok(())
    }

    async fn list_matching<P>(&self, predicate: P) -> Vec<Book>
        where P: Fn(&Book) -> bool {
        let books = self.books.read().await;
        let mut records: Vec<Book> = books.values().filter(|b| predicate(*b)).cloned().collect();
        sort_by_title(&mut records);
        records
    }
}

impl Default for MemoryBookDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookDatabase for MemoryBookDatabase {
    async fn list_books(&self) -> BookshelfResult<Vec<Book>> {
        self.check_open("list_books")?;
        Ok(self.list_matching(|_| true).await)
    }

    async fn list_books_created_by(&self, created_by_id: &str) -> BookshelfResult<Vec<Book>> {
        self.check_open("list_books_created_by")?;
        Ok(self.list_matching(|b| b.is_created_by(created_by_id)).await)
    }

    async fn get_book(&self, id: i64) -> BookshelfResult<Book> {
        self.check_open("get_book")?;
        let books = self.books.read().await;
        books.get(&id).cloned().ok_or_else(|| BookshelfError::book_not_found("get_book", id))
    }

    async fn add_book(&self, book: &Book) -> BookshelfResult<i64> {
        self.check_open("add_book")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = book.assigned(id);
        self.books.write().await.insert(stored.id(), stored);
        debug!("added book {}", id);
        Ok(id)
    }

    async fn delete_book(&self, id: i64) -> BookshelfResult<()> {
        self.check_open("delete_book")?;
        match self.books.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(BookshelfError::book_not_found("delete_book", id)),
        }
    }

    async fn update_book(&self, book: &Book) -> BookshelfResult<()> {
        self.check_open("update_book")?;
        let mut books = self.books.write().await;
        match books.get_mut(&book.id()) {
            Some(existing) => {
                *existing = book.assigned(book.id());
                Ok(())
            }
            None => Err(BookshelfError::book_not_found("update_book", book.id())),
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("closed memory book database");
        }
    }
}
