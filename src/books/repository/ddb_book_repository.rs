use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::{debug, info};

use crate::books::domain::model::{Book, sort_by_title};
use crate::books::repository::BookDatabase;
use crate::core::bookshelf::{BookshelfError, BookshelfResult};
use crate::core::domain::Identifiable;
use crate::utils::ddb::{parse_item, parse_number_attribute, parse_string_attribute};

// DDBBookDatabase stores books as DynamoDB items keyed by a numeric `id`. New
// ids come from an atomic counter item in a separate counters table.
#[derive(Debug)]
pub struct DDBBookDatabase {
    client: Client,
    table_name: String,
    index_name: String,
    counters_table_name: String,
    closed: AtomicBool,
}

impl DDBBookDatabase {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str, counters_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            counters_table_name: counters_table_name.to_string(),
            closed: AtomicBool::new(false),
        }
    }

    fn check_open(&self, operation: &str) -> BookshelfResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BookshelfError::closed(operation));
        }
        Ok(())
    }

    // increments the counter item named after the books table and returns the new value
    async fn next_id(&self) -> BookshelfResult<i64> {
        let table_name: &str = self.counters_table_name.as_ref();
        let res = self.client
            .update_item()
            .table_name(table_name)
            .key("counter_name", AttributeValue::S(self.table_name.clone()))
            .update_expression("ADD next_id :one")
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await.map_err(BookshelfError::from)?;
        res.attributes()
            .and_then(|attrs| parse_number_attribute("next_id", attrs))
            .ok_or_else(|| BookshelfError::storage(
                format!("counter {} returned no next_id", self.table_name).as_str(), None, false))
    }

    // scans the whole table, optionally keeping only books without a creator
    async fn scan_all(&self, without_creator: bool) -> BookshelfResult<Vec<Book>> {
        let table_name: &str = self.table_name.as_ref();
        let mut records = vec![];
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key.take());
            if without_creator {
                request = request.filter_expression("attribute_not_exists(created_by_id)");
            }
            let res = request.send().await.map_err(BookshelfError::from)?;
            for item in res.items().unwrap_or_default() {
                records.push(map_to_book(item)?);
            }
            match res.last_evaluated_key() {
                Some(key) => exclusive_start_key = Some(key.clone()),
                None => break,
            }
        }
        Ok(records)
    }

    async fn query_created_by(&self, created_by_id: &str) -> BookshelfResult<Vec<Book>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut records = vec![];
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let res = self.client
                .query()
                .table_name(table_name)
                .index_name(index_name)
                .key_condition_expression("created_by_id = :created_by_id")
                .expression_attribute_values(":created_by_id", AttributeValue::S(created_by_id.to_string()))
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await.map_err(BookshelfError::from)?;
            for item in res.items().unwrap_or_default() {
                records.push(map_to_book(item)?);
            }
            match res.last_evaluated_key() {
                Some(key) => exclusive_start_key = Some(key.clone()),
                None => break,
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl BookDatabase for DDBBookDatabase {
    async fn list_books(&self) -> BookshelfResult<Vec<Book>> {
        self.check_open("list_books")?;
        let mut books = self.scan_all(false).await.map_err(|e| e.within("list_books"))?;
        sort_by_title(&mut books);
        Ok(books)
    }

    async fn list_books_created_by(&self, created_by_id: &str) -> BookshelfResult<Vec<Book>> {
        self.check_open("list_books_created_by")?;
        // the index is sparse, so books without a creator can only be found by scanning
        let res = if created_by_id.is_empty() {
            self.scan_all(true).await
        } else {
            self.query_created_by(created_by_id).await
        };
        let mut books = res.map_err(|e| e.within("list_books_created_by"))?;
        sort_by_title(&mut books);
        Ok(books)
    }

    async fn get_book(&self, id: i64) -> BookshelfResult<Book> {
        self.check_open("get_book")?;
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .get_item()
            .table_name(table_name)
            .key("id", AttributeValue::N(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(|e| BookshelfError::from(e).within("get_book"))?;
        match res.item() {
            Some(item) => map_to_book(item).map_err(|e| e.within("get_book")),
            None => Err(BookshelfError::book_not_found("get_book", id)),
        }
    }

    async fn add_book(&self, book: &Book) -> BookshelfResult<i64> {
        self.check_open("add_book")?;
        let id = self.next_id().await.map_err(|e| e.within("add_book"))?;
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(book.assigned(id))?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map_err(|e| BookshelfError::from(e).within("add_book"))?;
        info!("added book {} to {}", id, table_name);
        Ok(id)
    }

    async fn delete_book(&self, id: i64) -> BookshelfResult<()> {
        self.check_open("delete_book")?;
        let table_name: &str = self.table_name.as_ref();
        match self.client.delete_item()
            .table_name(table_name)
            .key("id", AttributeValue::N(id.to_string()))
            .condition_expression("attribute_exists(id)")
            .send()
            .await {
            Ok(_) => {
                info!("deleted book {} from {}", id, table_name);
                Ok(())
            }
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_conditional_check_failed_exception() => {
                Err(BookshelfError::book_not_found("delete_book", id))
            }
            Err(err) => Err(BookshelfError::from(err).within("delete_book")),
        }
    }

    async fn update_book(&self, book: &Book) -> BookshelfResult<()> {
        self.check_open("update_book")?;
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(book.assigned(book.id()))?;
        // a put replaces every attribute, including a creator the new book no longer has
        match self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_exists(id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await {
            Ok(_) => {
                debug!("updated book {} in {}", book.id(), table_name);
                Ok(())
            }
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_conditional_check_failed_exception() => {
                Err(BookshelfError::book_not_found("update_book", book.id()))
            }
            Err(err) => Err(BookshelfError::from(err).within("update_book")),
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("closed dynamodb book database for {}", self.table_name);
        }
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookshelfResult<Book> {
    let id = parse_number_attribute("id", map).ok_or_else(|| BookshelfError::storage(
        format!("book item without numeric id {:?}", map.get("id")).as_str(), Some("Serialization".to_string()), false))?;
    Ok(Book {
        id,
        title: parse_string_attribute("title", map).unwrap_or_default(),
        author: parse_string_attribute("author", map).unwrap_or_default(),
        published_date: parse_string_attribute("published_date", map).unwrap_or_default(),
        description: parse_string_attribute("description", map).unwrap_or_default(),
        created_by_id: parse_string_attribute("created_by_id", map).filter(|c| !c.is_empty()),
    })
}
