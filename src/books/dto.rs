use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;

// BookDto is the payload accepted when adding or updating a book; the
// identifier is assigned by the server and never read from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BookDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub description: String,
}

impl BookDto {
    pub fn new(title: &str, author: &str, published_date: &str, description: &str) -> BookDto {
        BookDto {
            title: title.to_string(),
            author: author.to_string(),
            published_date: published_date.to_string(),
            description: description.to_string(),
        }
    }

    pub fn build_book(&self, id: i64, created_by_id: Option<&str>) -> Book {
        Book {
            id,
            title: self.title.to_string(),
            author: self.author.to_string(),
            published_date: self.published_date.to_string(),
            description: self.description.to_string(),
            created_by_id: created_by_id.map(str::to_string),
        }
    }
}

impl From<&Book> for BookDto {
    fn from(other: &Book) -> Self {
        Self {
            title: other.title.to_string(),
            author: other.author.to_string(),
            published_date: other.published_date.to_string(),
            description: other.description.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::dto::BookDto;

    #[tokio::test]
    async fn test_should_build_books() {
        let dto = BookDto::new("Dune", "Herbert", "1965", "Desert planet");
        let book = dto.build_book(3, Some("user-1"));
        assert_eq!(3, book.id);
        assert_eq!("Dune", book.title.as_str());
        assert_eq!(Some("user-1".to_string()), book.created_by_id);
        assert_eq!(dto, BookDto::from(&book));
    }

    #[tokio::test]
    async fn test_should_ignore_client_id() {
        let dto: BookDto = serde_json::from_str(
            r#"{"id": 99, "title": "Dune", "author": "Herbert", "published_date": "1965"}"#)
            .expect("should parse");
        assert_eq!("Dune", dto.title.as_str());
        assert_eq!("", dto.description.as_str());
        let json = serde_json::to_value(&dto).expect("should serialize");
        assert!(json.get("id").is_none());
    }
}
