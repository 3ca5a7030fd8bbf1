use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;

// Book holds metadata about a book on the shelf. The identifier is assigned by
// the book database when the book is added and never changes afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    // free-form text, e.g. "1965" or "June 1965"
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
}

impl Book {
    pub fn new(title: &str, author: &str, published_date: &str, description: &str) -> Self {
        Self {
            id: 0,
            title: title.to_string(),
            author: author.to_string(),
            published_date: published_date.to_string(),
            description: description.to_string(),
            created_by_id: None,
        }
    }

    pub fn with_creator(mut self, created_by_id: &str) -> Self {
        self.created_by_id = Some(created_by_id.to_string());
        self
    }

    // copy of this book stored under the given id, with an empty creator
    // treated the same as no creator
    pub(crate) fn assigned(&self, id: i64) -> Self {
        Self {
            id,
            title: self.title.clone(),
            author: self.author.clone(),
            published_date: self.published_date.clone(),
            description: self.description.clone(),
            created_by_id: self.created_by_id.clone().filter(|c| !c.is_empty()),
        }
    }

    pub(crate) fn is_created_by(&self, created_by_id: &str) -> bool {
        match &self.created_by_id {
            Some(creator) => creator == created_by_id,
            None => created_by_id.is_empty(),
        }
    }
}

impl Identifiable for Book {
    fn id(&self) -> i64 {
        self.id
    }
}

// ordering used by every listing: title first, identifier breaks ties
pub(crate) fn sort_by_title(books: &mut [Book]) {
    books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{Book, sort_by_title};
    use crate::core::domain::Identifiable;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = Book::new("Dune", "Herbert", "1965", "Desert planet");
        assert_eq!(0, book.id());
        assert_eq!("Dune", book.title.as_str());
        assert_eq!("Herbert", book.author.as_str());
        assert_eq!(None, book.created_by_id);
        let book = book.with_creator("user-1");
        assert_eq!(Some("user-1".to_string()), book.created_by_id);
    }

    #[tokio::test]
    async fn test_should_assign_without_touching_original() {
        let book = Book::new("Dune", "Herbert", "1965", "Desert planet").with_creator("");
        let stored = book.assigned(7);
        assert_eq!(7, stored.id);
        assert_eq!(0, book.id);
        assert_eq!(None, stored.created_by_id);
        assert!(stored.is_created_by(""));
        assert!(!stored.is_created_by("user-1"));
    }

    #[tokio::test]
    async fn test_should_serialize_with_id() {
        let book = Book::new("Dune", "Herbert", "1965", "Desert planet").assigned(1);
        let json = serde_json::to_value(&book).expect("should serialize");
        assert_eq!(1, json["id"]);
        assert_eq!("1965", json["published_date"]);
        assert!(json.get("created_by_id").is_none());
    }

    #[tokio::test]
    async fn test_should_sort_by_title_then_id() {
        let mut books = vec![
            Book::new("b", "", "", "").assigned(3),
            Book::new("B", "", "", "").assigned(2),
            Book::new("a", "", "", "").assigned(5),
            Book::new("a", "", "", "").assigned(1),
        ];
        sort_by_title(&mut books);
        let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        assert_eq!(vec![2, 1, 5, 3], ids);
    }
}
