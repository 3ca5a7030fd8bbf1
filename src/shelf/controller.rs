use axum::{
    body::HttpBody,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use serde_json::Value;
use tracing::info;
use crate::books::domain::model::Book;
use crate::books::dto::BookDto;
use crate::core::bookshelf::BookshelfError;
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::shelf::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::shelf::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::shelf::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::shelf::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::shelf::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};

// header carrying the id of the user creating or updating a book
pub const CREATOR_HEADER: &str = "x-user-id";

type Redirect<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

fn redirect<T>(location: String, body: T) -> Redirect<T> {
    (StatusCode::FOUND, [(header::LOCATION, location)], Json(body))
}

fn creator_from_headers(headers: &HeaderMap) -> Result<Option<String>, ServerError> {
    match headers.get(CREATOR_HEADER) {
        Some(value) => {
            let creator = value.to_str().map_err(|err| CommandError::from(BookshelfError::validation(
                format!("invalid {} header: {}", CREATOR_HEADER, err).as_str(), None)))?;
            Ok(Some(creator.to_string()))
        }
        None => Ok(None),
    }
}

pub fn build_router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Send,
          B::Error: Into<BoxError> {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/books", get(list_books).post(add_book))
        .route("/books/:id",
               get(find_book_by_id).put(update_book).post(update_book).delete(remove_book))
        .route("/books/:id/delete", post(remove_book))
        .route("/users/:user_id/books", get(list_books_created_by))
        .with_state(state)
}

pub(crate) async fn root() -> (StatusCode, [(HeaderName, &'static str); 1]) {
    (StatusCode::FOUND, [(header::LOCATION, "/books")])
}

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn list_books(
    State(state): State<AppState>) -> Result<Json<Vec<Book>>, ServerError> {
    let res = ListBooksCommand::new(state.db).execute(ListBooksCommandRequest::all()).await?;
    Ok(Json(res.books))
}

pub(crate) async fn list_books_created_by(
    State(state): State<AppState>,
    Path(user_id): Path<String>) -> Result<Json<Vec<Book>>, ServerError> {
    let req = ListBooksCommandRequest::created_by(user_id.as_str());
    let res = ListBooksCommand::new(state.db).execute(req).await?;
    Ok(Json(res.books))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Redirect<AddBookCommandResponse>, ServerError> {
    let book: BookDto = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = AddBookCommandRequest::new(book, creator_from_headers(&headers)?);
    let res = AddBookCommand::new(state.db).execute(req).await?;
    info!("created book {} in {}", res.id, state.config.table_name);
    Ok(redirect(format!("/books/{}", res.id), res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>) -> Result<Json<Book>, ServerError> {
    let res = GetBookCommand::new(state.db).execute(GetBookCommandRequest::new(id)).await?;
    Ok(Json(res.book))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Redirect<UpdateBookCommandResponse>, ServerError> {
    let book: BookDto = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(id, book, creator_from_headers(&headers)?);
    let res = UpdateBookCommand::new(state.db).execute(req).await?;
    Ok(redirect(format!("/books/{}", id), res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(id): Path<i64>) -> Result<Redirect<RemoveBookCommandResponse>, ServerError> {
    let res = RemoveBookCommand::new(state.db).execute(RemoveBookCommandRequest::new(id)).await?;
    info!("deleted book {} from {}", id, state.config.table_name);
    Ok(redirect("/books".to_string(), res))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::books::repository::BookDatabase;
    use crate::books::repository::memory_book_repository::MemoryBookDatabase;
    use crate::core::controller::AppState;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::shelf::controller::{build_router, CREATOR_HEADER};

    fn sut() -> (AppState, Router) {
        let state = AppState::new(Configuration::new("test", RepositoryStore::Memory),
                                  Arc::new(MemoryBookDatabase::new()));
        (state.clone(), build_router(state))
    }

    fn json_request(method: &str, uri: &str, body: Value, creator: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(creator) = creator {
            builder = builder.header(CREATOR_HEADER, creator);
        }
        builder.body(Body::from(body.to_string())).expect("should build request")
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).expect("should build request")
    }

    async fn body_json(res: Response) -> Value {
        let bytes = hyper::body::to_bytes(res.into_body()).await.expect("should read body");
        serde_json::from_slice(&bytes).expect("should parse body")
    }

    fn location(res: &Response) -> String {
        res.headers().get(header::LOCATION).expect("should redirect")
            .to_str().expect("should be text").to_string()
    }

    #[tokio::test]
    async fn test_should_serve_health_and_root() {
        let (_, app) = sut();
        let res = app.clone().oneshot(empty_request("GET", "/healthz")).await.expect("should respond");
        assert_eq!(StatusCode::OK, res.status());

        let res = app.oneshot(empty_request("GET", "/")).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());
        assert_eq!("/books", location(&res));
    }

    #[tokio::test]
    async fn test_should_run_dune_scenario() {
        let (_, app) = sut();
        let dune = json!({"title": "Dune", "author": "Herbert", "published_date": "1965", "description": "Desert planet"});
        let res = app.clone().oneshot(json_request("POST", "/books", dune, None)).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());
        assert_eq!("/books/1", location(&res));
        assert_eq!(1, body_json(res).await["id"]);

        let res = app.clone().oneshot(empty_request("GET", "/books")).await.expect("should respond");
        assert_eq!(StatusCode::OK, res.status());
        let books = body_json(res).await;
        assert_eq!(1, books.as_array().expect("should be array").len());
        assert_eq!(1, books[0]["id"]);
        assert_eq!("Dune", books[0]["title"]);
        assert_eq!("1965", books[0]["published_date"]);

        let messiah = json!({"title": "Dune Messiah", "author": "Herbert", "published_date": "1969", "description": "Sequel"});
        let res = app.clone().oneshot(json_request("PUT", "/books/1", messiah, None)).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());

        let res = app.clone().oneshot(empty_request("GET", "/books/1")).await.expect("should respond");
        assert_eq!(StatusCode::OK, res.status());
        assert_eq!("Dune Messiah", body_json(res).await["title"]);

        let res = app.clone().oneshot(empty_request("DELETE", "/books/1")).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());
        assert_eq!("/books", location(&res));

        let res = app.oneshot(empty_request("GET", "/books/1")).await.expect("should respond");
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    #[tokio::test]
    async fn test_should_ignore_client_id_and_tag_creator() {
        let (state, app) = sut();
        let book = json!({"id": 77, "title": "Solaris", "author": "Lem", "published_date": "1961", "description": "Ocean"});
        let res = app.clone().oneshot(json_request("POST", "/books", book, Some("alice"))).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());
        assert_eq!("/books/1", location(&res));
        assert!(state.db.get_book(77).await.is_err());

        let res = app.clone().oneshot(empty_request("GET", "/users/alice/books")).await.expect("should respond");
        let books = body_json(res).await;
        assert_eq!(1, books.as_array().expect("should be array").len());
        assert_eq!("alice", books[0]["created_by_id"]);

        let res = app.oneshot(empty_request("GET", "/users/bob/books")).await.expect("should respond");
        assert_eq!(StatusCode::OK, res.status());
        assert_eq!(0, body_json(res).await.as_array().expect("should be array").len());
    }

    #[tokio::test]
    async fn test_should_delete_via_post() {
        let (state, app) = sut();
        let book = json!({"title": "Anathem"});
        let _ = app.clone().oneshot(json_request("POST", "/books", book, None)).await.expect("should respond");
        let res = app.clone().oneshot(empty_request("POST", "/books/1/delete")).await.expect("should respond");
        assert_eq!(StatusCode::FOUND, res.status());
        assert!(state.db.list_books().await.expect("should list books").is_empty());

        let res = app.oneshot(empty_request("POST", "/books/1/delete")).await.expect("should respond");
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    #[tokio::test]
    async fn test_should_map_errors_to_status() {
        let (state, app) = sut();
        let res = app.clone().oneshot(empty_request("GET", "/books/abc")).await.expect("should respond");
        assert_eq!(StatusCode::BAD_REQUEST, res.status());

        let bad = json!({"title": 12});
        let res = app.clone().oneshot(json_request("POST", "/books", bad, None)).await.expect("should respond");
        assert_eq!(StatusCode::BAD_REQUEST, res.status());

        let res = app.clone().oneshot(json_request("PUT", "/books/9", json!({"title": "x"}), None)).await.expect("should respond");
        assert_eq!(StatusCode::NOT_FOUND, res.status());

        state.close();
        let res = app.oneshot(empty_request("GET", "/books")).await.expect("should respond");
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    }
}
