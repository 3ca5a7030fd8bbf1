use std::sync::Arc;
use axum::http::StatusCode;
use tracing::{error, warn};
use crate::books::repository::BookDatabase;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

// AppState is shared by all request handlers; the book database is created once
// at startup and closed once at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub db: Arc<dyn BookDatabase>,
}

impl AppState {
    pub fn new(config: Configuration, db: Arc<dyn BookDatabase>) -> AppState {
        AppState {
            config,
            db,
        }
    }

    pub fn close(&self) {
        self.db.close();
    }
}

pub(crate) type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("could not decode json book: {}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound { message } => {
                warn!("{}", message);
                (StatusCode::NOT_FOUND, message)
            }
            CommandError::Storage { .. } => {
                // details stay in the logs
                error!("{:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage error".to_string())
            }
            CommandError::Validation { message, .. } => {
                warn!("{}", message);
                (StatusCode::BAD_REQUEST, message)
            }
        }
    }
}
