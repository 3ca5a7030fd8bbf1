use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::core::bookshelf::BookshelfError;

// RepositoryStore selects the backing technology for the book database
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    Memory,
    DynamoDB,
    LocalDynamoDB,
}

impl RepositoryStore {
    pub fn is_local(&self) -> bool {
        !matches!(self, RepositoryStore::DynamoDB)
    }
}

impl FromStr for RepositoryStore {
    type Err = BookshelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(RepositoryStore::Memory),
            "dynamodb" => Ok(RepositoryStore::DynamoDB),
            "local-dynamodb" | "local_dynamodb" => Ok(RepositoryStore::LocalDynamoDB),
            other => Err(BookshelfError::validation(
                format!("unknown repository store {}", other).as_str(), None)),
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::Memory => write!(f, "memory"),
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
        }
    }
}
