use serde::{Deserialize, Serialize};
use crate::core::bookshelf::{BookshelfError, BookshelfResult};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> i64;
}

// Configuration abstracts config options for the bookshelf service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub store: RepositoryStore,
    pub table_name: String,
    pub counters_table_name: String,
    pub dynamodb_endpoint: String,
    pub port: u16,
}

impl Configuration {
    pub fn new(branch_id: &str, store: RepositoryStore) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            store,
            table_name: "books".to_string(),
            counters_table_name: "counters".to_string(),
            dynamodb_endpoint: "http://localhost:8000".to_string(),
            port: 8080,
        }
    }

    pub fn from_env() -> BookshelfResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> BookshelfResult<Self>
        where F: Fn(&str) -> Option<String> {
        let branch_id = non_empty(lookup("BOOKSHELF_BRANCH")).unwrap_or_else(|| "dev".to_string());
        let store = match non_empty(lookup("BOOKSHELF_STORE")) {
            Some(store) => store.parse::<RepositoryStore>()?,
            None if branch_id == "dev" => RepositoryStore::LocalDynamoDB,
            None => RepositoryStore::DynamoDB,
        };
        let mut config = Configuration::new(branch_id.as_str(), store);
        if let Some(table_name) = non_empty(lookup("BOOKSHELF_TABLE")) {
            config.table_name = table_name;
        }
        if let Some(counters) = non_empty(lookup("BOOKSHELF_COUNTERS_TABLE")) {
            config.counters_table_name = counters;
        }
        if let Some(endpoint) = non_empty(lookup("DYNAMODB_ENDPOINT")) {
            config.dynamodb_endpoint = endpoint;
        }
        if let Some(port) = non_empty(lookup("PORT")) {
            config.port = port.parse::<u16>().map_err(|err| BookshelfError::validation(
                format!("invalid PORT {}: {}", port, err).as_str(), None))?;
        }
        Ok(config)
    }

    pub fn index_name(&self) -> String {
        format!("{}_ndx", self.table_name)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test", RepositoryStore::Memory);
        assert_eq!("books", config.table_name.as_str());
        assert_eq!("counters", config.counters_table_name.as_str());
        assert_eq!("books_ndx", config.index_name().as_str());
        assert_eq!(8080, config.port);
    }

    #[tokio::test]
    async fn test_should_default_config_from_empty_env() {
        let config = Configuration::from_lookup(|_| None).expect("should build config");
        assert_eq!("dev", config.branch_id.as_str());
        assert_eq!(RepositoryStore::LocalDynamoDB, config.store);

        let prod = Configuration::from_lookup(|k| {
            if k == "BOOKSHELF_BRANCH" { Some("prod".to_string()) } else { None }
        }).expect("should build config");
        assert_eq!(RepositoryStore::DynamoDB, prod.store);
    }

    #[tokio::test]
    async fn test_should_override_config_from_env() {
        let env = HashMap::from([
            ("BOOKSHELF_STORE", "memory"),
            ("BOOKSHELF_TABLE", "shelf"),
            ("BOOKSHELF_COUNTERS_TABLE", "shelf_counters"),
            ("DYNAMODB_ENDPOINT", "http://dynamo:8000"),
            ("PORT", "9090"),
        ]);
        let config = Configuration::from_lookup(|k| env.get(k).map(|v| v.to_string())).expect("should build config");
        assert_eq!(RepositoryStore::Memory, config.store);
        assert_eq!("shelf", config.table_name.as_str());
        assert_eq!("shelf_ndx", config.index_name().as_str());
        assert_eq!("shelf_counters", config.counters_table_name.as_str());
        assert_eq!("http://dynamo:8000", config.dynamodb_endpoint.as_str());
        assert_eq!(9090, config.port);
    }

    #[tokio::test]
    async fn test_should_reject_bad_config() {
        assert!(Configuration::from_lookup(|k| {
            if k == "PORT" { Some("eighty".to_string()) } else { None }
        }).is_err());
        assert!(Configuration::from_lookup(|k| {
            if k == "BOOKSHELF_STORE" { Some("mongodb".to_string()) } else { None }
        }).is_err());
    }
}
