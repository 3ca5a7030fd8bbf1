use std::sync::Arc;
use tracing::info;
use crate::books::repository::BookDatabase;
use crate::books::repository::ddb_book_repository::DDBBookDatabase;
use crate::books::repository::memory_book_repository::MemoryBookDatabase;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_book_tables};

pub async fn create_book_database(config: &Configuration) -> Arc<dyn BookDatabase> {
    info!("creating {} book database", config.store);
    match config.store {
        RepositoryStore::Memory => {
            Arc::new(MemoryBookDatabase::new())
        }
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config).await;
            Arc::new(DDBBookDatabase::new(client, config.table_name.as_str(),
                                          config.index_name().as_str(), config.counters_table_name.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config).await;
            create_book_tables(&client, config).await;
            Arc::new(DDBBookDatabase::new(client, config.table_name.as_str(),
                                          config.index_name().as_str(), config.counters_table_name.as_str()))
        }
    }
}
