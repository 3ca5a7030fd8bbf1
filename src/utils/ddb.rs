use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use serde_json::Value;
use tracing::warn;
use crate::core::bookshelf::{BookshelfError, BookshelfResult};
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

// creates a table keyed by `pk`, with an optional global secondary index on `gsi_pk`
// named `<table_name>_ndx`
pub(crate) async fn create_table(client: &Client,
                                 table_name: &str, pk: &str, pk_type: ScalarAttributeType,
                                 gsi_pk: Option<&str>) -> BookshelfResult<()> {
    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(pk)
                .attribute_type(pk_type)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        );

    if let Some(gsi_pk) = gsi_pk {
        let gsi = GlobalSecondaryIndex::builder()
            .index_name(format!("{}_ndx", table_name))
            .key_schema(KeySchemaElement::builder()
                .attribute_name(gsi_pk)
                .key_type(KeyType::Hash).build())
            .projection(Projection::builder().projection_type(ProjectionType::All).build())
            .provisioned_throughput(
                ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build())
            .build();
        request = request
            .global_secondary_indexes(gsi)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(gsi_pk)
                    .attribute_type(ScalarAttributeType::S)
                    .build(),
            );
    }

    match request.send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(BookshelfError::storage(format!("failed to create {} table due to {}",
                                                table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) async fn delete_table(client: &Client, table_name: &str) -> BookshelfResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(BookshelfError::storage(format!("failed to delete {} table due to {}",
                                                table_name, err).as_str(), None, false))
        }
    }
}

// creates the books and counters tables unless they already exist
pub(crate) async fn create_book_tables(client: &Client, config: &Configuration) {
    if describe_table(client, config.table_name.as_str()).await.is_err() {
        if let Err(err) = create_table(client, config.table_name.as_str(), "id",
                                       ScalarAttributeType::N, Some("created_by_id")).await {
            warn!("{}", err);
        }
    }
    if describe_table(client, config.counters_table_name.as_str()).await.is_err() {
        if let Err(err) = create_table(client, config.counters_table_name.as_str(), "counter_name",
                                       ScalarAttributeType::S, None).await {
            warn!("{}", err);
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> BookshelfResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(BookshelfError::storage(format!("failed to describe {} table",
                                                table_name).as_str(), None, false))
        }
        Err(err) => {
            Err(BookshelfError::storage(format!("failed to describe {} table due to {}",
                                                table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        return Some(str.clone());
    }
    None
}

pub(crate) fn parse_number_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<i64> {
    if let Some(AttributeValue::N(str)) = map.get(name) {
        if let Ok(n) = str.parse::<i64>() {
            return Some(n);
        }
    }
    None
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => {
            AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect())
        }
    }
}

// helper method to build db-client for the configured store
pub(crate) async fn build_db_client(config: &Configuration) -> Client {
    match config.store {
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(config.dynamodb_endpoint.as_str())
                .build();
            Client::from_conf(dynamodb_local_config)
        }
        _ => {
            //Get config from environment.
            let sdk_config = aws_config::load_from_env().await;
            Client::new(&sdk_config)
        }
    }
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

impl From<SdkError<GetItemError>> for BookshelfError {
    fn from(err: SdkError<GetItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb get item {:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<UpdateItemError>> for BookshelfError {
    fn from(err: SdkError<UpdateItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb update item {:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<PutItemError>> for BookshelfError {
    fn from(err: SdkError<PutItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb put item {:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<DeleteItemError>> for BookshelfError {
    fn from(err: SdkError<DeleteItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb delete item {:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<QueryError>> for BookshelfError {
    fn from(err: SdkError<QueryError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb query {:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<ScanError>> for BookshelfError {
    fn from(err: SdkError<ScanError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        BookshelfError::storage(format!("ddb scan {:?}", err).as_str(), reason, retryable)
    }
}

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    // matches "ProvisionedThroughputExceeded" and "LimitExceeded"
    opts.map(|b| b.windows(6).any(|w| w == b"ceeded")).unwrap_or(false)
}
