use std::net::SocketAddr;
use lambda_http::{run, Error};
use tracing::{error, info};
use bookshelf::books::factory::create_book_database;
use bookshelf::core::controller::AppState;
use bookshelf::core::domain::Configuration;
use bookshelf::shelf::controller::build_router;
use bookshelf::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env()?;
    let db = create_book_database(&config).await;
    let state = AppState::new(config.clone(), db);

    let res = if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("serving {} branch through lambda runtime", config.branch_id);
        run(build_router::<lambda_http::Body>(state.clone())).await
    } else {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        info!("listening on {}", addr);
        axum::Server::bind(&addr)
            .serve(build_router::<axum::body::Body>(state.clone()).into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(Error::from)
    };

    state.close();
    res
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
    }
    info!("shutting down");
}
