use std::error::Error;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use bank_transactions::{
    api::{build_router, shutdown_signal, AppState},
    config::Config,
    import_csv_async, logging,
    stores::{ReadCache, TransactionsStore},
    TransactionService,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run_app().await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::parse();
    logging::init(config.log_format, &config.log_level)?;

    let cache = (!config.no_cache).then(ReadCache::new);
    let service = Arc::new(TransactionService::new(
        Arc::new(TransactionsStore::new()),
        cache,
    ));

    if let Some(seed) = &config.seed {
        tracing::info!("loading transactions from {}", seed.display());
        import_csv_async(seed, service.clone()).await?;
    }

    let router = build_router(AppState::new(service, config.pagination()));
    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
