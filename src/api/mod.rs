//! HTTP adapter over [`TransactionService`].
//!
//! The handlers only translate between JSON/CSV and service calls; status
//! codes are chosen by [`ApiError`].

mod error;
mod trace_id;
mod transactions;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use trace_id::{trace_id_middleware, SPAN_ID_HEADER, TRACE_ID_HEADER};

use crate::{config::PaginationConfig, TransactionService};
use transactions::{
    count_transactions, create_transaction, delete_transaction, export_transactions,
    get_transaction, list_account_transactions, list_transactions, update_transaction,
};

/// The route paths served by [`build_router`].
pub mod endpoints {
    pub const TRANSACTIONS: &str = "/api/transactions";
    pub const TRANSACTION: &str = "/api/transactions/{id}";
    pub const ACCOUNT_TRANSACTIONS: &str = "/api/transactions/account/{account_id}";
    pub const TRANSACTION_COUNT: &str = "/api/transactions/count";
    pub const TRANSACTION_EXPORT: &str = "/api/transactions/export";
}

/// The state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(service: Arc<TransactionService>, pagination: PaginationConfig) -> Self {
        Self {
            service,
            pagination,
        }
    }
}

/// Return a router with all the API's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions).post(create_transaction),
        )
        .route(endpoints::TRANSACTION_COUNT, get(count_transactions))
        .route(endpoints::TRANSACTION_EXPORT, get(export_transactions))
        .route(
            endpoints::ACCOUNT_TRANSACTIONS,
            get(list_account_transactions),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id_middleware))
        .with_state(state)
}

/// Resolves once the process receives Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install SIGTERM handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::debug!("Received ctrl+c signal."),
        _ = terminate => tracing::debug!("Received terminate signal."),
    }
}
