//! A minimal personal finance ledger served over HTTP.
//!
//! Clients record credits and debits and read them back as JSON. There are
//! no user accounts: the first transaction a client creates issues it an
//! anonymous session cookie, and every read is scoped to that session.
//!
//! This library provides the REST API; the `server` binary runs it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod not_found;
mod routing;
mod session;
mod transaction;
mod validation;

pub use app_state::AppState;
pub use database_id::{SessionId, TransactionId};
pub use db::initialize as initialize_db;
pub use endpoints::{TRANSACTION, TRANSACTIONS, TRANSACTIONS_SUMMARY, format_endpoint};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::{SESSION_COOKIE, SESSION_COOKIE_MAX_AGE};
pub use transaction::{
    CreateTransactionBody, NewTransaction, SQLiteTransactionStore, Summary, SummaryResponse,
    Transaction, TransactionResponse, TransactionStore, TransactionType, TransactionsResponse,
};
pub use validation::FieldError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
