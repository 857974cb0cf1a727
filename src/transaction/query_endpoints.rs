//! Defines the read-only endpoints for a session's transactions.
//!
//! These routes sit behind [session_guard](crate::session::session_guard), so
//! the session ID is always available as a request extension.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::{SessionId, TransactionId},
    transaction::{Summary, Transaction, TransactionStore},
    validation::ValidPath,
};

/// The response body for listing transactions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// Every transaction owned by the session.
    pub transactions: Vec<Transaction>,
}

/// The response body for getting a single transaction.
///
/// `transaction` is left out of the JSON entirely when there is no match.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The matching transaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

/// The response body for the transaction summary.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The totals for the session.
    pub summary: Summary,
}

/// A route handler for listing all of the session's transactions.
pub async fn list_transactions_endpoint<S>(
    State(state): State<AppState<S>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<TransactionsResponse>, Error>
where
    S: TransactionStore,
{
    let transactions = state.transaction_store.list(session_id)?;

    Ok(Json(TransactionsResponse { transactions }))
}

/// A route handler for getting one of the session's transactions by its ID.
///
/// Responds with 200 OK either way; a transaction that does not exist and a
/// transaction owned by another session look the same to the client.
pub async fn get_transaction_endpoint<S>(
    State(state): State<AppState<S>>,
    Extension(session_id): Extension<SessionId>,
    ValidPath(transaction_id): ValidPath<TransactionId>,
) -> Result<Json<TransactionResponse>, Error>
where
    S: TransactionStore,
{
    let transaction = state.transaction_store.get(transaction_id, session_id)?;

    Ok(Json(TransactionResponse { transaction }))
}

/// A route handler for the sum of the session's transaction amounts.
pub async fn get_summary_endpoint<S>(
    State(state): State<AppState<S>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error>
where
    S: TransactionStore,
{
    let summary = state.transaction_store.summary(session_id)?;

    Ok(Json(SummaryResponse { summary }))
}
