//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row, named_params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{SessionId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// A credit or debit, i.e. an event where money was either earned or spent.
///
/// Transactions are immutable once stored. To create a new `Transaction`,
/// use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The signed amount of money: positive for credits, negative for debits.
    pub amount: f64,
    /// The session that created, and therefore owns, the transaction.
    pub session_id: SessionId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction owned by `session_id`.
    ///
    /// `amount` is the magnitude entered by the client; its sign in storage
    /// is decided by `kind`. Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        kind: TransactionType,
        session_id: SessionId,
    ) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            amount: kind.signed_amount(amount),
            session_id,
        }
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned. Stored with the amount as given.
    Credit,
    /// Money spent. Stored as the negation of the amount given.
    Debit,
}

impl TransactionType {
    /// Apply the sign for this transaction type to `amount`.
    pub fn signed_amount(self, amount: f64) -> f64 {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        }
    }
}

/// A transaction that has not been stored yet.
///
/// The ID and creation time are assigned by [create_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The signed amount, see [TransactionType::signed_amount].
    pub amount: f64,
    /// The owning session.
    pub session_id: SessionId,
}

/// The total of all transaction amounts for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of the amounts, or `None` if the session has no transactions.
    pub amount: Option<f64>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store `new_transaction` with a freshly generated ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (id, title, amount, session_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount, session_id, created_at",
        )?
        .query_row(
            (
                TransactionId::new(),
                new_transaction.title,
                new_transaction.amount,
                new_transaction.session_id,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` if it belongs to `session_id`.
///
/// Returns `Ok(None)` both when no transaction has that ID and when it
/// belongs to a different session.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    session_id: SessionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE id = :id AND session_id = :session_id",
        )?
        .query_row(
            named_params! { ":id": id, ":session_id": session_id },
            map_transaction_row,
        )
        .optional()?;

    Ok(transaction)
}

/// Retrieve every transaction belonging to `session_id` in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    session_id: SessionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE session_id = :session_id
             ORDER BY rowid",
        )?
        .query_map(&[(":session_id", &session_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Sum the amounts of every transaction belonging to `session_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_summary(session_id: SessionId, connection: &Connection) -> Result<Summary, Error> {
    let amount = connection.query_row(
        "SELECT SUM(amount) FROM transactions WHERE session_id = :session_id",
        &[(":session_id", &session_id)],
        |row| row.get(0),
    )?;

    Ok(Summary { amount })
}

/// Get the total number of transactions in the database, across all sessions.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    // Every read filters on the session.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_session_id ON transactions(session_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let session_id = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        amount,
        session_id,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
