//! Defines the transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    database_id::{SessionId, TransactionId},
    transaction::core::{
        NewTransaction, Summary, Transaction, create_transaction, get_summary, get_transaction,
        get_transactions,
    },
};

/// Handles the creation and retrieval of transactions.
///
/// Every read is scoped to a single session; there is deliberately no way to
/// update or delete a transaction.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction by `id`, if it belongs to `session_id`.
    fn get(&self, id: TransactionId, session_id: SessionId)
    -> Result<Option<Transaction>, Error>;

    /// Retrieve all transactions belonging to `session_id`.
    fn list(&self, session_id: SessionId) -> Result<Vec<Transaction>, Error>;

    /// Sum the amounts of all transactions belonging to `session_id`.
    fn summary(&self, session_id: SessionId) -> Result<Summary, Error>;
}

/// Stores transactions in a SQLite database.
///
/// The database must have been set up with [crate::db::initialize].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn with_connection<T>(
        &self,
        query: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        query(&connection)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        self.with_connection(|connection| create_transaction(new_transaction, connection))
    }

    fn get(
        &self,
        id: TransactionId,
        session_id: SessionId,
    ) -> Result<Option<Transaction>, Error> {
        self.with_connection(|connection| get_transaction(id, session_id, connection))
    }

    fn list(&self, session_id: SessionId) -> Result<Vec<Transaction>, Error> {
        self.with_connection(|connection| get_transactions(session_id, connection))
    }

    fn summary(&self, session_id: SessionId) -> Result<Summary, Error> {
        self.with_connection(|connection| get_summary(session_id, connection))
    }
}
