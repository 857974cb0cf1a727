//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, transaction::SQLiteTransactionStore};

/// The state of the REST server.
///
/// Generic over the store so handlers can be exercised against any
/// [TransactionStore](crate::transaction::TransactionStore) implementation.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    /// The store for managing [transactions](crate::transaction::Transaction).
    pub transaction_store: S,
}

impl AppState<SQLiteTransactionStore> {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self::with_store(SQLiteTransactionStore::new(connection)))
    }
}

impl<S> AppState<S> {
    /// Create a new [AppState] around an existing store.
    pub fn with_store(transaction_store: S) -> Self {
        Self { transaction_store }
    }
}
