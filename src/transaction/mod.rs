//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `NewTransaction` builder
//! - Database functions and the `TransactionStore` for storing and querying transactions
//! - Route handlers for creating and reading a session's transactions

mod core;
mod create_endpoint;
mod query_endpoints;
mod store;

pub use core::{NewTransaction, Summary, Transaction, TransactionType, create_transaction_table};
pub use create_endpoint::{CreateTransactionBody, create_transaction_endpoint};
pub use query_endpoints::{
    SummaryResponse, TransactionResponse, TransactionsResponse, get_summary_endpoint,
    get_transaction_endpoint, list_transactions_endpoint,
};
pub use store::{SQLiteTransactionStore, TransactionStore};

#[cfg(test)]
pub use core::{
    count_transactions, create_transaction, get_summary, get_transaction, get_transactions,
};
