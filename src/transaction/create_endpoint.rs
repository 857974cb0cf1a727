//! Defines the endpoint for creating a new transaction.

use axum::{extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::SessionId,
    session::{get_session_id, set_session_cookie},
    transaction::{Transaction, TransactionStore, TransactionType},
    validation::{FieldError, ValidJson, Validate},
};

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionBody {
    /// Text detailing the transaction.
    pub title: String,
    /// The magnitude of the transaction, the sign is taken from `kind`.
    pub amount: f64,
    /// Whether the money came in or went out.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Validate for CreateTransactionBody {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.title.is_empty() {
            errors.push(FieldError::new("title", "must not be empty"));
        }

        if !self.amount.is_finite() {
            errors.push(FieldError::new("amount", "must be a finite number"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A route handler for creating a new transaction, responds with 201 Created and an empty body.
///
/// Clients without a session cookie are issued a new session, which is
/// returned to them in the `sessionId` cookie.
pub async fn create_transaction_endpoint<S>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    ValidJson(body): ValidJson<CreateTransactionBody>,
) -> Result<(StatusCode, CookieJar), Error>
where
    S: TransactionStore,
{
    let (session_id, jar) = match get_session_id(&jar) {
        Some(session_id) => (session_id, jar),
        None => {
            let session_id = SessionId::new();
            tracing::info!("Issuing new session {session_id}");

            (session_id, set_session_cookie(jar, session_id))
        }
    };

    let transaction = Transaction::build(&body.title, body.amount, body.kind, session_id);

    state
        .transaction_store
        .create(transaction)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, jar))
}
