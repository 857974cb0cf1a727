//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    session::session_guard,
    transaction::{
        TransactionStore, create_transaction_endpoint, get_summary_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Reading transactions requires a session cookie. Creating a transaction
/// does not, since that is where new sessions are issued.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    let protected_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint::<S>))
        .route(
            endpoints::TRANSACTIONS_SUMMARY,
            get(get_summary_endpoint::<S>),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint::<S>))
        .route_layer(middleware::from_fn(session_guard));

    let unprotected_routes = Router::new().route(
        endpoints::TRANSACTIONS,
        post(create_transaction_endpoint::<S>),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{http::StatusCode, middleware};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::{TestResponse, TestServer};
    use rusqlite::Connection;
    use serde_json::json;
    use uuid::Uuid;

    use crate::{
        AppState, Error, build_router,
        database_id::{SessionId, TransactionId},
        endpoints::{self, format_endpoint},
        session::SESSION_COOKIE,
        transaction::{
            NewTransaction, SQLiteTransactionStore, Summary, SummaryResponse, Transaction,
            TransactionResponse, TransactionStore, TransactionsResponse,
        },
    };

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    /// Post a new transaction, with the session `cookie` if there is one.
    async fn create_transaction(
        server: &TestServer,
        cookie: Option<Cookie<'static>>,
        title: &str,
        amount: f64,
        kind: &str,
    ) -> TestResponse {
        let request = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "title": title, "amount": amount, "type": kind }));

        match cookie {
            Some(cookie) => request.add_cookie(cookie).await,
            None => request.await,
        }
    }

    /// Create a transaction without a cookie and return the newly issued session cookie.
    async fn new_session(
        server: &TestServer,
        title: &str,
        amount: f64,
        kind: &str,
    ) -> Cookie<'static> {
        let response = create_transaction(server, None, title, amount, kind).await;
        response.assert_status(StatusCode::CREATED);

        response.cookie(SESSION_COOKIE)
    }

    async fn list_transactions(server: &TestServer, cookie: Cookie<'static>) -> Vec<Transaction> {
        let response = server.get(endpoints::TRANSACTIONS).add_cookie(cookie).await;
        response.assert_status_ok();

        response.json::<TransactionsResponse>().transactions
    }

    #[tokio::test]
    async fn create_without_cookie_issues_session_and_persists_row() {
        let server = get_test_server();

        let response =
            create_transaction(&server, None, "New transactions", 2000.0, "credit").await;

        response.assert_status(StatusCode::CREATED);
        response.assert_text("");
        let cookie = response.cookie(SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert!(Uuid::parse_str(cookie.value()).is_ok());

        let transactions = list_transactions(&server, cookie.clone()).await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "New transactions");
        assert_eq!(transactions[0].amount, 2000.0);
        assert_eq!(transactions[0].session_id.to_string(), cookie.value());
    }

    #[tokio::test]
    async fn create_with_cookie_does_not_issue_new_session() {
        let server = get_test_server();
        let cookie = new_session(&server, "First", 1.0, "credit").await;

        let response =
            create_transaction(&server, Some(cookie.clone()), "Second", 2.0, "credit").await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
        assert_eq!(list_transactions(&server, cookie).await.len(), 2);
    }

    #[tokio::test]
    async fn debit_is_stored_negated() {
        let server = get_test_server();

        let cookie = new_session(&server, "Rent", 1200.0, "debit").await;

        let transactions = list_transactions(&server, cookie).await;
        assert_eq!(transactions[0].amount, -1200.0);
    }

    #[tokio::test]
    async fn list_is_isolated_between_sessions() {
        let server = get_test_server();
        let alice = new_session(&server, "Alice #1", 10.0, "credit").await;
        let bob = new_session(&server, "Bob #1", 20.0, "credit").await;
        create_transaction(&server, Some(alice.clone()), "Alice #2", 30.0, "debit").await;

        let alice_titles: Vec<_> = list_transactions(&server, alice)
            .await
            .into_iter()
            .map(|transaction| transaction.title)
            .collect();
        let bob_titles: Vec<_> = list_transactions(&server, bob)
            .await
            .into_iter()
            .map(|transaction| transaction.title)
            .collect();

        assert_eq!(alice_titles, ["Alice #1", "Alice #2"]);
        assert_eq!(bob_titles, ["Bob #1"]);
    }

    #[tokio::test]
    async fn get_by_id_returns_own_transaction() {
        let server = get_test_server();
        let cookie = new_session(&server, "Salary", 3000.0, "credit").await;
        let want = list_transactions(&server, cookie.clone()).await.remove(0);

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, want.id))
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<TransactionResponse>().transaction,
            Some(want)
        );
    }

    #[tokio::test]
    async fn get_by_id_does_not_leak_across_sessions() {
        let server = get_test_server();
        let owner = new_session(&server, "Private", 99.0, "credit").await;
        let intruder = new_session(&server, "Other", 1.0, "credit").await;
        let id = list_transactions(&server, owner).await[0].id;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(intruder)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({}));
    }

    #[tokio::test]
    async fn get_by_unknown_id_looks_the_same_as_other_session() {
        let server = get_test_server();
        let cookie = new_session(&server, "Mine", 1.0, "credit").await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, TransactionId::new()))
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({}));
    }

    #[tokio::test]
    async fn get_by_malformed_id_is_bad_request() {
        let server = get_test_server();
        let cookie = new_session(&server, "Mine", 1.0, "credit").await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, "not-a-uuid"))
            .add_cookie(cookie)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn summary_adds_credits_and_debits() {
        let server = get_test_server();
        let cookie = new_session(&server, "Salary", 2000.0, "credit").await;
        create_transaction(&server, Some(cookie.clone()), "Groceries", 500.0, "debit").await;

        let response = server
            .get(endpoints::TRANSACTIONS_SUMMARY)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<SummaryResponse>().summary,
            Summary {
                amount: Some(1500.0)
            }
        );
    }

    #[tokio::test]
    async fn summary_without_transactions_is_null() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS_SUMMARY)
            .add_cookie(Cookie::new(SESSION_COOKIE, SessionId::new().to_string()))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "summary": { "amount": null } }));
    }

    #[tokio::test]
    async fn reads_without_cookie_are_unauthorized() {
        let server = get_test_server();
        let id = TransactionId::new();

        for path in [
            endpoints::TRANSACTIONS.to_owned(),
            endpoints::TRANSACTIONS_SUMMARY.to_owned(),
            format_endpoint(endpoints::TRANSACTION, id),
        ] {
            let response = server.get(&path).await;

            response.assert_status_unauthorized();
            response.assert_json(&json!({ "error": "Unauthorized." }));
        }
    }

    #[tokio::test]
    async fn invalid_bodies_are_rejected_before_writing() {
        let server = get_test_server();
        let cookie = new_session(&server, "Existing", 1.0, "credit").await;

        let invalid_bodies = [
            json!({ "title": "Bad amount", "amount": "100", "type": "credit" }),
            json!({ "title": "Bad type", "amount": 100, "type": "transfer" }),
            json!({ "title": "", "amount": 100, "type": "credit" }),
            json!({ "amount": 100, "type": "credit" }),
        ];

        for body in invalid_bodies {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .add_cookie(cookie.clone())
                .json(&body)
                .await;

            response.assert_status_bad_request();
        }

        assert_eq!(list_transactions(&server, cookie).await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_body_without_cookie_does_not_issue_session() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "title": "", "amount": 1, "type": "credit" }))
            .await;

        response.assert_status_bad_request();
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
    }

    #[tokio::test]
    async fn whitespace_title_is_accepted() {
        let server = get_test_server();

        let cookie = new_session(&server, "   ", 10.0, "credit").await;

        let transactions = list_transactions(&server, cookie).await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "   ");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/budgets").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not found." }));
    }

    /// Wraps a store and counts how many times it is used.
    #[derive(Clone)]
    struct CountingStore {
        inner: SQLiteTransactionStore,
        calls: Arc<AtomicUsize>,
    }

    impl TransactionStore for CountingStore {
        fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.create(new_transaction)
        }

        fn get(
            &self,
            id: TransactionId,
            session_id: SessionId,
        ) -> Result<Option<Transaction>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(id, session_id)
        }

        fn list(&self, session_id: SessionId) -> Result<Vec<Transaction>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list(session_id)
        }

        fn summary(&self, session_id: SessionId) -> Result<Summary, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.summary(session_id)
        }
    }

    fn get_counting_test_server() -> (TestServer, Arc<AtomicUsize>) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::initialize(&conn).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: SQLiteTransactionStore::new(Arc::new(Mutex::new(conn))),
            calls: calls.clone(),
        };
        let server = TestServer::try_new(build_router(AppState::with_store(store)))
            .expect("Could not create test server.");

        (server, calls)
    }

    #[tokio::test]
    async fn unauthorized_and_invalid_requests_do_not_touch_the_store() {
        let (server, calls) = get_counting_test_server();

        server.get(endpoints::TRANSACTIONS).await;
        server.get(endpoints::TRANSACTIONS_SUMMARY).await;
        server
            .get(&format_endpoint(endpoints::TRANSACTION, TransactionId::new()))
            .await;
        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "title": "Bad", "amount": 1, "type": "loan" }))
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_by_logging_layer_without_touching_the_store() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::initialize(&conn).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: SQLiteTransactionStore::new(Arc::new(Mutex::new(conn))),
            calls: calls.clone(),
        };
        let app = build_router(AppState::with_store(store))
            .layer(middleware::from_fn(crate::logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let title = "x".repeat(3 * 1024 * 1024);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "title": title, "amount": 1, "type": "credit" }))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({ "error": "Payload too large." }));
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_create_writes_exactly_once() {
        let (server, calls) = get_counting_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "title": "Good", "amount": 1, "type": "credit" }))
            .await
            .assert_status(StatusCode::CREATED);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
