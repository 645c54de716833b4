//! Integration tests for the transparent refresh-and-retry contract.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use helpers::{BackendState, TestBackend, backlog_entry, mint_token};

use storefront_sdk::Storefront;
use storefront_sdk::entity::user::UserRole;
use storefront_sdk::state::{LocalStore, MemoryStore};

/// A client holding a token the backend no longer accepts, plus a
/// refresh token it does.
fn client_with_stale_token(backend: &TestBackend) -> (Storefront, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    // Decodable and unexpired, but unknown to the backend.
    store.put("authToken", &mint_token(UserRole::User)).unwrap();
    store.put("refreshToken", "refresh-1").unwrap();
    let client =
        Storefront::with_store(backend.client_config(), store.clone()).expect("Failed to wire");
    (client, store)
}

#[tokio::test]
async fn test_expired_credential_refreshed_exactly_once() {
    let state = BackendState::default();
    *state.notifications.lock().unwrap() = vec![backlog_entry(1, false)];
    let backend = TestBackend::with_state(state).await;
    let (client, store) = client_with_stale_token(&backend);
    let stale = store.get("authToken").unwrap().unwrap();

    // The first attempt gets a 401; the retry after the refresh succeeds.
    let backlog = client.notifications.my().await.unwrap();

    assert_eq!(backlog.len(), 1);
    assert_eq!(backend.state.refresh_count.load(Ordering::SeqCst), 1);
    // The session now holds the freshly minted pair.
    assert_ne!(store.get("authToken").unwrap().unwrap(), stale);
    assert_eq!(
        store.get("refreshToken").unwrap().unwrap(),
        "refresh-2".to_string()
    );
    assert!(client.session.is_logged_in());
}

#[tokio::test]
async fn test_second_failure_forces_logout() {
    let state = BackendState::default();
    state.fail_refresh.store(true, Ordering::SeqCst);
    let backend = TestBackend::with_state(state).await;
    let (client, store) = client_with_stale_token(&backend);

    let result = client.notifications.my().await;

    let err = result.unwrap_err();
    assert!(err.is_authentication(), "unexpected error: {err}");
    assert!(!client.session.is_logged_in());
    assert_eq!(store.get("authToken").unwrap(), None);
}

#[tokio::test]
async fn test_rejected_retry_forces_logout() {
    let state = BackendState::default();
    state.refresh_mints_stale.store(true, Ordering::SeqCst);
    let backend = TestBackend::with_state(state).await;
    let (client, store) = client_with_stale_token(&backend);

    let result = client.notifications.my().await;

    // The refresh exchange itself succeeded once...
    assert_eq!(backend.state.refresh_count.load(Ordering::SeqCst), 1);
    // ...but the retried request was rejected again, ending the session.
    let err = result.unwrap_err();
    assert!(err.is_authentication(), "unexpected error: {err}");
    assert!(!client.session.is_logged_in());
    assert_eq!(store.get("authToken").unwrap(), None);
}

#[tokio::test]
async fn test_anonymous_login_flow() {
    let backend = TestBackend::start().await;
    let store = Arc::new(MemoryStore::new());
    let client = Storefront::with_store(backend.client_config(), store).expect("Failed to wire");

    assert!(!client.session.is_logged_in());

    let form = storefront_sdk::entity::auth::LoginRequest {
        email: "buyer@example.com".to_string(),
        password: "hunter22".to_string(),
    };
    client.login(&form).await.unwrap();

    assert!(client.session.is_logged_in());
    assert_eq!(client.session.role(), Some(UserRole::User));
}
