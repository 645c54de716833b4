//! Shared test helpers: an in-process stub backend the real client runs
//! against.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use storefront_sdk::config::ClientConfig;
use storefront_sdk::entity::auth::Claims;
use storefront_sdk::entity::user::UserRole;
use storefront_sdk::types::UserId;

/// Mutable state of the stub backend.
#[derive(Default)]
pub struct BackendState {
    /// Notification backlog served on `/api/v1/notifications/me`.
    pub notifications: Mutex<Vec<Value>>,
    /// Ids the client marked as read.
    pub read_ids: Mutex<Vec<i64>>,
    /// Whether mark-all-read was called.
    pub read_all: AtomicBool,
    /// Orders served by id.
    pub orders: Mutex<Vec<Value>>,
    /// Raw query string of the last product search.
    pub product_query: Mutex<Option<String>>,
    /// Bearer tokens the backend accepts.
    pub valid_tokens: Mutex<HashSet<String>>,
    /// Number of refresh exchanges performed.
    pub refresh_count: AtomicUsize,
    /// When set, the refresh endpoint rejects the exchange.
    pub fail_refresh: AtomicBool,
    /// When set, the refresh exchange mints a token the backend will not
    /// accept, so the retried request is rejected again.
    pub refresh_mints_stale: AtomicBool,
    /// Text frames pushed to each WebSocket client after it subscribes.
    pub pushes: Mutex<Vec<String>>,
}

impl BackendState {
    /// Accept the given bearer token.
    pub fn accept_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().insert(token.to_string());
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) else {
            return false;
        };
        let Some(token) = value.strip_prefix("Bearer ") else {
            return false;
        };
        self.valid_tokens.lock().unwrap().contains(token)
    }
}

/// A running stub backend.
pub struct TestBackend {
    /// Bound address.
    pub addr: SocketAddr,
    /// Shared backend state.
    pub state: Arc<BackendState>,
}

impl TestBackend {
    /// Start the backend on an ephemeral port.
    pub async fn start() -> Self {
        Self::with_state(BackendState::default()).await
    }

    /// Start the backend with pre-seeded state.
    pub async fn with_state(state: BackendState) -> Self {
        init_tracing();
        let state = Arc::new(state);

        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/v1/notifications/me", get(my_notifications))
            .route("/api/v1/notifications/me/unread-count", get(unread_count))
            .route("/api/v1/notifications/me/read-all", post(read_all))
            .route("/api/v1/notifications/{id}/read", post(mark_read))
            .route("/api/orders/{id}", get(get_order))
            .route("/api/orders/{id}/return", put(return_order))
            .route("/api/products", get(search_products))
            .route("/ws", get(ws_upgrade))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Stub backend died");
        });

        Self { addr, state }
    }

    /// Client configuration pointing at this backend.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}", self.addr);
        config.realtime.url = format!("ws://{}/ws", self.addr);
        // Tests should not wait out the production reconnect delay.
        config.realtime.reconnect.initial_delay_ms = 50;
        config.realtime.reconnect.max_delay_ms = 200;
        config
    }
}

/// Install the test log subscriber once per process.
fn init_tracing() {
    static TRACING: std::sync::Once = std::sync::Once::new();
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A storefront client whose session already holds a token the backend
/// accepts.
pub fn logged_in_client(backend: &TestBackend) -> storefront_sdk::Storefront {
    use storefront_sdk::state::LocalStore;

    let store = Arc::new(storefront_sdk::state::MemoryStore::new());
    let token = mint_token(UserRole::User);
    backend.state.accept_token(&token);
    store.put("authToken", &token).unwrap();
    store.put("refreshToken", "refresh-1").unwrap();
    storefront_sdk::Storefront::with_store(backend.client_config(), store)
        .expect("Failed to wire client")
}

/// Poll until the condition holds, for at most five seconds.
pub async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    panic!("Timed out waiting for {what}");
}

/// Mint a decodable access token with a one-hour lifetime.
pub fn mint_token(role: UserRole) -> String {
    let claims = Claims {
        sub: Some("buyer@example.com".to_string()),
        user_id: Some(UserId::from_i64(7)),
        role: Some(role),
        exp: Utc::now().timestamp() + 3600,
        iat: Some(Utc::now().timestamp()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"stub-backend-secret"),
    )
    .expect("Failed to mint token")
}

/// A notification backlog entry.
pub fn backlog_entry(id: i64, is_read: bool) -> Value {
    json!({
        "id": id,
        "type": "ORDER_STATUS_CHANGED",
        "message": format!("update {id}"),
        "isRead": is_read,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// An order fixture delivered the given number of days ago.
pub fn delivered_order(id: i64, days_ago: i64) -> Value {
    let delivered_at = Utc::now() - chrono::Duration::days(days_ago);
    json!({
        "id": id,
        "userEmail": "buyer@example.com",
        "createdAt": (delivered_at - chrono::Duration::days(3)).to_rfc3339(),
        "savings": 10.0,
        "shippingAddress": "1 Main St",
        "totalAmount": 90.0,
        "withoutDiscountAmount": 100.0,
        "status": "DELIVERED",
        "items": [
            {"productId": 5, "productName": "Widget", "quantity": 2, "unitPrice": 50.0}
        ],
        "statusHistory": [
            {"status": "PLACED", "timestamp": (delivered_at - chrono::Duration::days(3)).to_rfc3339()},
            {"status": "DELIVERED", "timestamp": delivered_at.to_rfc3339()}
        ],
    })
}

async fn login(State(state): State<Arc<BackendState>>, Json(_body): Json<Value>) -> Json<Value> {
    let access = mint_token(UserRole::User);
    state.accept_token(&access);
    Json(json!({"accessToken": access, "refreshToken": "refresh-1"}))
}

async fn refresh(
    State(state): State<Arc<BackendState>>,
    Json(_body): Json<Value>,
) -> impl IntoResponse {
    if state.fail_refresh.load(Ordering::SeqCst) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "refresh rejected"})));
    }
    state.refresh_count.fetch_add(1, Ordering::SeqCst);
    let access = mint_token(UserRole::User);
    if !state.refresh_mints_stale.load(Ordering::SeqCst) {
        state.accept_token(&access);
    }
    (
        StatusCode::OK,
        Json(json!({"accessToken": access, "refreshToken": "refresh-2"})),
    )
}

async fn my_notifications(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !state.is_authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!([])));
    }
    let backlog = state.notifications.lock().unwrap().clone();
    (StatusCode::OK, Json(Value::Array(backlog)))
}

async fn unread_count(State(state): State<Arc<BackendState>>) -> Json<Value> {
    let count = state
        .notifications
        .lock()
        .unwrap()
        .iter()
        .filter(|n| n.get("isRead").and_then(Value::as_bool) == Some(false))
        .count();
    Json(json!(count))
}

async fn mark_read(State(state): State<Arc<BackendState>>, Path(id): Path<i64>) -> StatusCode {
    state.read_ids.lock().unwrap().push(id);
    let mut backlog = state.notifications.lock().unwrap();
    for entry in backlog.iter_mut() {
        if entry.get("id").and_then(Value::as_i64) == Some(id) {
            entry["isRead"] = json!(true);
        }
    }
    StatusCode::OK
}

async fn read_all(State(state): State<Arc<BackendState>>) -> StatusCode {
    state.read_all.store(true, Ordering::SeqCst);
    let mut backlog = state.notifications.lock().unwrap();
    for entry in backlog.iter_mut() {
        entry["isRead"] = json!(true);
    }
    StatusCode::OK
}

async fn get_order(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let orders = state.orders.lock().unwrap();
    match orders
        .iter()
        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id))
    {
        Some(order) => (StatusCode::OK, Json(order.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "no such order"}))),
    }
}

async fn return_order(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut orders = state.orders.lock().unwrap();
    match orders
        .iter_mut()
        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id))
    {
        Some(order) => {
            order["status"] = json!("RETURN_REQUESTED");
            (StatusCode::OK, Json(order.clone()))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "no such order"}))),
    }
}

async fn search_products(
    State(state): State<Arc<BackendState>>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    *state.product_query.lock().unwrap() = query;
    Json(json!({
        "content": [],
        "totalPages": 0,
        "totalElements": 0,
        "size": 10,
        "number": 0
    }))
}

async fn ws_upgrade(
    State(state): State<Arc<BackendState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: Arc<BackendState>) {
    // Wait for the client's first subscribe frame.
    while let Some(Ok(frame)) = socket.recv().await {
        if let Message::Text(text) = frame {
            if text.contains("subscribe") {
                break;
            }
        }
    }

    let pushes: Vec<String> = state.pushes.lock().unwrap().clone();
    for push in pushes {
        if socket.send(Message::Text(push.into())).await.is_err() {
            return;
        }
    }

    // Hold the connection open until the client goes away.
    while let Some(Ok(_)) = socket.recv().await {}
}
