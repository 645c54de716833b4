//! Storefront SDK — typed client for the storefront REST + WebSocket
//! backend.
//!
//! Facade crate that wires the member crates together: configuration and
//! errors from `storefront-core`, domain models from `storefront-entity`,
//! REST clients from `storefront-client`, the push channel from
//! `storefront-realtime`, and the client-owned state stores from
//! `storefront-state`.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

pub use storefront_client as client;
pub use storefront_entity as entity;
pub use storefront_realtime as realtime;
pub use storefront_state as state;

pub use storefront_core::config::ClientConfig;
pub use storefront_core::{AppError, AppResult, config, error, types};

use storefront_client::http::TokenSource;
use storefront_client::{
    AddressesClient, AdminClient, AuthClient, HttpClient, NotificationsClient, OrdersClient,
    ProductsClient,
};
use storefront_core::config::logging::LoggingConfig;
use storefront_core::types::OrderId;
use storefront_entity::auth::LoginRequest;
use storefront_entity::notification::Audience;
use storefront_realtime::PushChannel;
use storefront_state::{
    CartStore, FileStore, LocalStore, NotificationCenter, OrderTracker, SessionStore,
};

/// Initialize tracing/logging from the loaded configuration.
///
/// Call once at startup from the embedding application; the SDK never
/// installs a subscriber on its own.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// One wired-up storefront client.
///
/// Construction rehydrates persisted state (tokens, cart) from the local
/// store; all REST clients share the HTTP pool and the session's
/// refresh-and-retry credential handling.
pub struct Storefront {
    /// The loaded configuration.
    pub config: ClientConfig,
    /// Session and token holder.
    pub session: Arc<SessionStore>,
    /// Auth endpoints.
    pub auth: AuthClient,
    /// Notification endpoints.
    pub notifications: NotificationsClient,
    /// Order endpoints.
    pub orders: OrdersClient,
    /// Product catalog endpoints.
    pub products: ProductsClient,
    /// Back-office endpoints.
    pub admin: AdminClient,
    /// Address endpoints.
    pub addresses: AddressesClient,
    /// The persistent cart.
    pub cart: CartStore,
}

impl Storefront {
    /// Wire a client against the file-backed local store from the config.
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(&config.store.path)?);
        Self::with_store(config, store)
    }

    /// Wire a client against an explicit local store implementation.
    pub fn with_store(config: ClientConfig, store: Arc<dyn LocalStore>) -> AppResult<Self> {
        let base = HttpClient::new(&config.api)?;
        let session = Arc::new(SessionStore::new(
            store.clone(),
            AuthClient::new(base.clone()),
            &config.store,
        )?);
        let http = base.with_token_source(session.clone());
        let cart = CartStore::open(store, &config.store)?;

        Ok(Self {
            session,
            auth: AuthClient::new(http.clone()),
            notifications: NotificationsClient::new(http.clone()),
            orders: OrdersClient::new(http.clone()),
            products: ProductsClient::new(http.clone()),
            admin: AdminClient::new(http.clone()),
            addresses: AddressesClient::new(http),
            cart,
            config,
        })
    }

    /// Log in and store the issued token pair.
    pub async fn login(&self, form: &LoginRequest) -> AppResult<()> {
        let tokens = self.auth.login(form).await?;
        self.session.login(&tokens)
    }

    /// Audience of the current principal, derived from the token's role.
    pub fn audience(&self) -> Audience {
        match self.session.role() {
            Some(role) if role.is_admin() => Audience::Admin,
            _ => Audience::User,
        }
    }

    /// Open the push channel with the current credential.
    pub fn connect_push(&self) -> AppResult<PushChannel> {
        let token = self
            .session
            .access_token()
            .ok_or_else(|| AppError::authentication("Cannot open push channel while logged out"))?;
        Ok(PushChannel::connect(
            self.config.realtime.clone(),
            self.audience(),
            token,
        ))
    }

    /// Build a notification center for the current principal.
    pub fn notification_center(&self) -> NotificationCenter {
        NotificationCenter::new(Arc::new(self.notifications.clone()), self.audience())
    }

    /// Start tracking one order.
    pub fn track_order(&self, id: OrderId) -> OrderTracker {
        OrderTracker::new(self.orders.clone(), id)
    }
}
