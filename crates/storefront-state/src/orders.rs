//! Order tracker: a read-mostly cached order plus its progress projection.

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::warn;

use storefront_client::OrdersClient;
use storefront_core::AppResult;
use storefront_core::types::OrderId;
use storefront_entity::notification::PushPayload;
use storefront_entity::order::{Order, OrderStatus};

/// Snapshot of one order with its tracking projection.
#[derive(Debug, Clone)]
pub struct OrderView {
    /// The cached order.
    pub order: Order,
    /// Wizard step, 1 through 5.
    pub step: u8,
    /// Whether no further transition is expected.
    pub terminal: bool,
    /// Whether the return window is open right now.
    pub returnable: bool,
    /// Whether cancellation is still offered. Delivered and end-of-life
    /// orders cannot be cancelled, only returned.
    pub cancellable: bool,
}

impl OrderView {
    /// Project an order onto its tracking view.
    pub fn project(order: Order) -> Self {
        let now = Utc::now();
        let terminal = order.status.is_terminal();
        Self {
            step: order.status.progress_step(),
            terminal,
            returnable: order.is_returnable_at(now),
            cancellable: !terminal && order.status != OrderStatus::Delivered,
            order,
        }
    }
}

/// Holds the client's cached copy of one order, refreshed on demand and on
/// any push notification. The server owns the lifecycle; the client only
/// re-fetches and re-projects.
pub struct OrderTracker {
    /// Order endpoints.
    orders: OrdersClient,
    /// The tracked order.
    id: OrderId,
    /// Published view, absent until the first successful refresh.
    view_tx: watch::Sender<Option<OrderView>>,
}

impl OrderTracker {
    /// Create a tracker for the given order.
    pub fn new(orders: OrdersClient, id: OrderId) -> Self {
        Self {
            orders,
            id,
            view_tx: watch::channel(None).0,
        }
    }

    /// Observe the tracked order's view.
    pub fn view(&self) -> watch::Receiver<Option<OrderView>> {
        self.view_tx.subscribe()
    }

    /// Re-fetch the order and publish a fresh projection.
    ///
    /// On a fetch failure the previously published view stays in place.
    pub async fn refresh(&self) -> AppResult<()> {
        let order = self.orders.get(self.id).await?;
        self.view_tx.send_replace(Some(OrderView::project(order)));
        Ok(())
    }

    /// Request a return for the tracked order, if its window is open, and
    /// publish the server's updated copy.
    pub async fn request_return(&self) -> AppResult<()> {
        let returnable = self
            .view_tx
            .borrow()
            .as_ref()
            .map(|view| view.returnable)
            .unwrap_or(false);
        if !returnable {
            // The action is disabled client-side; nothing to send.
            return Ok(());
        }
        let order = self.orders.request_return(self.id).await?;
        self.view_tx.send_replace(Some(OrderView::project(order)));
        Ok(())
    }

    /// Cancel the tracked order, if cancellation is still offered, and
    /// drop the cached view pending a refresh.
    pub async fn cancel(&self) -> AppResult<()> {
        let cancellable = self
            .view_tx
            .borrow()
            .as_ref()
            .map(|view| view.cancellable)
            .unwrap_or(false);
        if !cancellable {
            // The action is disabled client-side; nothing to send.
            return Ok(());
        }
        self.orders.cancel(self.id).await?;
        self.refresh().await
    }

    /// Re-fetch the order on every push payload until the channel closes.
    ///
    /// Any push may reflect a status change for this order, so the cached
    /// copy is refreshed unconditionally.
    pub async fn run(&self, mut pushes: broadcast::Receiver<PushPayload>) {
        loop {
            match pushes.recv().await {
                Ok(_) => {
                    if let Err(e) = self.refresh().await {
                        warn!("Order {} refresh after push failed: {}", self.id, e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Order {} push stream lagged by {}", self.id, missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
