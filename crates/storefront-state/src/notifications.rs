//! Notification center: merges the pulled backlog with the live push
//! stream and keeps the unread counter consistent.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use storefront_client::NotificationApi;
use storefront_core::AppResult;
use storefront_core::types::NotificationId;
use storefront_entity::notification::{Audience, Notification, PushPayload};

/// A single reactive notification list plus an unread counter, fed by two
/// independent sources: an initial REST pull and a live push stream.
///
/// The counter invariant (unread count equals the number of entries with
/// `is_read == false`) holds as long as every mutation goes through the
/// entry points below; the backing fields are never exposed, only `watch`
/// snapshots.
///
/// Sequencing contract: [`load`](Self::load) replaces the whole list, so
/// a push that arrives before the load completes is overwritten by it.
/// Callers must let `load` finish before draining the push stream into
/// [`on_push`](Self::on_push).
pub struct NotificationCenter {
    /// Remote notification operations.
    api: Arc<dyn NotificationApi>,
    /// Which feed this center pulls.
    audience: Audience,
    /// Published notification list, most recent first.
    list_tx: watch::Sender<Vec<Notification>>,
    /// Published unread counter.
    unread_tx: watch::Sender<u64>,
}

impl NotificationCenter {
    /// Create a center for the given audience. The list starts empty; call
    /// [`load`](Self::load) to pull the backlog.
    pub fn new(api: Arc<dyn NotificationApi>, audience: Audience) -> Self {
        Self {
            api,
            audience,
            list_tx: watch::channel(Vec::new()).0,
            unread_tx: watch::channel(0).0,
        }
    }

    /// Observe the notification list.
    pub fn notifications(&self) -> watch::Receiver<Vec<Notification>> {
        self.list_tx.subscribe()
    }

    /// Observe the unread counter.
    pub fn unread_count(&self) -> watch::Receiver<u64> {
        self.unread_tx.subscribe()
    }

    /// Current unread counter value.
    pub fn current_unread(&self) -> u64 {
        *self.unread_tx.borrow()
    }

    /// Pull the full backlog, replacing the list and overwriting the
    /// counter with the count of unread entries.
    ///
    /// On a fetch failure local state is left unchanged.
    pub async fn load(&self) -> AppResult<()> {
        let list = self.api.fetch(self.audience).await?;
        let unread = list.iter().filter(|n| n.is_unread()).count() as u64;
        self.list_tx.send_replace(list);
        self.unread_tx.send_replace(unread);
        Ok(())
    }

    /// Fold a live push into the list: a synthesized unread entry is
    /// prepended and the counter grows by exactly one.
    pub fn on_push(&self, payload: &PushPayload) {
        let notification = Notification::from_push(payload, Utc::now());
        self.list_tx
            .send_modify(|list| list.insert(0, notification));
        self.unread_tx.send_modify(|count| *count += 1);
    }

    /// Mark one notification as read.
    ///
    /// No-op if the entry is already read. The remote call happens first;
    /// only on success are the local flag and counter touched.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let needs_remote = {
            let list = self.list_tx.borrow();
            match list.iter().find(|n| n.id == Some(id)) {
                Some(entry) => entry.is_unread(),
                None => {
                    debug!("mark_read for unknown notification {}", id);
                    false
                }
            }
        };
        if !needs_remote {
            return Ok(());
        }

        self.api.mark_read(id).await?;

        self.list_tx.send_modify(|list| {
            if let Some(entry) = list.iter_mut().find(|n| n.id == Some(id)) {
                entry.is_read = true;
            }
        });
        self.unread_tx
            .send_modify(|count| *count = count.saturating_sub(1));
        Ok(())
    }

    /// Mark every notification as read and zero the counter.
    ///
    /// The remote call happens first; on failure local state is untouched.
    pub async fn mark_all_read(&self) -> AppResult<()> {
        self.api.mark_all_read().await?;

        self.list_tx.send_modify(|list| {
            for entry in list.iter_mut() {
                entry.is_read = true;
            }
        });
        self.unread_tx.send_replace(0);
        Ok(())
    }

    /// Drain a push channel receiver into [`on_push`](Self::on_push) until
    /// the channel closes.
    pub async fn run(&self, mut pushes: broadcast::Receiver<PushPayload>) {
        loop {
            match pushes.recv().await {
                Ok(payload) => self.on_push(&payload),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Notification stream lagged, {} pushes dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
