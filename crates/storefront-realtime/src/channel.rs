//! Push channel connection lifecycle.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tracing::{debug, info, warn};
use uuid::Uuid;

use storefront_core::config::realtime::RealtimeConfig;
use storefront_core::{AppError, AppResult};
use storefront_entity::notification::{Audience, PushPayload};

use crate::backoff::ReconnectPolicy;
use crate::message::{self, ClientFrame};

/// A live push channel.
///
/// Owns a background task that keeps the WebSocket connected: on drop of
/// the remote connection it waits out the backoff policy and reconnects,
/// re-subscribing the audience's destinations. Payloads fan out to every
/// [`subscribe`](Self::subscribe)d receiver.
///
/// [`close`](Self::close) stops local delivery and the background task; it
/// does not cancel requests already in flight on the server.
#[derive(Debug)]
pub struct PushChannel {
    /// Fan-out sender for delivered payloads.
    sender: broadcast::Sender<PushPayload>,
    /// The connection maintenance task.
    task: JoinHandle<()>,
}

impl PushChannel {
    /// Open the channel with the bearer credential attached at connect
    /// time. Returns immediately; connection happens in the background.
    pub fn connect(config: RealtimeConfig, audience: Audience, token: String) -> Self {
        let (sender, _) = broadcast::channel(config.channel_buffer_size);
        let fanout = sender.clone();
        let task = tokio::spawn(run(config, audience, token, fanout));
        Self { sender, task }
    }

    /// Register a new local subscriber.
    ///
    /// Payloads pushed before the subscription are not replayed; callers
    /// that merge with a pulled backlog must subscribe before triggering
    /// the events they care about.
    pub fn subscribe(&self) -> broadcast::Receiver<PushPayload> {
        self.sender.subscribe()
    }

    /// Stop the background task and local delivery.
    pub fn close(&self) {
        self.task.abort();
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Connection maintenance loop: connect, pump, back off, repeat.
async fn run(
    config: RealtimeConfig,
    audience: Audience,
    token: String,
    fanout: broadcast::Sender<PushPayload>,
) {
    let mut policy = ReconnectPolicy::new(config.reconnect.clone());

    loop {
        match session(&config.url, audience, &token, &fanout, &mut policy).await {
            Ok(()) => info!("Push channel closed by server"),
            Err(e) => warn!("Push channel error: {}", e),
        }

        let delay = policy.next_delay();
        info!("Reconnecting push channel in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

/// One connection: subscribe the audience's destinations, then pump
/// frames into the fan-out until the connection drops.
async fn session(
    url: &str,
    audience: Audience,
    token: &str,
    fanout: &broadcast::Sender<PushPayload>,
    policy: &mut ReconnectPolicy,
) -> AppResult<()> {
    let connection_id = Uuid::new_v4();

    let mut request = url
        .into_client_request()
        .map_err(|e| AppError::configuration(format!("Invalid push channel URL: {e}")))?;
    request.headers_mut().insert(
        AUTHORIZATION,
        format!("Bearer {token}")
            .parse()
            .map_err(|_| AppError::configuration("Bearer token is not a valid header value"))?,
    );

    let (stream, _) = connect_async(request)
        .await
        .map_err(|e| AppError::transport(format!("Push channel connect failed: {e}")))?;

    info!("Push channel {} connected", connection_id);
    policy.reset();

    let (mut write, mut read) = stream.split();

    for destination in message::destinations_for(audience) {
        let frame = ClientFrame::Subscribe {
            destination: destination.to_string(),
        };
        let body = serde_json::to_string(&frame)?;
        write
            .send(Message::Text(body.into()))
            .await
            .map_err(|e| AppError::transport(format!("Subscribe to {destination} failed: {e}")))?;
    }

    while let Some(frame) = read.next().await {
        let frame =
            frame.map_err(|e| AppError::transport(format!("Push channel read failed: {e}")))?;
        match frame {
            Message::Text(body) => {
                let payload = message::parse_payload(body.as_str());
                debug!(
                    "Push channel {} delivering '{}' payload",
                    connection_id, payload.kind
                );
                // No subscribers yet is not an error.
                let _ = fanout.send(payload);
            }
            Message::Close(_) => return Ok(()),
            // Pings are answered by the transport.
            _ => {}
        }
    }

    Ok(())
}
