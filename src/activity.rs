use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{Role, Session};

/// Buffered events per feed before the producer waits
const FEED_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PropertySubmitted,
    PropertyApproved,
    PropertyRejected,
    PropertyUpdated,
    InquiryReceived,
    ProviderRegistered,
    ProviderStatusChanged,
}

/// Something that happened on the platform, as shown in activity feeds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub kind: ActivityKind,
    pub actor_id: String,
    /// Provider the event concerns, if any
    pub provider_id: Option<String>,
    pub subject_id: String,
    pub message: String,
    pub at: DateTime<Utc>,
    /// Position in the source's log, assigned on publish; 0 until then
    #[serde(default)]
    pub sequence: u64,
}

impl ActivityEvent {
    pub fn new(
        kind: ActivityKind,
        actor_id: impl Into<String>,
        subject_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            actor_id: actor_id.into(),
            provider_id: None,
            subject_id: subject_id.into(),
            message: message.into(),
            at: Utc::now(),
            sequence: 0,
        }
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }
}

/// Where activity comes from: a push channel, with polling as the fallback
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Open a push subscription. The receiver closes when the channel drops.
    async fn subscribe(&self) -> AnyResult<mpsc::Receiver<ActivityEvent>>;

    /// Events with a sequence above `after`, in publish order; everything when `after` is 0
    async fn poll(&self, after: u64) -> AnyResult<Vec<ActivityEvent>>;
}

/// Who a feed is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every event on the platform
    Admin,
    /// Events concerning one provider's account and listings
    Provider(String),
}

impl Audience {
    pub fn admits(&self, session: &Session) -> bool {
        match self {
            Audience::Admin => session.is_admin(),
            Audience::Provider(id) => {
                session.is_admin() || (session.role == Role::Provider && &session.user_id == id)
            }
        }
    }

    pub fn wants(&self, event: &ActivityEvent) -> bool {
        match self {
            Audience::Admin => true,
            Audience::Provider(id) => event.provider_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// A running activity feed.
///
/// Dropping the feed, calling [`ActivityFeed::stop`], or a failed
/// [`ActivityFeed::revalidate`] tears the background task down.
pub struct ActivityFeed {
    audience: Audience,
    events: mpsc::Receiver<ActivityEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ActivityFeed {
    pub fn start(
        source: Arc<dyn ActivitySource>,
        session: &Session,
        audience: Audience,
        poll_interval: Duration,
    ) -> Result<Self> {
        if !audience.admits(session) {
            return Err(CatalogError::Unauthorized(
                "this activity feed is not available to you".to_string(),
            ));
        }

        let (tx, events) = mpsc::channel(FEED_BUFFER);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_feed(
            source,
            audience.clone(),
            poll_interval,
            tx,
            shutdown_rx,
        ));
        info!(?audience, user = %session.user_id, "Started activity feed");

        Ok(Self {
            audience,
            events,
            shutdown: Some(shutdown),
            task,
        })
    }

    /// Next event, or `None` once the feed has stopped
    pub async fn next(&mut self) -> Option<ActivityEvent> {
        self.events.recv().await
    }

    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
            debug!(audience = ?self.audience, "Stopped activity feed");
        }
    }

    /// Stop the feed if `session` no longer qualifies. Returns whether it keeps running.
    pub fn revalidate(&mut self, session: &Session) -> bool {
        if !self.audience.admits(session) {
            info!(user = %session.user_id, "Session lost access to activity feed");
            self.stop();
        }
        self.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_some() && !self.task.is_finished()
    }
}

impl Drop for ActivityFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_feed(
    source: Arc<dyn ActivitySource>,
    audience: Audience,
    poll_interval: Duration,
    tx: mpsc::Sender<ActivityEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut last_seen = 0;

    match source.subscribe().await {
        Ok(mut pushed) => loop {
            tokio::select! {
                _ = &mut shutdown => return,
                event = pushed.recv() => match event {
                    Some(event) => {
                        last_seen = last_seen.max(event.sequence);
                        if audience.wants(&event) && !deliver(&tx, event, &mut shutdown).await {
                            return;
                        }
                    }
                    None => {
                        warn!("Activity subscription closed, polling every {poll_interval:?}");
                        break;
                    }
                }
            }
        },
        Err(err) => {
            warn!("Activity subscription failed, polling every {poll_interval:?}: {err:#}");
        }
    }

    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            _ = ticker.tick() => {
                let events = match source.poll(last_seen).await {
                    Ok(events) => events,
                    Err(err) => {
                        // Connectivity problems stay out of the UI
                        debug!("Activity poll failed: {err:#}");
                        continue;
                    }
                };
                for event in events {
                    if event.sequence <= last_seen {
                        continue;
                    }
                    last_seen = event.sequence;
                    if audience.wants(&event) && !deliver(&tx, event, &mut shutdown).await {
                        return;
                    }
                }
            }
        }
    }
}

/// Hand one event to the feed. False when the feed is gone or shutting down.
async fn deliver(
    tx: &mpsc::Sender<ActivityEvent>,
    event: ActivityEvent,
    shutdown: &mut oneshot::Receiver<()>,
) -> bool {
    tokio::select! {
        _ = shutdown => false,
        sent = tx.send(event) => sent.is_ok(),
    }
}

/// In-process activity source backed by a tokio broadcast channel
pub struct BroadcastActivitySource {
    live: broadcast::Sender<ActivityEvent>,
    history: Mutex<Vec<ActivityEvent>>,
    fail_subscriptions: AtomicBool,
    forwarders: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for BroadcastActivitySource {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastActivitySource {
    pub fn new() -> Self {
        let (live, _) = broadcast::channel(FEED_BUFFER);
        Self {
            live,
            history: Mutex::new(Vec::new()),
            fail_subscriptions: AtomicBool::new(false),
            forwarders: Mutex::new(Vec::new()),
        }
    }

    /// Append to the log and push to live subscribers. Returns the assigned sequence.
    pub fn publish(&self, mut event: ActivityEvent) -> u64 {
        let Ok(mut history) = self.history.lock() else {
            warn!("Activity history lock poisoned, dropping event {}", event.id);
            return 0;
        };
        let sequence = history.len() as u64 + 1;
        event.sequence = sequence;
        history.push(event.clone());
        // Sent under the lock so push order matches sequence order.
        // No live subscribers is fine; pollers read the history
        let _ = self.live.send(event);
        sequence
    }

    /// Refuse new subscriptions, as if the realtime service were down
    pub fn set_fail_subscriptions(&self, fail: bool) {
        self.fail_subscriptions.store(fail, Ordering::SeqCst);
    }

    /// Drop every open subscription
    pub fn disconnect(&self) {
        if let Ok(mut forwarders) = self.forwarders.lock() {
            for forwarder in forwarders.drain(..) {
                forwarder.abort();
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.live.receiver_count()
    }
}

#[async_trait]
impl ActivitySource for BroadcastActivitySource {
    async fn subscribe(&self) -> AnyResult<mpsc::Receiver<ActivityEvent>> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            anyhow::bail!("realtime channel unavailable");
        }

        let mut live = self.live.subscribe();
        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        let forwarder = tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    _ = tx.closed() => break,
                    received = live.recv() => received,
                };
                match received {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Activity subscriber lagged, skipped {skipped} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let mut forwarders = self
            .forwarders
            .lock()
            .map_err(|_| anyhow::anyhow!("forwarder list lock poisoned"))?;
        forwarders.retain(|handle| !handle.is_finished());
        forwarders.push(forwarder);
        Ok(rx)
    }

    async fn poll(&self, after: u64) -> AnyResult<Vec<ActivityEvent>> {
        let history = self
            .history
            .lock()
            .map_err(|_| anyhow::anyhow!("activity history lock poisoned"))?;
        // Sequence n sits at index n - 1
        let start = usize::try_from(after).unwrap_or(usize::MAX).min(history.len());
        Ok(history[start..].to_vec())
    }
}
