//! Live notification delivery.
//!
//! Request handlers hand a created notification to [`NotificationHub::deliver`],
//! which only enqueues it. A single background task drains the queue and fans
//! each record out to every socket registered for the recipient within the
//! same tenant. Sockets are keyed by `(org_id, username)`, so a username that
//! exists in two tenants never sees the other's notifications. Nothing on
//! this path reports back to the request: a full queue, a slow socket or an
//! absent recipient all end in a log line.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::auth::TenantContext;
use crate::config::NotifyConfig;
use crate::database::models::Notification;

pub type ConnectionId = u64;

/// Tenant plus username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecipientKey {
    org_id: String,
    username: String,
}

impl RecipientKey {
    fn new(org_id: &str, username: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            username: username.to_string(),
        }
    }
}

impl std::fmt::Display for RecipientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.org_id, self.username)
    }
}

#[derive(Debug)]
struct Dispatch {
    recipient: RecipientKey,
    payload: String,
}

#[derive(Debug)]
struct Connection {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
}

#[derive(Debug, Default)]
struct Registry {
    connections: DashMap<RecipientKey, Vec<Connection>>,
    next_id: AtomicU64,
}

impl Registry {
    fn fan_out(&self, dispatch: &Dispatch) {
        let mut delivered = 0usize;

        if let Some(mut sockets) = self.connections.get_mut(&dispatch.recipient) {
            sockets.retain(|conn| match conn.tx.try_send(dispatch.payload.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Socket {} for {} is backed up, dropping frame", conn.id, dispatch.recipient);
                    true
                }
                Err(TrySendError::Closed(_)) => false,
            });
        }
        self.connections.remove_if(&dispatch.recipient, |_, sockets| sockets.is_empty());

        tracing::debug!("Delivered notification to {} socket(s) of {}", delivered, dispatch.recipient);
    }
}

/// Cheap to clone; all clones share one queue and one registry
#[derive(Clone, Debug)]
pub struct NotificationHub {
    queue: mpsc::Sender<Dispatch>,
    registry: Arc<Registry>,
    connection_buffer: usize,
}

impl NotificationHub {
    /// Build the hub and spawn its delivery task on the current runtime
    pub fn new(config: &NotifyConfig) -> Self {
        let (queue, mut rx) = mpsc::channel::<Dispatch>(config.queue_capacity.max(1));
        let registry = Arc::new(Registry::default());

        let worker = Arc::clone(&registry);
        tokio::spawn(async move {
            while let Some(dispatch) = rx.recv().await {
                worker.fan_out(&dispatch);
            }
            tracing::info!("Notification delivery task stopped");
        });

        Self {
            queue,
            registry,
            connection_buffer: config.connection_buffer.max(1),
        }
    }

    /// Hand a notification off for live delivery to `notification.recipient`
    /// within `org_id`. Never waits and never fails.
    pub fn deliver(&self, org_id: &str, notification: &Notification) {
        let payload = match serde_json::to_string(notification) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Could not encode notification {}: {}", notification.id, e);
                return;
            }
        };

        let dispatch = Dispatch {
            recipient: RecipientKey::new(org_id, &notification.recipient),
            payload,
        };
        match self.queue.try_send(dispatch) {
            Ok(()) => {}
            Err(TrySendError::Full(d)) => {
                tracing::warn!("Notification queue full, dropping delivery to {}", d.recipient)
            }
            Err(TrySendError::Closed(d)) => {
                tracing::warn!("Notification queue closed, dropping delivery to {}", d.recipient)
            }
        }
    }

    /// Register a live socket for the caller. Frames arrive on the returned receiver.
    pub fn register(&self, ctx: &TenantContext) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.connection_buffer);
        let recipient = RecipientKey::new(&ctx.org_id, &ctx.username);

        tracing::info!("Registered notification socket {} for {}", id, recipient);
        self.registry.connections.entry(recipient).or_default().push(Connection { id, tx });

        (id, rx)
    }

    pub fn unregister(&self, ctx: &TenantContext, id: ConnectionId) {
        let recipient = RecipientKey::new(&ctx.org_id, &ctx.username);
        if let Some(mut sockets) = self.registry.connections.get_mut(&recipient) {
            sockets.retain(|conn| conn.id != id);
        }
        self.registry.connections.remove_if(&recipient, |_, sockets| sockets.is_empty());

        tracing::info!("Unregistered notification socket {} for {}", id, recipient);
    }

    /// Number of live sockets registered for `username` in `org_id`
    pub fn connection_count(&self, org_id: &str, username: &str) -> usize {
        self.registry
            .connections
            .get(&RecipientKey::new(org_id, username))
            .map(|sockets| sockets.len())
            .unwrap_or(0)
    }
}
