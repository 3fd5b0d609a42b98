//! BLE connection management.
//!
//! Connects to a thermometer with bounded retries, tracks the link state and
//! reconnects when the adapter reports the link dropped.

use std::sync::{Arc, Weak};
use std::time::Duration;

use btleplug::api::{Central, CentralEvent, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use futures::stream::StreamExt;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ThermometerConfig;
use crate::error::{Error, Result};

/// Link state of a thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No link.
    #[default]
    Disconnected,
    /// Connecting and discovering services.
    Connecting,
    /// Link up and services discovered.
    Connected,
    /// Tearing the link down.
    Disconnecting,
}

impl ConnectionState {
    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if in a transitional state.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Connecting | Self::Disconnecting)
    }

    /// Get a human-readable name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnecting => "Disconnecting",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Emitted whenever the link state changes.
#[derive(Debug, Clone)]
pub struct ConnectionEvent {
    /// Platform identifier of the peripheral.
    pub identifier: String,
    /// State before the change.
    pub previous: ConnectionState,
    /// State after the change.
    pub state: ConnectionState,
}

/// Retry settings for connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts made when maintaining the connection. Never zero.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
    /// Bound on a single attempt, including service discovery.
    pub attempt_timeout: Duration,
}

impl ReconnectPolicy {
    /// Take the retry settings from a thermometer config.
    pub fn from_config(config: &ThermometerConfig) -> Self {
        Self {
            max_attempts: config.connect_attempts.max(1),
            delay: config.reconnect_delay,
            attempt_timeout: config.operation_timeout,
        }
    }

    /// Attempts for one `connect` call.
    pub fn attempts(&self, maintain: bool) -> u32 {
        if maintain {
            self.max_attempts
        } else {
            1
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_config(&ThermometerConfig::default())
    }
}

/// Shared link state that broadcasts every change.
#[derive(Debug, Clone)]
pub(crate) struct LinkState {
    identifier: String,
    state: Arc<RwLock<ConnectionState>>,
    maintain: Arc<RwLock<bool>>,
    event_tx: broadcast::Sender<ConnectionEvent>,
}

impl LinkState {
    pub(crate) fn new(identifier: String) -> Self {
        let (event_tx, _) = broadcast::channel(16);

        Self {
            identifier,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            maintain: Arc::new(RwLock::new(false)),
            event_tx,
        }
    }

    pub(crate) fn get(&self) -> ConnectionState {
        *self.state.read()
    }

    pub(crate) fn set(&self, new_state: ConnectionState) {
        let previous = std::mem::replace(&mut *self.state.write(), new_state);

        if previous != new_state {
            debug!("Connection state changed: {} -> {}", previous, new_state);

            let _ = self.event_tx.send(ConnectionEvent {
                identifier: self.identifier.clone(),
                previous,
                state: new_state,
            });
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn set_maintain(&self, maintain: bool) {
        *self.maintain.write() = maintain;
    }

    pub(crate) fn is_maintaining(&self) -> bool {
        *self.maintain.read()
    }

    /// Record that the link dropped underneath us.
    ///
    /// Returns true when a reconnect should follow. A drop reported after a
    /// requested disconnect changes nothing.
    pub(crate) fn mark_lost(&self) -> bool {
        if matches!(
            self.get(),
            ConnectionState::Disconnected | ConnectionState::Disconnecting
        ) {
            return false;
        }

        self.set(ConnectionState::Disconnected);
        self.is_maintaining()
    }
}

/// Owns the link to one thermometer.
pub struct ConnectionManager {
    peripheral: Peripheral,
    link: LinkState,
    policy: RwLock<ReconnectPolicy>,
    watcher: RwLock<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    /// Create a manager with default retry settings.
    pub fn new(peripheral: Peripheral) -> Self {
        Self::with_config(peripheral, &ThermometerConfig::default())
    }

    /// Create a manager using the retry settings from `config`.
    pub fn with_config(peripheral: Peripheral, config: &ThermometerConfig) -> Self {
        let link = LinkState::new(format!("{:?}", peripheral.id()));

        Self {
            peripheral,
            link,
            policy: RwLock::new(ReconnectPolicy::from_config(config)),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.link.get()
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Subscribe to connection state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.link.subscribe()
    }

    /// Get the peripheral.
    pub fn peripheral(&self) -> &Peripheral {
        &self.peripheral
    }

    pub(crate) fn link(&self) -> &LinkState {
        &self.link
    }

    /// Connect and discover services.
    ///
    /// With `maintain` set, up to the configured number of attempts are made
    /// and a link loss seen by [`watch_disconnections`](Self::watch_disconnections)
    /// triggers a reconnect. Otherwise a single attempt is made.
    pub async fn connect(&self, maintain: bool) -> Result<()> {
        let current = self.state();

        if current.is_connected() {
            debug!("Already connected");
            return Ok(());
        }

        if current.is_transitioning() {
            return Err(Error::ConnectionFailed {
                reason: format!("connection is {}", current.name().to_lowercase()),
            });
        }

        self.link.set_maintain(maintain);
        self.link.set(ConnectionState::Connecting);

        let policy = self.reconnect_policy();
        let max_attempts = policy.attempts(maintain);
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            debug!("Connection attempt {} of {}", attempt, max_attempts);

            match self.try_connect(policy.attempt_timeout).await {
                Ok(()) => {
                    info!("Connected to thermometer after {} attempt(s)", attempt);
                    self.link.set(ConnectionState::Connected);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Connection attempt {} failed: {}", attempt, e);
                    last_failure = e.to_string();

                    if attempt < max_attempts {
                        tokio::time::sleep(policy.delay).await;
                    }
                }
            }
        }

        self.link.set(ConnectionState::Disconnected);
        Err(Error::ConnectionFailed {
            reason: format!("failed after {max_attempts} attempt(s): {last_failure}"),
        })
    }

    async fn try_connect(&self, timeout: Duration) -> Result<()> {
        let connect = async {
            if !self.peripheral.is_connected().await? {
                self.peripheral.connect().await?;
            } else {
                debug!("Peripheral already connected at BLE level");
            }
            self.peripheral.discover_services().await
        };

        match tokio::time::timeout(timeout, connect).await {
            Ok(result) => result.map_err(Error::Bluetooth),
            Err(_) => Err(Error::Timeout {
                operation: "connect".to_string(),
            }),
        }
    }

    /// Disconnect and stop maintaining the connection.
    pub async fn disconnect(&self) -> Result<()> {
        self.link.set_maintain(false);
        self.stop_watching();

        if matches!(
            self.state(),
            ConnectionState::Disconnected | ConnectionState::Disconnecting
        ) {
            return Ok(());
        }

        self.link.set(ConnectionState::Disconnecting);

        let result = self.peripheral.disconnect().await;
        self.link.set(ConnectionState::Disconnected);

        match result {
            Ok(()) => {
                info!("Disconnected from thermometer");
                Ok(())
            }
            Err(e) => {
                error!("Failed to disconnect: {}", e);
                Err(Error::Bluetooth(e))
            }
        }
    }

    /// Check if we're maintaining the connection.
    pub fn is_maintaining_connection(&self) -> bool {
        self.link.is_maintaining()
    }

    /// Current retry settings.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        *self.policy.read()
    }

    /// Set the reconnection parameters used by later connection attempts.
    pub fn set_reconnect_params(&self, max_attempts: u32, delay: Duration) {
        let mut policy = self.policy.write();
        policy.max_attempts = max_attempts.max(1);
        policy.delay = delay;
    }

    /// React to a link loss.
    ///
    /// Marks the link disconnected and, when maintaining the connection,
    /// reconnects. Notification subscriptions do not survive a reconnect.
    pub async fn handle_disconnection(&self) {
        if !self.link.mark_lost() {
            return;
        }

        info!("Connection lost, reconnecting");

        if let Err(e) = self.connect(true).await {
            error!("Reconnection failed: {}", e);
        }
    }

    /// Follow the adapter's events and handle this peripheral dropping off.
    ///
    /// The watcher stops on [`disconnect`](Self::disconnect) or when the
    /// manager is dropped.
    pub async fn watch_disconnections(manager: &Arc<Self>, adapter: &Adapter) -> Result<()> {
        let mut events = adapter.events().await?;
        let id = manager.peripheral.id();
        let weak: Weak<Self> = Arc::downgrade(manager);

        let handle = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let CentralEvent::DeviceDisconnected(lost) = event else {
                    continue;
                };
                if lost != id {
                    continue;
                }

                let Some(manager) = weak.upgrade() else {
                    break;
                };
                debug!("Adapter reported link loss for {:?}", lost);
                manager.handle_disconnection().await;
            }

            debug!("Disconnect watcher stopped");
        });

        if let Some(previous) = manager.watcher.write().replace(handle) {
            previous.abort();
        }

        Ok(())
    }

    fn stop_watching(&self) {
        if let Some(handle) = self.watcher.write().take() {
            handle.abort();
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.stop_watching();
    }
}
