// ── Connection state machine ──
//
// DISCONNECTED -> CONNECTING -> CONNECTED, with `stop` returning to
// DISCONNECTED from anywhere. The CONNECTING -> CONNECTED step is
// driven by a one-shot timer task; the task only fires if its
// generation is still the pending one when it takes the registry lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::model::ConnectionState;
use crate::store::{PendingConnect, RegistryStore};
use crate::stream::{StateHub, Subscription};

/// Owns the connection lifecycle and its pending-transition timer.
pub struct ConnectionMachine {
    store: Arc<RegistryStore>,
    hub: Arc<StateHub>,
    runtime: Handle,
    connect_delay: Duration,
}

impl ConnectionMachine {
    pub fn new(
        store: Arc<RegistryStore>,
        hub: Arc<StateHub>,
        runtime: Handle,
        connect_delay: Duration,
    ) -> Self {
        Self {
            store,
            hub,
            runtime,
            connect_delay,
        }
    }

    pub fn connect_delay(&self) -> Duration {
        self.connect_delay
    }

    /// Begin connecting. Any timer armed by an earlier `start` is
    /// cancelled and the delay starts over.
    pub fn start(&self) {
        let (pending, previous) = self.store.mutate(|reg| {
            let pending = reg.arm_connect();
            let previous = std::mem::replace(&mut reg.state, ConnectionState::Connecting);
            self.hub.emit(ConnectionState::Connecting);
            (pending, previous)
        });
        info!(
            generation = pending.generation,
            delay_ms = self.connect_delay.as_millis(),
            restart = previous.is_active(),
            "connection starting"
        );

        self.runtime.spawn(connect_timer(
            Arc::clone(&self.store),
            Arc::clone(&self.hub),
            pending,
            self.connect_delay,
        ));
    }

    /// Cancel any pending transition and disconnect. Emits even when
    /// already disconnected.
    pub fn stop(&self) {
        let (cancelled, previous) = self.store.mutate(|reg| {
            let cancelled = reg.disarm_connect();
            let previous = std::mem::replace(&mut reg.state, ConnectionState::Disconnected);
            self.hub.emit(ConnectionState::Disconnected);
            (cancelled, previous)
        });
        info!(
            cancelled_pending = cancelled,
            was_connected = previous.is_connected(),
            "connection stopped"
        );
    }

    pub fn current_state(&self) -> ConnectionState {
        self.store.connection_state()
    }

    /// Attach the state observer, replacing any previous one. The
    /// current state is delivered first.
    pub fn subscribe(&self) -> Subscription<ConnectionState> {
        self.hub.subscribe(&self.store)
    }

    pub fn unsubscribe(&self) -> bool {
        self.hub.unsubscribe()
    }

    /// Cancel the pending timer without a state change or emission.
    pub fn shutdown(&self) {
        if self.store.mutate(|reg| reg.disarm_connect()) {
            debug!("pending connect cancelled on shutdown");
        }
    }
}

async fn connect_timer(
    store: Arc<RegistryStore>,
    hub: Arc<StateHub>,
    pending: PendingConnect,
    delay: Duration,
) {
    tokio::select! {
        biased;
        () = pending.cancel.cancelled() => {
            debug!(generation = pending.generation, "connect timer cancelled");
            return;
        }
        () = tokio::time::sleep(delay) => {}
    }

    let fired = store.mutate(|reg| {
        if !reg.take_connect(pending.generation) {
            return false;
        }
        reg.state = ConnectionState::Connected;
        hub.emit(ConnectionState::Connected);
        true
    });

    if fired {
        info!(generation = pending.generation, "connection established");
    } else {
        debug!(generation = pending.generation, "stale connect timer ignored");
    }
}
