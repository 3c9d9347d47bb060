// ── Connection state notification ──

use tracing::trace;

use super::observer::{ObserverSlot, Subscription};
use crate::model::ConnectionState;
use crate::store::RegistryStore;

/// Delivers connection state transitions to zero or one observer.
///
/// Both `emit` and `subscribe` are called with the registry lock held,
/// which fixes the delivery order and makes the replayed state on
/// subscribe consistent with later transitions.
pub struct StateHub {
    slot: ObserverSlot<ConnectionState>,
}

impl StateHub {
    pub fn new() -> Self {
        Self {
            slot: ObserverSlot::new("connection-state"),
        }
    }

    /// Hand `state` to the observer, if any. Never blocks.
    pub(crate) fn emit(&self, state: ConnectionState) {
        if self.slot.send(state).is_err() {
            trace!(%state, "state change dropped, no observer");
        }
    }

    /// Replace the observer. The new subscription starts with the
    /// current state.
    pub fn subscribe(&self, store: &RegistryStore) -> Subscription<ConnectionState> {
        store.read(|reg| self.slot.attach([reg.state()]))
    }

    pub fn unsubscribe(&self) -> bool {
        self.slot.detach()
    }

    pub fn is_subscribed(&self) -> bool {
        self.slot.is_attached()
    }
}

impl Default for StateHub {
    fn default() -> Self {
        Self::new()
    }
}
