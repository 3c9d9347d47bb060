// ── Central registry store ──
//
// One `parking_lot::Mutex` serializes every read-modify-write. After
// each mutation the server and profile lists are republished as fresh
// `Arc` snapshots, still under the lock, so a snapshot is never ahead
// of or behind the registry.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::registry::Registry;
use super::seed;
use crate::model::{ConnectionState, RoutingProfile, Server, ServerId, VpnRequest};

/// Sole owner of the control plane's mutable state.
///
/// Reads hand out value snapshots; writers get exclusive access to the
/// whole [`Registry`] for the duration of one operation. Nothing holds
/// the lock across I/O; observer sends made under it never block.
pub struct RegistryStore {
    registry: Mutex<Registry>,
    servers: watch::Sender<Arc<Vec<Server>>>,
    profiles: watch::Sender<Arc<Vec<RoutingProfile>>>,
}

impl RegistryStore {
    /// An empty registry.
    pub fn new() -> Self {
        Self::from_registry(Registry::default())
    }

    /// A registry pre-populated with example servers and profiles.
    pub fn seeded() -> Self {
        Self::from_registry(seed::mock_registry())
    }

    pub(crate) fn from_registry(registry: Registry) -> Self {
        let (servers, _) = watch::channel(Arc::new(registry.servers.clone()));
        let (profiles, _) = watch::channel(Arc::new(registry.profiles.clone()));

        Self {
            registry: Mutex::new(registry),
            servers,
            profiles,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot_servers(&self) -> Arc<Vec<Server>> {
        self.servers.borrow().clone()
    }

    pub fn snapshot_profiles(&self) -> Arc<Vec<RoutingProfile>> {
        self.profiles.borrow().clone()
    }

    pub fn snapshot_requests(&self) -> Vec<VpnRequest> {
        self.read(|reg| reg.requests.clone())
    }

    pub fn selected_server_id(&self) -> Option<ServerId> {
        self.read(Registry::selected_server_id)
    }

    pub fn excluded_routes(&self) -> String {
        self.read(|reg| reg.excluded_routes.clone())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.read(Registry::state)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn server_count(&self) -> usize {
        self.servers.borrow().len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.borrow().len()
    }

    // ── Exclusive access ─────────────────────────────────────────────

    /// Run `f` against a consistent view of the registry.
    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let registry = self.registry.lock();
        f(&registry)
    }

    /// Run `f` with exclusive access, then republish changed lists.
    ///
    /// `f` must not block: it runs with the registry lock held.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut registry = self.registry.lock();
        let result = f(&mut registry);
        self.publish(&registry);
        result
    }

    fn publish(&self, registry: &Registry) {
        self.servers.send_if_modified(|snap| {
            if snap.as_slice() == registry.servers.as_slice() {
                return false;
            }
            *snap = Arc::new(registry.servers.clone());
            true
        });
        self.profiles.send_if_modified(|snap| {
            if snap.as_slice() == registry.profiles.as_slice() {
                return false;
            }
            *snap = Arc::new(registry.profiles.clone());
            true
        });
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new()
    }
}
