// ── Registry contents ──
//
// Plain data guarded by the `RegistryStore` lock. Nothing in here
// locks or notifies; callers hold the store's mutex.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use crate::model::{
    ConnectionState, ProfileId, RoutingProfile, Server, ServerId, VpnRequest,
};

/// Everything the control plane knows, in one place.
///
/// Collections keep insertion order. Ids are unique within their
/// collection and are assigned as one more than the current maximum,
/// so an id is handed out again once every higher entry is gone. When
/// the maximum is `i64::MAX` the lowest free positive id is used.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) servers: Vec<Server>,
    pub(crate) profiles: Vec<RoutingProfile>,
    pub(crate) selected_server_id: Option<ServerId>,
    pub(crate) excluded_routes: String,
    pub(crate) requests: Vec<VpnRequest>,
    pub(crate) state: ConnectionState,
    pub(crate) pending_connect: Option<PendingConnect>,
    pub(crate) next_generation: u64,
}

/// The armed auto-connect timer.
///
/// Only the timer whose generation matches the pending one may fire;
/// clearing this slot under the lock is what cancels a transition.
#[derive(Debug, Clone)]
pub(crate) struct PendingConnect {
    pub(crate) generation: u64,
    pub(crate) cancel: CancellationToken,
}

impl Registry {
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn profiles(&self) -> &[RoutingProfile] {
        &self.profiles
    }

    pub fn selected_server_id(&self) -> Option<ServerId> {
        self.selected_server_id
    }

    pub fn excluded_routes(&self) -> &str {
        &self.excluded_routes
    }

    pub fn requests(&self) -> &[VpnRequest] {
        &self.requests
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    // ── Id assignment ────────────────────────────────────────────────

    pub(crate) fn next_server_id(&self) -> ServerId {
        next_id(self.servers.iter().map(|s| s.id))
    }

    pub(crate) fn next_profile_id(&self) -> ProfileId {
        next_id(self.profiles.iter().map(|p| p.id))
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub(crate) fn server_mut(&mut self, id: ServerId) -> Option<&mut Server> {
        self.servers.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn profile_mut(&mut self, id: ProfileId) -> Option<&mut RoutingProfile> {
        self.profiles.iter_mut().find(|p| p.id == id)
    }

    // ── Referential bookkeeping ──────────────────────────────────────

    /// Drop the selection if it no longer names a server in the list.
    /// Returns `true` when the selection was cleared.
    pub(crate) fn prune_selection(&mut self) -> bool {
        match self.selected_server_id {
            Some(id) if !self.servers.iter().any(|s| s.id == id) => {
                self.selected_server_id = None;
                true
            }
            _ => false,
        }
    }

    // ── Pending connect ──────────────────────────────────────────────

    /// Arm a new pending connect, cancelling any previous one.
    pub(crate) fn arm_connect(&mut self) -> PendingConnect {
        self.disarm_connect();
        self.next_generation = self.next_generation.wrapping_add(1);
        let pending = PendingConnect {
            generation: self.next_generation,
            cancel: CancellationToken::new(),
        };
        self.pending_connect = Some(pending.clone());
        pending
    }

    /// Cancel the pending connect, if any. Returns `true` if one was armed.
    pub(crate) fn disarm_connect(&mut self) -> bool {
        match self.pending_connect.take() {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Consume the pending connect if `generation` is still the armed one.
    pub(crate) fn take_connect(&mut self, generation: u64) -> bool {
        if self
            .pending_connect
            .as_ref()
            .is_some_and(|p| p.generation == generation)
        {
            self.pending_connect = None;
            true
        } else {
            false
        }
    }
}

fn next_id(ids: impl Iterator<Item = i64> + Clone) -> i64 {
    match ids.clone().max() {
        None => 1,
        Some(max) => max.checked_add(1).unwrap_or_else(|| {
            let taken: HashSet<i64> = ids.collect();
            (1..=i64::MAX)
                .find(|id| !taken.contains(id))
                .unwrap_or(i64::MAX)
        }),
    }
}

/// The first id that occurs more than once.
pub(crate) fn first_duplicate_id(ids: impl IntoIterator<Item = i64>) -> Option<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}
