// ── Registry reads, writes, and the request log ──

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{RoutingProfile, Server, ServerId, VpnRequest};
use crate::store::{RegistryStore, first_duplicate_id};
use crate::stream::{QueryLogHub, Subscription};

/// Whole-registry operations: selection, excluded routes, bulk
/// replacement of servers and profiles, and the request log.
pub struct StorageManager {
    store: Arc<RegistryStore>,
    query_log: Arc<QueryLogHub>,
}

impl StorageManager {
    pub fn new(store: Arc<RegistryStore>, query_log: Arc<QueryLogHub>) -> Self {
        Self { store, query_log }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn get_all_servers(&self) -> Arc<Vec<Server>> {
        self.store.snapshot_servers()
    }

    pub fn get_routing_profiles(&self) -> Arc<Vec<RoutingProfile>> {
        self.store.snapshot_profiles()
    }

    pub fn get_selected_server_id(&self) -> Option<ServerId> {
        self.store.selected_server_id()
    }

    pub fn get_excluded_routes(&self) -> String {
        self.store.excluded_routes()
    }

    pub fn get_all_requests(&self) -> Vec<VpnRequest> {
        self.store.snapshot_requests()
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub fn set_selected_server_id(&self, id: ServerId) {
        self.store.mutate(|reg| reg.selected_server_id = Some(id));
        debug!(id, "server selected");
    }

    pub fn set_excluded_routes(&self, routes: String) {
        debug!(len = routes.len(), "excluded routes set");
        self.store.mutate(|reg| reg.excluded_routes = routes);
    }

    /// Replace the server list wholesale. A selection that no longer
    /// names a server is cleared. Lists that repeat an id are rejected
    /// and leave the registry untouched.
    pub fn set_servers(&self, servers: Vec<Server>) -> Result<(), CoreError> {
        if let Some(id) = first_duplicate_id(servers.iter().map(|s| s.id)) {
            return Err(CoreError::DuplicateId { kind: "server", id });
        }
        let count = servers.len();
        let deselected = self.store.mutate(|reg| {
            reg.servers = servers;
            reg.prune_selection()
        });
        info!(count, deselected, "servers replaced");
        Ok(())
    }

    pub fn set_routing_profiles(&self, profiles: Vec<RoutingProfile>) -> Result<(), CoreError> {
        if let Some(id) = first_duplicate_id(profiles.iter().map(|p| p.id)) {
            return Err(CoreError::DuplicateId { kind: "profile", id });
        }
        let count = profiles.len();
        self.store.mutate(|reg| reg.profiles = profiles);
        info!(count, "routing profiles replaced");
        Ok(())
    }

    // ── Request log ──────────────────────────────────────────────────

    /// Record `request` and forward it to the query-log observer, or
    /// queue it until one subscribes.
    pub fn append_request(&self, request: VpnRequest) {
        debug!(domain = %request.domain, decision = %request.decision, "request logged");
        self.store.mutate(|reg| {
            reg.requests.push(request.clone());
            self.query_log.push(request);
        });
    }

    /// Attach the query-log observer, replacing any previous one. Queued
    /// entries are delivered first.
    pub fn subscribe_query_log(&self) -> Subscription<VpnRequest> {
        self.store.read(|_| self.query_log.subscribe())
    }

    pub fn unsubscribe_query_log(&self) -> bool {
        self.query_log.unsubscribe()
    }
}
