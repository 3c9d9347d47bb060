// ── Server CRUD ──

use std::sync::Arc;

use tracing::{debug, info};

use crate::command::requests::{AddServerResult, ServerRequest};
use crate::model::{Server, ServerId};
use crate::store::RegistryStore;

/// Validates and applies server mutations, assigning ids and keeping
/// the selected-server reference consistent.
pub struct ServerManager {
    store: Arc<RegistryStore>,
}

impl ServerManager {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Validate `request` and append it under the next free id.
    pub fn add_new_server(&self, request: ServerRequest) -> AddServerResult {
        let dns_servers = match request.validate() {
            Ok(dns) => dns,
            Err(field) => {
                debug!(%field, "server rejected");
                return field.into();
            }
        };

        let id = self.store.mutate(|reg| {
            let id = reg.next_server_id();
            reg.servers.push(request.into_server(id, dns_servers));
            id
        });
        info!(id, "server added");
        AddServerResult::Ok
    }

    /// Validate `request` and replace the server with `id`. An unknown
    /// id leaves the registry unchanged and still reports success.
    pub fn set_new_server(&self, id: ServerId, request: ServerRequest) -> AddServerResult {
        let dns_servers = match request.validate() {
            Ok(dns) => dns,
            Err(field) => {
                debug!(id, %field, "server update rejected");
                return field.into();
            }
        };

        let replaced = self.store.mutate(|reg| match reg.server_mut(id) {
            Some(server) => {
                *server = request.into_server(id, dns_servers);
                true
            }
            None => false,
        });
        if replaced {
            info!(id, "server updated");
        } else {
            debug!(id, "server update ignored, no such server");
        }
        AddServerResult::Ok
    }

    /// Select `id`. Not checked against the server list.
    pub fn set_selected_server_id(&self, id: ServerId) {
        self.store.mutate(|reg| reg.selected_server_id = Some(id));
        debug!(id, "server selected");
    }

    /// Remove every server with `id`, clearing the selection if it
    /// pointed there.
    pub fn remove_server(&self, id: ServerId) {
        let (removed, deselected) = self.store.mutate(|reg| {
            let before = reg.servers.len();
            reg.servers.retain(|s| s.id != id);
            let removed = before - reg.servers.len();
            let deselected = reg.selected_server_id == Some(id);
            if deselected {
                reg.selected_server_id = None;
            }
            (removed, deselected)
        });
        info!(id, removed, deselected, "server removed");
    }

    pub fn get_all_servers(&self) -> Arc<Vec<Server>> {
        self.store.snapshot_servers()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::VpnProtocol;

    fn request(ip: &str) -> ServerRequest {
        ServerRequest {
            ip_address: ip.into(),
            domain: "vpn.example.com".into(),
            login: "user".into(),
            password: "secret".into(),
            protocol: VpnProtocol::Quic,
            routing_profile_id: 1,
            dns_servers: "1.1.1.1".into(),
        }
    }

    fn manager() -> ServerManager {
        ServerManager::new(Arc::new(RegistryStore::new()))
    }

    fn ids(manager: &ServerManager) -> Vec<ServerId> {
        manager.get_all_servers().iter().map(|s| s.id).collect()
    }

    #[test]
    fn empty_dns_is_rejected_without_change() {
        let manager = manager();
        let mut req = request("10.0.0.1");
        req.dns_servers = String::new();

        assert_eq!(
            manager.add_new_server(req),
            AddServerResult::DnsServersIncorrect
        );
        assert!(manager.get_all_servers().is_empty());
    }

    #[test]
    fn ids_are_max_plus_one_and_reused() {
        let manager = manager();
        assert!(manager.add_new_server(request("10.0.0.1")).is_ok());
        assert!(manager.add_new_server(request("10.0.0.2")).is_ok());
        assert_eq!(ids(&manager), vec![1, 2]);

        manager.remove_server(2);
        assert!(manager.add_new_server(request("10.0.0.3")).is_ok());

        let servers = manager.get_all_servers();
        assert_eq!(ids(&manager), vec![1, 2]);
        assert_eq!(servers[1].ip_address, "10.0.0.3");
    }

    #[test]
    fn removing_selected_server_clears_selection() {
        let store = Arc::new(RegistryStore::new());
        let manager = ServerManager::new(Arc::clone(&store));
        manager.add_new_server(request("10.0.0.1"));
        manager.set_selected_server_id(1);

        manager.remove_server(1);

        assert_eq!(store.selected_server_id(), None);
    }

    #[test]
    fn removing_other_server_keeps_selection() {
        let store = Arc::new(RegistryStore::new());
        let manager = ServerManager::new(Arc::clone(&store));
        manager.add_new_server(request("10.0.0.1"));
        manager.add_new_server(request("10.0.0.2"));
        manager.set_selected_server_id(1);

        manager.remove_server(2);

        assert_eq!(store.selected_server_id(), Some(1));
    }

    #[test]
    fn selection_is_not_checked() {
        let store = Arc::new(RegistryStore::new());
        let manager = ServerManager::new(Arc::clone(&store));
        manager.set_selected_server_id(42);
        assert_eq!(store.selected_server_id(), Some(42));
    }

    #[test]
    fn set_new_server_replaces_in_place() {
        let manager = manager();
        manager.add_new_server(request("10.0.0.1"));
        manager.add_new_server(request("10.0.0.2"));

        let mut update = request("172.16.0.1");
        update.protocol = VpnProtocol::Http2;
        update.dns_servers = "9.9.9.9,149.112.112.112".into();
        assert!(manager.set_new_server(1, update).is_ok());

        let servers = manager.get_all_servers();
        assert_eq!(servers[0].id, 1);
        assert_eq!(servers[0].ip_address, "172.16.0.1");
        assert_eq!(servers[0].vpn_protocol, VpnProtocol::Http2);
        assert_eq!(servers[0].dns_servers, vec!["9.9.9.9", "149.112.112.112"]);
        assert_eq!(servers[1].ip_address, "10.0.0.2");
    }

    #[test]
    fn set_new_server_validates_and_ignores_unknown_ids() {
        let manager = manager();
        manager.add_new_server(request("10.0.0.1"));

        assert_eq!(
            manager.set_new_server(1, request("10.0.0")),
            AddServerResult::IpAddressIncorrect
        );
        assert!(manager.set_new_server(9, request("10.0.0.9")).is_ok());

        assert_eq!(ids(&manager), vec![1]);
        assert_eq!(manager.get_all_servers()[0].ip_address, "10.0.0.1");
    }

    #[test]
    fn concurrent_adds_never_duplicate_ids() {
        let manager = Arc::new(manager());
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let ip = format!("10.{t}.{i}.1");
                        assert!(manager.add_new_server(request(&ip)).is_ok());
                    }
                })
            })
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }

        let mut ids = ids(&manager);
        assert_eq!(ids.len(), 200);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }
}
