// ── Example data ──
//
// The registry is in-memory only; until a storage backend exists, a
// fresh controller starts from this fixed data set.

use chrono::{TimeZone, Utc};

use super::registry::Registry;
use crate::model::{RoutingMode, RoutingProfile, Server, VpnProtocol, VpnRequest};
use crate::rules::parse_dns_servers;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub(super) fn mock_registry() -> Registry {
    let profiles = vec![
        RoutingProfile {
            id: 1,
            name: "Default Profile".into(),
            default_mode: RoutingMode::Vpn,
            bypass_rules: strings(&["192.168.1.0/24", "10.0.0.0/8"]),
            vpn_rules: strings(&["*"]),
        },
        RoutingProfile {
            id: 2,
            name: "Work Profile".into(),
            default_mode: RoutingMode::Bypass,
            bypass_rules: strings(&["company.com", "*.internal"]),
            vpn_rules: strings(&["social.com", "*.entertainment"]),
        },
    ];

    let servers = vec![
        Server {
            id: 1,
            ip_address: "192.168.1.100".into(),
            domain: "vpn1.example.com".into(),
            login: "user1".into(),
            password: "password1".into(),
            dns_servers: parse_dns_servers("8.8.8.8,8.8.4.4"),
            vpn_protocol: VpnProtocol::Quic,
            routing_profile_id: 1,
        },
        Server {
            id: 2,
            ip_address: "10.0.0.50".into(),
            domain: "vpn2.example.com".into(),
            login: "user2".into(),
            password: "password2".into(),
            dns_servers: parse_dns_servers("1.1.1.1,1.0.0.1"),
            vpn_protocol: VpnProtocol::Http2,
            routing_profile_id: 2,
        },
    ];

    let requests = vec![VpnRequest {
        zoned_date_time: Utc
            .with_ymd_and_hms(2024, 8, 22, 12, 0, 0)
            .single()
            .unwrap_or_default(),
        protocol_name: "HTTPS".into(),
        decision: RoutingMode::Vpn,
        source_ip_address: "192.168.1.10".into(),
        destination_ip_address: "8.8.8.8".into(),
        source_port: "54321".into(),
        destination_port: "443".into(),
        domain: "google.com".into(),
    }];

    Registry {
        servers,
        profiles,
        selected_server_id: Some(1),
        excluded_routes: "192.168.0.0/16,10.0.0.0/8".into(),
        requests,
        ..Registry::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_selection_points_at_a_seeded_server() {
        let reg = mock_registry();
        let selected = reg.selected_server_id.unwrap_or_default();
        assert!(reg.servers.iter().any(|s| s.id == selected));
    }

    #[test]
    fn seeded_servers_reference_seeded_profiles() {
        let reg = mock_registry();
        for server in &reg.servers {
            assert!(
                reg.profiles.iter().any(|p| p.id == server.routing_profile_id),
                "server {} points at a missing profile",
                server.id
            );
        }
    }

    #[test]
    fn seeded_request_timestamp_is_fixed() {
        let reg = mock_registry();
        assert_eq!(
            reg.requests[0].zoned_date_time.to_rfc3339(),
            "2024-08-22T12:00:00+00:00"
        );
    }
}
