// ── Typed request structs for Command payloads ──
//
// Argument shapes accepted at the method-call boundary. Missing string
// fields decode as "" so that validation, not decoding, reports them
// through `AddServerResult`.

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use crate::model::{ProfileId, RoutingMode, RoutingProfile, Server, ServerId, VpnProtocol};
use crate::model::ordinal_enum;
use crate::rules::{is_valid_ipv4, parse_dns_servers};

// ── Servers ────────────────────────────────────────────────────────

/// Fields for creating or replacing a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRequest {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, rename = "username")]
    pub login: String,
    #[serde(default)]
    pub password: String,
    pub protocol: VpnProtocol,
    pub routing_profile_id: ProfileId,
    /// Comma-separated DNS server list.
    #[serde(default)]
    pub dns_servers: String,
}

impl ServerRequest {
    /// Check fields in order and stop at the first failure. On success
    /// returns the parsed DNS list.
    pub fn validate(&self) -> Result<Vec<String>, InvalidField> {
        if !is_valid_ipv4(&self.ip_address) {
            return Err(InvalidField::IpAddress);
        }
        if self.domain.is_empty() {
            return Err(InvalidField::Domain);
        }
        if self.login.is_empty() {
            return Err(InvalidField::Login);
        }
        if self.password.is_empty() {
            return Err(InvalidField::Password);
        }
        let dns_servers = parse_dns_servers(&self.dns_servers);
        if dns_servers.is_empty() {
            return Err(InvalidField::DnsServers);
        }
        Ok(dns_servers)
    }

    pub(crate) fn into_server(self, id: ServerId, dns_servers: Vec<String>) -> Server {
        Server {
            id,
            ip_address: self.ip_address,
            domain: self.domain,
            login: self.login,
            password: self.password,
            dns_servers,
            vpn_protocol: self.protocol,
            routing_profile_id: self.routing_profile_id,
        }
    }
}

/// The first server field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InvalidField {
    IpAddress,
    Domain,
    Login,
    Password,
    DnsServers,
}

/// Outcome of a server add or update, reported as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, FromRepr)]
#[serde(into = "i64", try_from = "i64")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AddServerResult {
    Ok = 0,
    IpAddressIncorrect = 1,
    DomainIncorrect = 2,
    UsernameIncorrect = 3,
    PasswordIncorrect = 4,
    DnsServersIncorrect = 5,
}

ordinal_enum!(AddServerResult, "AddServerResult");

impl AddServerResult {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<InvalidField> for AddServerResult {
    fn from(field: InvalidField) -> Self {
        match field {
            InvalidField::IpAddress => Self::IpAddressIncorrect,
            InvalidField::Domain => Self::DomainIncorrect,
            InvalidField::Login => Self::UsernameIncorrect,
            InvalidField::Password => Self::PasswordIncorrect,
            InvalidField::DnsServers => Self::DnsServersIncorrect,
        }
    }
}

// ── Boundary arguments ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct IdArgs {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExcludedRoutesArgs {
    #[serde(default)]
    pub routes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServersArgs {
    pub servers: Vec<Server>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilesArgs {
    pub profiles: Vec<RoutingProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModeArgs {
    pub id: ProfileId,
    pub mode: RoutingMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameArgs {
    pub id: ProfileId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RulesArgs {
    pub id: ProfileId,
    pub mode: RoutingMode,
    pub rules: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> ServerRequest {
        ServerRequest {
            ip_address: "192.168.1.100".into(),
            domain: "vpn.example.com".into(),
            login: "user".into(),
            password: "secret".into(),
            protocol: VpnProtocol::Http2,
            routing_profile_id: 1,
            dns_servers: "8.8.8.8, 8.8.4.4".into(),
        }
    }

    #[test]
    fn valid_request_yields_parsed_dns() {
        assert_eq!(valid().validate().unwrap(), vec!["8.8.8.8", "8.8.4.4"]);
    }

    #[test]
    fn validation_short_circuits_in_field_order() {
        let mut req = valid();
        req.ip_address = "192.168.1".into();
        req.domain.clear();
        assert_eq!(req.validate(), Err(InvalidField::IpAddress));

        let mut req = valid();
        req.login.clear();
        req.password.clear();
        assert_eq!(req.validate(), Err(InvalidField::Login));

        let mut req = valid();
        req.password.clear();
        req.dns_servers.clear();
        assert_eq!(req.validate(), Err(InvalidField::Password));

        let mut req = valid();
        req.dns_servers = " , ".into();
        assert_eq!(req.validate(), Err(InvalidField::DnsServers));
    }

    #[test]
    fn result_codes_match_field_order() {
        let codes: Vec<i64> = [
            InvalidField::IpAddress,
            InvalidField::Domain,
            InvalidField::Login,
            InvalidField::Password,
            InvalidField::DnsServers,
        ]
        .into_iter()
        .map(|f| i64::from(AddServerResult::from(f)))
        .collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
        assert_eq!(i64::from(AddServerResult::Ok), 0);
    }

    #[test]
    fn missing_strings_decode_as_empty() {
        let req: ServerRequest =
            serde_json::from_value(serde_json::json!({"protocol": 0, "routingProfileId": 1}))
                .unwrap();
        assert_eq!(req.validate(), Err(InvalidField::IpAddress));
        assert!(req.login.is_empty());
    }

    #[test]
    fn username_maps_to_login() {
        let req: ServerRequest = serde_json::from_value(serde_json::json!({
            "ipAddress": "10.0.0.1",
            "username": "alice",
            "protocol": 1,
            "routingProfileId": 2,
        }))
        .unwrap();
        assert_eq!(req.login, "alice");
        assert_eq!(req.protocol, VpnProtocol::Http2);
    }
}
