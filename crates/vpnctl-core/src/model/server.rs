// ── Server domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use super::ordinal_enum;
use super::profile::ProfileId;

/// Registry-assigned server identifier.
pub type ServerId = i64;

/// Transport protocol spoken to a VPN server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, FromRepr,
)]
#[serde(into = "i64", try_from = "i64")]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum VpnProtocol {
    #[default]
    Quic = 0,
    Http2 = 1,
}

ordinal_enum!(VpnProtocol, "VpnProtocol");

/// A VPN endpoint the client can connect to.
///
/// Credentials are kept in plaintext; securing them is outside the
/// scope of this in-memory registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub ip_address: String,
    pub domain: String,
    pub login: String,
    pub password: String,
    pub dns_servers: Vec<String>,
    pub vpn_protocol: VpnProtocol,
    /// Owning routing profile. Not checked against existing profiles.
    pub routing_profile_id: ProfileId,
}
