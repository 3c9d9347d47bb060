// ── Routing profile domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use super::ordinal_enum;

/// Registry-assigned routing profile identifier.
pub type ProfileId = i64;

/// Where matching traffic is sent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, FromRepr,
)]
#[serde(into = "i64", try_from = "i64")]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum RoutingMode {
    /// Through the tunnel.
    #[default]
    Vpn = 0,
    /// Around the tunnel, straight to the local network.
    Bypass = 1,
}

ordinal_enum!(RoutingMode, "RoutingMode");

/// A named default mode plus explicit rule lists that override it.
///
/// Rules are free-form match patterns (exact host, CIDR, or a `*`
/// wildcard) interpreted by whatever makes the routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingProfile {
    pub id: ProfileId,
    pub name: String,
    pub default_mode: RoutingMode,
    pub bypass_rules: Vec<String>,
    pub vpn_rules: Vec<String>,
}

impl RoutingProfile {
    /// A fresh profile: default name, VPN mode, no rules.
    pub fn new(id: ProfileId) -> Self {
        Self {
            id,
            name: format!("Profile {id}"),
            default_mode: RoutingMode::Vpn,
            bypass_rules: Vec::new(),
            vpn_rules: Vec::new(),
        }
    }

    /// The rule list that forces traffic into `mode`.
    pub fn rules(&self, mode: RoutingMode) -> &[String] {
        match mode {
            RoutingMode::Bypass => &self.bypass_rules,
            RoutingMode::Vpn => &self.vpn_rules,
        }
    }

    pub(crate) fn rules_mut(&mut self, mode: RoutingMode) -> &mut Vec<String> {
        match mode {
            RoutingMode::Bypass => &mut self.bypass_rules,
            RoutingMode::Vpn => &mut self.vpn_rules,
        }
    }

    pub(crate) fn clear_rules(&mut self) {
        self.bypass_rules.clear();
        self.vpn_rules.clear();
    }
}
