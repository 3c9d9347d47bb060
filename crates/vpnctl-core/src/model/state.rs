// ── Connection state ──

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use super::ordinal_enum;

/// Lifecycle of the single VPN connection.
///
/// Transitions are owned by the [`ConnectionMachine`](crate::ConnectionMachine).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, FromRepr,
)]
#[serde(into = "i64", try_from = "i64")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ConnectionState {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

ordinal_enum!(ConnectionState, "ConnectionState");

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// `true` while a connection is pending or established.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}
