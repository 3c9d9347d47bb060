// ── Request log entry ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::RoutingMode;

/// One routed connection observed by the traffic inspector.
///
/// Immutable once recorded. Ports are kept as strings, matching the
/// shape produced by the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnRequest {
    pub zoned_date_time: DateTime<Utc>,
    pub protocol_name: String,
    pub decision: RoutingMode,
    pub source_ip_address: String,
    pub destination_ip_address: String,
    pub source_port: String,
    pub destination_port: String,
    pub domain: String,
}
