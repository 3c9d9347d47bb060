// ── Boundary event subscriptions ──

use serde_json::Value;
use tracing::warn;

use super::Subscription;
use crate::command::channel;
use crate::model::{ConnectionState, VpnRequest};

/// A subscription to one of the named event channels, yielding
/// boundary-encoded values.
pub enum EventSubscription {
    State(Subscription<ConnectionState>),
    QueryLog(Subscription<VpnRequest>),
}

impl EventSubscription {
    pub fn channel(&self) -> &'static str {
        match self {
            Self::State(_) => channel::STATE_EVENTS,
            Self::QueryLog(_) => channel::QUERY_LOG_EVENTS,
        }
    }

    /// Wait for the next event. `None` once the subscription has been
    /// cancelled or replaced.
    pub async fn next_value(&mut self) -> Option<Value> {
        match self {
            Self::State(sub) => sub.recv().await.map(|state| Value::from(i64::from(state))),
            Self::QueryLog(sub) => loop {
                let request = sub.recv().await?;
                match serde_json::to_value(&request) {
                    Ok(value) => return Some(value),
                    Err(e) => warn!(error = %e, "query-log entry could not be encoded"),
                }
            },
        }
    }
}
