// ── Observation channels ──
//
// The hubs carry point events (state transitions, query-log entries)
// to at most one observer at a time.

mod events;
mod observer;
mod query_log;
mod state;

pub use events::EventSubscription;
pub use observer::Subscription;
pub use query_log::QueryLogHub;
pub use state::StateHub;
