// ── Query-log notification ──
//
// Request log entries go to the current observer. With nobody
// listening they queue, bounded, and the next subscriber gets the
// backlog in arrival order before anything new.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::observer::{ObserverSlot, Subscription};
use crate::model::VpnRequest;

pub struct QueryLogHub {
    slot: ObserverSlot<VpnRequest>,
    backlog: Mutex<VecDeque<VpnRequest>>,
    capacity: usize,
}

impl QueryLogHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            slot: ObserverSlot::new("query-log"),
            backlog: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Forward `request` to the observer, or queue it.
    ///
    /// Callers hold the registry lock so a concurrent `subscribe`
    /// cannot slip between the failed send and the enqueue.
    pub(crate) fn push(&self, request: VpnRequest) {
        let Err(request) = self.slot.send(request) else {
            return;
        };
        if self.capacity == 0 {
            return;
        }
        let mut backlog = self.backlog.lock();
        if backlog.len() >= self.capacity {
            backlog.pop_front();
            warn!(capacity = self.capacity, "query-log backlog full, dropping oldest entry");
        }
        backlog.push_back(request);
    }

    /// Replace the observer and flush the backlog into it.
    ///
    /// Must be called with the registry lock held; see [`push`](Self::push).
    pub(crate) fn subscribe(&self) -> Subscription<VpnRequest> {
        let backlog: Vec<_> = self.backlog.lock().drain(..).collect();
        debug!(flushed = backlog.len(), "query-log subscriber attached");
        self.slot.attach(backlog)
    }

    pub fn unsubscribe(&self) -> bool {
        self.slot.detach()
    }

    pub fn is_subscribed(&self) -> bool {
        self.slot.is_attached()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::RoutingMode;

    fn request(domain: &str) -> VpnRequest {
        VpnRequest {
            zoned_date_time: Utc::now(),
            protocol_name: "HTTPS".into(),
            decision: RoutingMode::Vpn,
            source_ip_address: "192.168.1.10".into(),
            destination_ip_address: "1.1.1.1".into(),
            source_port: "50000".into(),
            destination_port: "443".into(),
            domain: domain.into(),
        }
    }

    fn domains(items: Vec<VpnRequest>) -> Vec<String> {
        items.into_iter().map(|r| r.domain).collect()
    }

    #[test]
    fn backlog_is_flushed_in_order_to_next_subscriber() {
        let hub = QueryLogHub::new(8);
        hub.push(request("a.com"));
        hub.push(request("b.com"));

        let mut sub = hub.subscribe();
        hub.push(request("c.com"));

        assert_eq!(domains(sub.drain()), vec!["a.com", "b.com", "c.com"]);
        assert!(hub.backlog.lock().is_empty());
    }

    #[test]
    fn full_backlog_drops_oldest() {
        let hub = QueryLogHub::new(2);
        for domain in ["a.com", "b.com", "c.com"] {
            hub.push(request(domain));
        }

        let mut sub = hub.subscribe();

        assert_eq!(domains(sub.drain()), vec!["b.com", "c.com"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let hub = QueryLogHub::new(0);
        hub.push(request("a.com"));
        assert!(hub.subscribe().drain().is_empty());
    }

    #[test]
    fn entries_queue_again_after_unsubscribe() {
        let hub = QueryLogHub::new(4);
        let _sub = hub.subscribe();
        hub.unsubscribe();

        hub.push(request("late.com"));

        assert_eq!(domains(hub.subscribe().drain()), vec!["late.com"]);
    }
}
