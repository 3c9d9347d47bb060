// ── Single-observer slot ──
//
// Hand-off from emitters to one observer through an unbounded channel.
// Sending never blocks, so emitters may call in while holding the
// registry lock; the observer drains the channel on its own schedule.

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

struct Observer<T> {
    id: u64,
    tx: mpsc::UnboundedSender<T>,
}

/// Holds zero or one observer. Attaching replaces the previous one.
pub(crate) struct ObserverSlot<T> {
    name: &'static str,
    observer: Mutex<Option<Observer<T>>>,
    next_id: AtomicU64,
}

impl<T> ObserverSlot<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            observer: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Install a new observer, dropping the old one. The returned
    /// subscription receives `initial` items before anything else.
    pub(crate) fn attach(&self, initial: impl IntoIterator<Item = T>) -> Subscription<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        for item in initial {
            // The receiver is alive in this scope.
            let _ = tx.send(item);
        }

        let replaced = self.observer.lock().replace(Observer { id, tx }).is_some();
        debug!(channel = self.name, id, replaced, "observer attached");

        Subscription { id, rx }
    }

    /// Detach the current observer. Returns `true` if one was attached.
    pub(crate) fn detach(&self) -> bool {
        let detached = self.observer.lock().take().is_some();
        if detached {
            debug!(channel = self.name, "observer detached");
        }
        detached
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.observer
            .lock()
            .as_ref()
            .is_some_and(|o| !o.tx.is_closed())
    }

    /// Hand `item` to the observer. Gives the item back when nobody is
    /// listening; an observer whose receiver is gone is detached.
    pub(crate) fn send(&self, item: T) -> Result<(), T> {
        let mut observer = self.observer.lock();
        let Some(current) = observer.as_ref() else {
            return Err(item);
        };
        match current.tx.send(item) {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendError(item)) => {
                debug!(channel = self.name, id = current.id, "observer went away");
                *observer = None;
                Err(item)
            }
        }
    }
}

/// Receiving end of a hub subscription.
///
/// Ends (yields `None`) once the observer is detached or replaced and
/// every already-delivered item has been read.
pub struct Subscription<T> {
    id: u64,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next item.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take an already-delivered item without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drain every item delivered so far.
    pub fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            items.push(item);
        }
        items
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}
