//! Registry of parked long-poll readers.
//!
//! Each waiter is a [`oneshot`] completion slot keyed by a [`WaiterId`].
//! A waiter leaves the registry exactly once: either [`ChangeNotifier::notify_all`]
//! drains it and sends the fresh update, or its owner removes it with
//! [`ChangeNotifier::cancel`] after timing out or being dropped. Whichever
//! removal happens first under the owner's lock wins; the other finds
//! nothing to do.

use std::collections::BTreeMap;

use tokio::sync::oneshot;
use tracing::debug;
use wordwall_types::WordsUpdate;

/// Identifier of a registered waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaiterId(u64);

/// Pending long-poll readers waiting for the next mutation batch.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    waiters: BTreeMap<WaiterId, oneshot::Sender<WordsUpdate>>,
    next_id: u64,
}

impl ChangeNotifier {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new waiter and return its id and the receiving half of
    /// its completion slot.
    pub fn register(&mut self) -> (WaiterId, oneshot::Receiver<WordsUpdate>) {
        let id = WaiterId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let (tx, rx) = oneshot::channel();
        self.waiters.insert(id, tx);
        (id, rx)
    }

    /// Remove a waiter without resolving it.
    ///
    /// Returns `true` if the waiter was still pending, `false` if it had
    /// already been resolved or removed.
    pub fn cancel(&mut self, id: WaiterId) -> bool {
        self.waiters.remove(&id).is_some()
    }

    /// Resolve and remove every pending waiter with `update`.
    ///
    /// Returns the number of waiters that were still listening. A waiter
    /// whose receiver has gone away is dropped silently and does not
    /// affect the others.
    pub fn notify_all(&mut self, update: &WordsUpdate) -> usize {
        let waiters = std::mem::take(&mut self.waiters);
        let total = waiters.len();
        let delivered = waiters
            .into_values()
            .map(|tx| tx.send(update.clone()))
            .filter(Result::is_ok)
            .count();
        debug!(
            total,
            delivered,
            last_change = update.last_change,
            "Notified waiters"
        );
        delivered
    }

    /// Drop every pending waiter without a response.
    ///
    /// Their receivers observe a closed channel. Returns how many were
    /// dropped.
    pub fn close(&mut self) -> usize {
        let dropped = self.waiters.len();
        self.waiters.clear();
        dropped
    }

    /// Number of waiters currently parked.
    pub fn pending(&self) -> usize {
        self.waiters.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wordwall_types::WordSlot;

    use super::*;

    fn update(last_change: u64) -> WordsUpdate {
        WordsUpdate {
            words: vec![WordSlot::new("vision", last_change)],
            last_change,
        }
    }

    #[test]
    fn notify_resolves_every_waiter_once() {
        let mut notifier = ChangeNotifier::new();
        let (_, mut rx_a) = notifier.register();
        let (_, mut rx_b) = notifier.register();
        assert_eq!(notifier.pending(), 2);

        assert_eq!(notifier.notify_all(&update(7)), 2);
        assert_eq!(notifier.pending(), 0);
        assert_eq!(rx_a.try_recv().unwrap().last_change, 7);
        assert_eq!(rx_b.try_recv().unwrap().last_change, 7);

        // A second batch reaches nobody: the earlier waiters are gone.
        assert_eq!(notifier.notify_all(&update(8)), 0);
    }

    #[test]
    fn cancel_is_exclusive_with_notify() {
        let mut notifier = ChangeNotifier::new();
        let (id, mut rx) = notifier.register();

        assert!(notifier.cancel(id));
        assert!(!notifier.cancel(id));
        assert_eq!(notifier.notify_all(&update(3)), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_after_notify_is_noop() {
        let mut notifier = ChangeNotifier::new();
        let (id, mut rx) = notifier.register();

        notifier.notify_all(&update(4));
        assert!(!notifier.cancel(id));
        assert_eq!(rx.try_recv().unwrap().last_change, 4);
    }

    #[test]
    fn dropped_receiver_does_not_affect_others() {
        let mut notifier = ChangeNotifier::new();
        let (_, rx_gone) = notifier.register();
        let (_, mut rx_live) = notifier.register();
        drop(rx_gone);

        assert_eq!(notifier.notify_all(&update(9)), 1);
        assert_eq!(rx_live.try_recv().unwrap().last_change, 9);
    }

    #[test]
    fn close_drops_senders() {
        let mut notifier = ChangeNotifier::new();
        let (_, mut rx) = notifier.register();

        assert_eq!(notifier.close(), 1);
        assert_eq!(notifier.pending(), 0);
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }

    #[test]
    fn ids_are_unique() {
        let mut notifier = ChangeNotifier::new();
        let (a, _rx_a) = notifier.register();
        let (b, _rx_b) = notifier.register();
        assert_ne!(a, b);
    }
}
