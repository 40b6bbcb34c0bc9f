//! Change notification fan-out
//!
//! Every successful mutation announces the address it affected.
//! Consumers call [`ChangeNotifier::subscribe`] for a receiver; emission
//! clones the address to every live subscriber and never blocks the
//! mutating caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::uri::NoteUri;

/// Fan-out of affected addresses to any number of subscribers.
///
/// Sends are fire-and-forget over unbounded channels; a dropped receiver
/// is pruned on the next emission.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<crossbeam::channel::Sender<NoteUri>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber; the receiver sees every subsequent change.
    pub fn subscribe(&self) -> crossbeam::channel::Receiver<NoteUri> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.lock().push(tx);
        rx
    }

    /// Announces `uri` to every live subscriber.
    pub fn notify_change(&self, uri: &NoteUri) {
        self.lock().retain(|tx| tx.send(uri.clone()).is_ok());
    }

    /// Registered subscribers, counting stale ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    // The subscriber list stays usable even if a panic poisoned the lock.
    fn lock(&self) -> MutexGuard<'_, Vec<crossbeam::channel::Sender<NoteUri>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_subscriber_receives_changes() {
        let notifier = ChangeNotifier::new();
        let rx = notifier.subscribe();
        notifier.notify_change(&registry::item_uri(3));
        assert_eq!(rx.recv().unwrap(), registry::item_uri(3));
    }

    #[test]
    fn test_every_subscriber_sees_every_change() {
        let notifier = ChangeNotifier::new();
        let first = notifier.subscribe();
        let second = notifier.subscribe();
        notifier.notify_change(&registry::collection_uri());
        assert_eq!(first.recv().unwrap(), registry::collection_uri());
        assert_eq!(second.recv().unwrap(), registry::collection_uri());
    }

    #[test]
    fn test_changes_arrive_in_emission_order() {
        let notifier = ChangeNotifier::new();
        let rx = notifier.subscribe();
        notifier.notify_change(&registry::item_uri(1));
        notifier.notify_change(&registry::item_uri(2));
        assert_eq!(rx.recv().unwrap(), registry::item_uri(1));
        assert_eq!(rx.recv().unwrap(), registry::item_uri(2));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let notifier = ChangeNotifier::new();
        let keep = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.notify_change(&registry::item_uri(1));
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(keep.recv().unwrap(), registry::item_uri(1));
    }

    #[test]
    fn test_notify_without_subscribers_is_a_noop() {
        let notifier = ChangeNotifier::new();
        notifier.notify_change(&registry::collection_uri());
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
