//! Cache Entry Module
//!
//! Soft holds: a cached value stays resident while pinned, becomes
//! reclaimable once the pin is released, and reports its own dissolution
//! when the last strong owner drops it.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crossbeam::channel::Sender;

// == Reclaimable ==
/// A cached value that signals its key on a dissolution channel when dropped.
pub struct Reclaimable<K: Clone, V> {
    value: V,
    key: K,
    dissolved: Sender<K>,
}

impl<K: Clone, V> Reclaimable<K, V> {
    pub(crate) fn new(key: K, value: V, dissolved: Sender<K>) -> Self {
        Self {
            value,
            key,
            dissolved,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: Clone, V> Deref for Reclaimable<K, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

impl<K: Clone, V> Drop for Reclaimable<K, V> {
    fn drop(&mut self) {
        // The receiving cache may already be gone; nothing to clean up then.
        let _ = self.dissolved.send(self.key.clone());
    }
}

impl<K: Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for Reclaimable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reclaimable")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Shared handle to a cached value.
pub type Held<K, V> = Arc<Reclaimable<K, V>>;

// == Cache Entry ==
/// A map slot: a non-owning handle plus an optional pin that keeps the
/// value resident until memory pressure releases it.
#[derive(Debug)]
pub struct CacheEntry<K: Clone, V> {
    weak: Weak<Reclaimable<K, V>>,
    pin: Option<Held<K, V>>,
}

impl<K: Clone, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a pinned entry for the given value.
    pub fn pinned(held: &Held<K, V>) -> Self {
        Self {
            weak: Arc::downgrade(held),
            pin: Some(Arc::clone(held)),
        }
    }

    /// Returns a strong handle if the value has not dissolved.
    pub fn upgrade(&self) -> Option<Held<K, V>> {
        self.weak.upgrade()
    }

    /// True once no strong owner remains anywhere.
    pub fn is_dissolved(&self) -> bool {
        self.weak.strong_count() == 0
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    /// Releases the pin, handing it to the caller so it can be dropped
    /// outside any map lock.
    pub fn unpin(&mut self) -> Option<Held<K, V>> {
        self.pin.take()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    #[test]
    fn test_drop_signals_key() {
        let (tx, rx) = unbounded();
        let held = Arc::new(Reclaimable::new("k".to_string(), 1u32, tx));

        assert_eq!(**held, 1);
        assert_eq!(held.key(), "k");
        assert!(rx.try_recv().is_err());

        drop(held);
        assert_eq!(rx.try_recv().unwrap(), "k");
    }

    #[test]
    fn test_pinned_entry_keeps_value_alive() {
        let (tx, rx) = unbounded();
        let held = Arc::new(Reclaimable::new(1u64, "value", tx));
        let entry = CacheEntry::pinned(&held);

        drop(held);

        assert!(entry.is_pinned());
        assert!(!entry.is_dissolved());
        assert_eq!(*entry.upgrade().unwrap().value(), "value");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unpinned_entry_dissolves_with_last_owner() {
        let (tx, rx) = unbounded();
        let held = Arc::new(Reclaimable::new(1u64, "value", tx));
        let mut entry = CacheEntry::pinned(&held);

        let pin = entry.unpin();
        assert!(pin.is_some());
        assert!(!entry.is_pinned());
        drop(pin);

        // Caller still holds a strong reference
        assert!(!entry.is_dissolved());

        drop(held);
        assert!(entry.is_dissolved());
        assert!(entry.upgrade().is_none());
        assert_eq!(rx.try_recv().unwrap(), 1);
    }

    #[test]
    fn test_drop_after_receiver_gone_is_silent() {
        let (tx, rx) = unbounded();
        let held = Arc::new(Reclaimable::new(7u8, (), tx));
        drop(rx);
        drop(held);
    }
}
