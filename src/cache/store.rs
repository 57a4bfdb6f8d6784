//! Cache Store Module
//!
//! Concurrent soft-value map with two independent eviction paths: passive
//! reclamation of dissolved values and active bulk removal by scope.

use std::hash::Hash;
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::cache::entry::{CacheEntry, Held, Reclaimable};
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::model::{ScopeIdentity, TypeIdentity};

// == Scoped Key ==
/// A cache key that belongs to exactly one scope.
pub trait ScopedKey: Clone + Eq + Hash + Send + Sync + 'static {
    fn scope(&self) -> ScopeIdentity;
}

impl ScopedKey for TypeIdentity {
    fn scope(&self) -> ScopeIdentity {
        TypeIdentity::scope(*self)
    }
}

// == Insertion ==
/// Outcome of [`ScopedWeakCache::put_if_absent`]. Both arms carry the
/// canonical value for the key.
#[derive(Debug)]
pub enum Insertion<K: Clone, V> {
    /// The offered value was installed
    Installed(Held<K, V>),
    /// A live value was already present and the offered one was discarded
    Existing(Held<K, V>),
}

impl<K: Clone, V> Insertion<K, V> {
    pub fn is_installed(&self) -> bool {
        matches!(self, Insertion::Installed(_))
    }

    /// The value every caller should use from now on.
    pub fn into_held(self) -> Held<K, V> {
        match self {
            Insertion::Installed(held) | Insertion::Existing(held) => held,
        }
    }
}

// == Scoped Weak Cache ==
/// Soft-value cache keyed by scoped keys.
///
/// Reads and writes lock only the shard holding the key. Dissolved values
/// are swept lazily: every access drains a bounded batch of dissolution
/// signals first, and [`sweep`](Self::sweep) drains them all.
pub struct ScopedWeakCache<K: ScopedKey, V> {
    entries: DashMap<K, CacheEntry<K, V>>,
    dissolved_tx: Sender<K>,
    dissolved_rx: Receiver<K>,
    sweep_batch: usize,
    stats: StatsRecorder,
}

impl<K: ScopedKey + std::fmt::Display, V> ScopedWeakCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `initial_capacity` - Initial map capacity
    /// * `sweep_batch` - Maximum dissolution signals drained per access
    pub fn new(initial_capacity: usize, sweep_batch: usize) -> Self {
        let (dissolved_tx, dissolved_rx) = unbounded();
        Self {
            entries: DashMap::with_capacity(initial_capacity),
            dissolved_tx,
            dissolved_rx,
            sweep_batch,
            stats: StatsRecorder::new(),
        }
    }

    // == Get ==
    /// Returns the live value for `key`, if any.
    ///
    /// A slot whose value has dissolved is removed on the spot and reported
    /// as a miss.
    pub fn get(&self, key: &K) -> Option<Held<K, V>> {
        self.drain(self.sweep_batch);

        // The shard guard is released before any removal below
        let lookup = self.entries.get(key).map(|entry| entry.upgrade());
        match lookup {
            Some(Some(held)) => {
                self.stats.record_hit();
                Some(held)
            }
            Some(None) => {
                if self.remove_dissolved(key) {
                    self.stats.record_reclaimed(1);
                    trace!(%key, "dissolved entry dropped on access");
                }
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put If Absent ==
    /// Installs `value` unless a live value already exists for `key`.
    ///
    /// A dissolved slot counts as absent and is replaced. The losing caller
    /// receives the winner's value in [`Insertion::Existing`].
    pub fn put_if_absent(&self, key: K, value: V) -> Insertion<K, V> {
        self.drain(self.sweep_batch);

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if let Some(existing) = occupied.get().upgrade() {
                    return Insertion::Existing(existing);
                }
                let held = self.hold(occupied.key().clone(), value);
                occupied.insert(CacheEntry::pinned(&held));
                self.stats.record_reclaimed(1);
                Insertion::Installed(held)
            }
            Entry::Vacant(vacant) => {
                let held = self.hold(vacant.key().clone(), value);
                vacant.insert(CacheEntry::pinned(&held));
                Insertion::Installed(held)
            }
        }
    }

    // == Put ==
    /// Installs `value` unconditionally, returning the previous live value.
    pub fn put(&self, key: K, value: V) -> Option<Held<K, V>> {
        self.drain(self.sweep_batch);

        let held = self.hold(key.clone(), value);
        self.entries
            .insert(key, CacheEntry::pinned(&held))
            .and_then(|previous| previous.upgrade())
    }

    // == Clear Scope ==
    /// Removes every entry whose key belongs to `scope`.
    ///
    /// Shards are locked one at a time, so unrelated keys stay available.
    /// Once this returns, no pre-clear value for the scope can be observed
    /// through the cache. Returns the number of entries removed.
    pub fn clear(&self, scope: ScopeIdentity) -> usize {
        self.drain(self.sweep_batch);

        let mut removed = 0;
        self.entries.retain(|key, _| {
            if key.scope() == scope {
                removed += 1;
                false
            } else {
                true
            }
        });

        self.stats.record_scope_evictions(removed);
        if removed > 0 {
            info!(%scope, removed, "scope cleared from cache");
        } else {
            debug!(%scope, "scope clear found nothing to remove");
        }
        removed
    }

    // == Release Pins ==
    /// Drops every pin so values only survive while something else holds
    /// them. Called when the host reports memory pressure.
    ///
    /// Returns the number of pins released.
    pub fn release_pins(&self) -> usize {
        let released: Vec<Held<K, V>> = self
            .entries
            .iter_mut()
            .filter_map(|mut entry| entry.unpin())
            .collect();
        let count = released.len();
        // Values with no other owner dissolve here, outside every shard lock
        drop(released);
        info!(released = count, "soft pins released");
        count
    }

    // == Sweep ==
    /// Drains every pending dissolution signal. Returns slots removed.
    pub fn sweep(&self) -> usize {
        self.drain(usize::MAX)
    }

    // == Length ==
    /// Returns the number of map slots, including dissolved slots not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots whose values are still live.
    pub fn live_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_dissolved())
            .count()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    fn hold(&self, key: K, value: V) -> Held<K, V> {
        Arc::new(Reclaimable::new(key, value, self.dissolved_tx.clone()))
    }

    /// Removes the slot only if it is still dissolved; a fresh value
    /// installed under the same key is left alone.
    fn remove_dissolved(&self, key: &K) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.is_dissolved())
            .is_some()
    }

    fn drain(&self, limit: usize) -> usize {
        let mut removed = 0;
        for key in self.dissolved_rx.try_iter().take(limit) {
            if self.remove_dissolved(&key) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.stats.record_reclaimed(removed);
            debug!(removed, "dissolved entries swept");
        }
        removed
    }
}
