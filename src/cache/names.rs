//! Name Resolution Cache Module
//!
//! Caches factory implementation names per (scope, identifier), including
//! the fact that no implementation was found.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::discovery::Discovery;
use crate::model::ScopeIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameKey {
    scope: ScopeIdentity,
    factory_id: String,
}

impl NameKey {
    fn new(scope: ScopeIdentity, factory_id: &str) -> Self {
        Self {
            scope,
            factory_id: factory_id.to_string(),
        }
    }
}

// == Name Entry ==
/// A cached lookup outcome. `Absent` is a real answer, distinct from a
/// key that was never looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEntry {
    Found(Arc<str>),
    Absent,
}

impl NameEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            NameEntry::Found(name) => Some(&**name),
            NameEntry::Absent => None,
        }
    }
}

impl From<Option<String>> for NameEntry {
    /// An empty name counts as absent.
    fn from(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.is_empty() => NameEntry::Found(name.into()),
            _ => NameEntry::Absent,
        }
    }
}

// == Name Resolution Cache ==
/// Concurrent (scope, identifier) -> implementation name cache.
#[derive(Debug)]
pub struct NameResolutionCache {
    entries: DashMap<NameKey, NameEntry>,
    service_prefix: String,
    stats: StatsRecorder,
}

impl NameResolutionCache {
    // == Constructor ==
    /// # Arguments
    /// * `service_prefix` - Prepended to an identifier to form its resource path
    pub fn new(service_prefix: impl Into<String>) -> Self {
        Self {
            entries: DashMap::new(),
            service_prefix: service_prefix.into(),
            stats: StatsRecorder::new(),
        }
    }

    // == Resolve ==
    /// Returns the implementation name for `factory_id` as seen by `scope`.
    ///
    /// On a miss the discovery resource is read once and the outcome cached,
    /// absence included. No map lock is held during discovery; if an eager
    /// registration lands meanwhile, it wins.
    pub fn resolve(
        &self,
        scope: ScopeIdentity,
        factory_id: &str,
        discovery: &dyn Discovery,
    ) -> Option<String> {
        let key = NameKey::new(scope, factory_id);
        if let Some(entry) = self.entries.get(&key).map(|entry| entry.value().clone()) {
            self.stats.record_hit();
            return entry.name().map(str::to_string);
        }
        self.stats.record_miss();

        let resource = format!("{}{}", self.service_prefix, factory_id);
        let discovered = NameEntry::from(discovery.read_first_line(&resource, scope));
        debug!(%scope, factory_id, found = ?discovered.name(), "factory name discovered");

        let entry = self.entries.entry(key).or_insert(discovered).value().clone();
        entry.name().map(str::to_string)
    }

    // == Register ==
    /// Records an implementation name ahead of any lookup, or records that
    /// the scope has none (`None` or an empty name).
    pub fn register(&self, scope: ScopeIdentity, factory_id: &str, name: Option<String>) {
        self.entries
            .insert(NameKey::new(scope, factory_id), NameEntry::from(name));
    }

    /// The cached outcome, without consulting discovery.
    pub fn peek(&self, scope: ScopeIdentity, factory_id: &str) -> Option<NameEntry> {
        self.entries
            .get(&NameKey::new(scope, factory_id))
            .map(|entry| entry.value().clone())
    }

    // == Clear Scope ==
    /// Removes every entry cached for `scope`. Returns how many were removed.
    pub fn clear(&self, scope: ScopeIdentity) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, _| {
            if key.scope == scope {
                removed += 1;
                false
            } else {
                true
            }
        });

        self.stats.record_scope_evictions(removed);
        if removed > 0 {
            info!(%scope, removed, "scope cleared from name cache");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }
}
