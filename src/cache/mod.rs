//! Cache Module
//!
//! Property-set and factory-name caches with soft holds and scope-driven
//! eviction.

mod entry;
mod names;
mod properties;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Held, Reclaimable};
pub use names::{NameEntry, NameResolutionCache};
pub use properties::{AccessorPair, BeanProperty, PropertySet};
pub use stats::{CacheStats, FacadeStats, StatsRecorder};
pub use store::{Insertion, ScopedKey, ScopedWeakCache};
