//! Cache Facade
//!
//! The entry points the evaluator uses: property lookup, factory-name
//! lookup, and the scope-unloaded notification that fans out to both caches.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::cache::{FacadeStats, Held, NameResolutionCache, PropertySet, ScopedWeakCache};
use crate::config::Config;
use crate::discovery::Discovery;
use crate::error::Result;
use crate::introspect::{BeanIntrospector, Introspector};
use crate::model::{ScopeIdentity, TypeIdentity, TypeModel};

/// Shared handle to a cached property set.
pub type PropertySetRef = Held<TypeIdentity, PropertySet>;

// == Cache Facade ==
/// Both caches plus the host capabilities used to fill them on a miss.
pub struct CacheFacade {
    properties: ScopedWeakCache<TypeIdentity, PropertySet>,
    names: NameResolutionCache,
    model: Arc<dyn TypeModel>,
    introspector: Arc<dyn Introspector>,
    discovery: Arc<dyn Discovery>,
}

impl CacheFacade {
    // == Constructor ==
    pub fn new(
        config: &Config,
        model: Arc<dyn TypeModel>,
        introspector: Arc<dyn Introspector>,
        discovery: Arc<dyn Discovery>,
    ) -> Self {
        Self {
            properties: ScopedWeakCache::new(config.initial_capacity, config.sweep_batch),
            names: NameResolutionCache::new(config.service_prefix.clone()),
            model,
            introspector,
            discovery,
        }
    }

    /// Creates a facade that introspects through accessor naming conventions.
    pub fn with_bean_introspection(
        config: &Config,
        model: Arc<dyn TypeModel>,
        discovery: Arc<dyn Discovery>,
    ) -> Self {
        let introspector = Arc::new(BeanIntrospector::new(Arc::clone(&model)));
        Self::new(config, model, introspector, discovery)
    }

    // == Lookup Properties ==
    /// Returns the canonical property set for `ty`, building it on a miss.
    ///
    /// Racing callers may each build a set; only one is installed and every
    /// caller gets that one. Introspection failures are returned, not cached.
    pub fn lookup_properties(&self, ty: TypeIdentity) -> Result<PropertySetRef> {
        if let Some(cached) = self.properties.get(&ty) {
            return Ok(cached);
        }

        debug!(%ty, "property set miss, introspecting");
        let built = PropertySet::build(ty, self.introspector.as_ref(), self.model.as_ref())?;
        let insertion = self.properties.put_if_absent(ty, built);
        if !insertion.is_installed() {
            debug!(%ty, "lost population race, reusing installed property set");
        }
        Ok(insertion.into_held())
    }

    // == Lookup Name ==
    /// Returns the implementation name registered for `factory_id` in
    /// `scope`, consulting discovery at most once per (scope, identifier).
    pub fn lookup_name(&self, scope: ScopeIdentity, factory_id: &str) -> Option<String> {
        self.names.resolve(scope, factory_id, self.discovery.as_ref())
    }

    // == Register Name ==
    /// Eagerly records the implementation name (or its absence) for a
    /// deploying scope, skipping discovery.
    pub fn register_name(&self, scope: ScopeIdentity, factory_id: &str, name: Option<String>) {
        self.names.register(scope, factory_id, name);
    }

    // == Scope Unloaded ==
    /// Removes everything cached for `scope` from both caches.
    ///
    /// Safe to repeat and safe for scopes that never populated anything.
    pub fn on_scope_unloaded(&self, scope: ScopeIdentity) {
        let properties = self.properties.clear(scope);
        let names = self.names.clear(scope);
        info!(%scope, properties, names, "scope unloaded");
    }

    // == Memory Pressure ==
    /// Releases every soft pin. Property sets not held by a caller dissolve.
    pub fn on_memory_pressure(&self) -> usize {
        self.properties.release_pins()
    }

    // == Sweep ==
    /// Removes slots of dissolved property sets. Returns slots removed.
    pub fn sweep(&self) -> usize {
        self.properties.sweep()
    }

    pub fn stats(&self) -> FacadeStats {
        FacadeStats {
            properties: self.properties.stats(),
            names: self.names.stats(),
        }
    }
}

// == Process-wide Instance ==
static INSTALLED: OnceLock<Arc<CacheFacade>> = OnceLock::new();

/// Creates the process-wide facade on first call and returns a handle to
/// it. Later calls ignore `init` and return the existing instance.
///
/// Callers pass the handle on explicitly; the instance is never torn down.
pub fn install(init: impl FnOnce() -> CacheFacade) -> Arc<CacheFacade> {
    Arc::clone(INSTALLED.get_or_init(|| Arc::new(init())))
}

/// The process-wide facade, if [`install`] has run.
pub fn installed() -> Option<Arc<CacheFacade>> {
    INSTALLED.get().cloned()
}
