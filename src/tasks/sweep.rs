//! Reclamation Sweep Task
//!
//! Background task that periodically drains dissolution signals so dead
//! slots do not linger in quiet caches that see few lookups.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::facade::CacheFacade;

/// Spawns a background task that periodically sweeps dissolved entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. Sweeping locks one shard at a time and never blocks lookups of
/// other keys.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it
/// during shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(facade.clone(), config.sweep_interval());
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(facade: Arc<CacheFacade>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting reclamation sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = facade.sweep();
            if removed > 0 {
                info!(removed, "reclamation sweep removed dissolved entries");
            } else {
                debug!("reclamation sweep: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::discovery::Discovery;
    use crate::model::{ClassDef, ClassRegistry, MethodDef, ScopeIdentity, TypeIdentity};

    struct NoDiscovery;

    impl Discovery for NoDiscovery {
        fn read_first_line(&self, _resource: &str, _scope: ScopeIdentity) -> Option<String> {
            None
        }
    }

    fn facade_with_type() -> (Arc<CacheFacade>, TypeIdentity) {
        let registry = Arc::new(ClassRegistry::new());
        let scope = registry.new_scope();
        let string = registry
            .define(ClassDef::class("java.lang.String", ScopeIdentity::SYSTEM).public())
            .unwrap();
        let ty = registry
            .define(
                ClassDef::class("Bean", scope)
                    .public()
                    .method(MethodDef::new("getValue").returns(string)),
            )
            .unwrap();
        let facade = CacheFacade::with_bean_introspection(
            &Config::default(),
            registry,
            Arc::new(NoDiscovery),
        );
        (Arc::new(facade), ty)
    }

    #[tokio::test]
    async fn test_sweep_task_removes_dissolved_entries() {
        let (facade, ty) = facade_with_type();

        drop(facade.lookup_properties(ty).unwrap());
        facade.on_memory_pressure();
        assert_eq!(facade.stats().properties.total_entries, 1);

        let handle = spawn_sweep_task(facade.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(facade.stats().properties.total_entries, 0);
        assert_eq!(facade.stats().properties.reclaimed, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_pinned_entries() {
        let (facade, ty) = facade_with_type();

        drop(facade.lookup_properties(ty).unwrap());

        let handle = spawn_sweep_task(facade.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(facade.stats().properties.total_entries, 1);
        assert!(facade.lookup_properties(ty).is_ok());
        assert_eq!(facade.stats().properties.hits, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let (facade, _) = facade_with_type();

        let handle = spawn_sweep_task(facade, Duration::from_millis(50));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
