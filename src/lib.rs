//! EL Cache - reflective metadata caches for an expression evaluator
//!
//! Caches per-type property metadata and per-scope factory names, evicting
//! entries passively when their values dissolve under memory pressure and
//! actively when the defining scope is unloaded.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod facade;
pub mod introspect;
pub mod model;
pub mod resolve;
pub mod tasks;

pub use cache::{AccessorPair, BeanProperty, PropertySet};
pub use config::Config;
pub use error::{IntrospectionError, Result};
pub use facade::{CacheFacade, PropertySetRef};
pub use model::{ScopeIdentity, TypeIdentity};
pub use tasks::spawn_sweep_task;
