//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the caches.
//!
//! # Tasks
//! - Reclamation sweep: Removes slots whose property sets have dissolved

mod sweep;

pub use sweep::spawn_sweep_task;
