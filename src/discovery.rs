//! Discovery Module
//!
//! Reads the first line of a named resource visible to a scope. Used to
//! find the implementation name registered for a factory identifier.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::debug;

use crate::model::ScopeIdentity;

// == Discovery ==
/// The discovery capability consumed by the name cache.
///
/// A missing resource and any read failure both mean "no entry".
pub trait Discovery: Send + Sync {
    fn read_first_line(&self, resource: &str, scope: ScopeIdentity) -> Option<String>;
}

// == Filesystem Discovery ==
/// Resolves resources against directory roots.
///
/// Lookups are parent-first: system roots, then the scope's own roots.
/// The system scope sees only system roots.
#[derive(Debug, Default)]
pub struct FsDiscovery {
    system_roots: Vec<PathBuf>,
    scope_roots: DashMap<ScopeIdentity, Vec<PathBuf>>,
}

impl FsDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.system_roots.push(root.into());
        self
    }

    /// Makes `root` visible to `scope`, after any roots already added.
    pub fn add_root(&self, scope: ScopeIdentity, root: impl Into<PathBuf>) {
        self.scope_roots.entry(scope).or_default().push(root.into());
    }

    /// Forgets the scope's roots. Returns true if it had any.
    pub fn remove_scope(&self, scope: ScopeIdentity) -> bool {
        self.scope_roots.remove(&scope).is_some()
    }

    fn roots_for(&self, scope: ScopeIdentity) -> Vec<PathBuf> {
        let mut roots = self.system_roots.clone();
        if !scope.is_system() {
            if let Some(own) = self.scope_roots.get(&scope) {
                roots.extend(own.iter().cloned());
            }
        }
        roots
    }
}

impl Discovery for FsDiscovery {
    fn read_first_line(&self, resource: &str, scope: ScopeIdentity) -> Option<String> {
        for root in self.roots_for(scope) {
            let path = root.join(resource);
            if !path.is_file() {
                continue;
            }
            match first_line(&path) {
                Ok(line) => return line,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "discovery resource unreadable");
                    return None;
                }
            }
        }
        None
    }
}

/// Reads one line without its terminator. None for an empty file.
fn first_line(path: &Path) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RESOURCE: &str = "META-INF/services/javax.el.ExpressionFactory";

    fn write_resource(root: &Path, contents: &str) {
        let path = root.join(RESOURCE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_reads_first_line_only() {
        let dir = TempDir::new().unwrap();
        write_resource(dir.path(), "com.example.Factory\r\ncom.example.Other\n");
        let scope = ScopeIdentity::from_raw(1);

        let discovery = FsDiscovery::new();
        discovery.add_root(scope, dir.path());

        assert_eq!(
            discovery.read_first_line(RESOURCE, scope).as_deref(),
            Some("com.example.Factory")
        );
    }

    #[test]
    fn test_missing_resource_is_none() {
        let dir = TempDir::new().unwrap();
        let scope = ScopeIdentity::from_raw(1);
        let discovery = FsDiscovery::new();
        discovery.add_root(scope, dir.path());

        assert!(discovery.read_first_line(RESOURCE, scope).is_none());
        assert!(discovery
            .read_first_line(RESOURCE, ScopeIdentity::from_raw(2))
            .is_none());
    }

    #[test]
    fn test_empty_resource_is_none() {
        let dir = TempDir::new().unwrap();
        write_resource(dir.path(), "");
        let discovery = FsDiscovery::new().with_system_root(dir.path());

        assert!(discovery
            .read_first_line(RESOURCE, ScopeIdentity::SYSTEM)
            .is_none());
    }

    #[test]
    fn test_system_roots_take_precedence() {
        let system = TempDir::new().unwrap();
        let module = TempDir::new().unwrap();
        write_resource(system.path(), "system.Factory\n");
        write_resource(module.path(), "module.Factory\n");
        let scope = ScopeIdentity::from_raw(5);

        let discovery = FsDiscovery::new().with_system_root(system.path());
        discovery.add_root(scope, module.path());

        assert_eq!(
            discovery.read_first_line(RESOURCE, scope).as_deref(),
            Some("system.Factory")
        );
    }

    #[test]
    fn test_scope_roots_not_visible_to_other_scopes() {
        let module = TempDir::new().unwrap();
        write_resource(module.path(), "module.Factory\n");
        let scope = ScopeIdentity::from_raw(5);

        let discovery = FsDiscovery::new();
        discovery.add_root(scope, module.path());

        assert!(discovery
            .read_first_line(RESOURCE, ScopeIdentity::SYSTEM)
            .is_none());
        assert!(discovery
            .read_first_line(RESOURCE, ScopeIdentity::from_raw(6))
            .is_none());

        assert!(discovery.remove_scope(scope));
        assert!(discovery.read_first_line(RESOURCE, scope).is_none());
    }
}
