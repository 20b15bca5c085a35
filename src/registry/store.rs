//! Installed Plugin Registry
//!
//! File-backed store of installed plugin entries. The registry owns a
//! line-oriented file holding one coordinate string per entry, loads it
//! lazily on first access, and rewrites it synchronously on every
//! mutation so state survives process restart.
//!
//! The registry is an explicit handle rather than ambient global state:
//! callers construct one over a path and share it by reference. All
//! operations serialize on an internal mutex; safety across multiple
//! processes writing the same file is out of scope.

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, warn};
use parking_lot::Mutex;
use crate::registry::compat;
use crate::registry::entry::PluginEntry;
use crate::registry::error::{RegistryError, RegistryResult};

/// Directory under the user home holding registry state
const REGISTRY_DIR: &str = ".plugman";
/// Registry file name within the registry directory
const REGISTRY_FILE: &str = "installed";

/// Registry of installed plugin entries, backed by a local file
pub struct InstalledPluginRegistry {
    state: Mutex<RegistryState>,
}

/// Mutable state behind the registry mutex
struct RegistryState {
    path: PathBuf,
    /// Loaded entries, `None` until first access
    entries: Option<Vec<PluginEntry>>,
}

impl InstalledPluginRegistry {
    /// Open a registry over the given file path. No I/O happens until the
    /// first operation; a missing file reads as an empty registry.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                path: path.into(),
                entries: None,
            }),
        }
    }

    /// Open the registry at its default per-user location
    pub fn open_default() -> RegistryResult<Self> {
        Ok(Self::open(default_registry_path()?))
    }

    /// Path of the backing registry file
    pub fn path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }

    /// List all installed entries, in installation order. The returned
    /// vector is a snapshot; mutating it does not affect the registry.
    pub fn list(&self) -> RegistryResult<Vec<PluginEntry>> {
        let mut state = self.state.lock();
        Ok(state.loaded()?.to_vec())
    }

    /// Check whether an equal entry is currently installed
    pub fn has(&self, entry: &PluginEntry) -> RegistryResult<bool> {
        let mut state = self.state.lock();
        Ok(state.loaded()?.contains(entry))
    }

    /// Install an entry, replacing any existing entry occupying the same
    /// `(name, slot)` pair. The new state is flushed to disk before this
    /// returns; repeating an identical install leaves one entry, not two.
    pub fn install<N, V, S>(&self, name: N, api_version: V, slot: S) -> RegistryResult<PluginEntry>
    where
        N: Into<String>,
        V: Into<String>,
        S: Into<String>,
    {
        let entry = PluginEntry::new(name, api_version, slot)?;
        let mut state = self.state.lock();

        let mut entries = state.loaded()?.to_vec();
        entries.retain(|existing| !existing.same_slot(&entry));
        entries.push(entry.clone());

        state.flush(&entries)?;
        state.entries = Some(entries);
        debug!("Installed plugin entry {}", entry);
        Ok(entry)
    }

    /// Remove the matching entry if present. Removing an absent entry is
    /// a no-op, so cleanup paths can call this unconditionally.
    pub fn remove(&self, entry: &PluginEntry) -> RegistryResult<()> {
        let mut state = self.state.lock();

        let mut entries = state.loaded()?.to_vec();
        let before = entries.len();
        entries.retain(|existing| existing != entry);
        if entries.len() == before {
            debug!("Plugin entry {} not installed, nothing to remove", entry);
            return Ok(());
        }

        state.flush(&entries)?;
        state.entries = Some(entries);
        debug!("Removed plugin entry {}", entry);
        Ok(())
    }

    /// Check whether an installed entry may run under the given host
    /// runtime version. See [`compat::is_api_compatible`].
    pub fn is_api_compatible(host_version: &str, entry: &PluginEntry) -> RegistryResult<bool> {
        compat::is_api_compatible(host_version, entry)
    }
}

impl RegistryState {
    /// Entries, loading them from disk on first access
    fn loaded(&mut self) -> RegistryResult<&[PluginEntry]> {
        if self.entries.is_none() {
            self.entries = Some(load_entries(&self.path)?);
        }
        Ok(self.entries.as_deref().unwrap_or_default())
    }

    /// Write the given entries to the registry file. The write goes to a
    /// sibling temporary file first and is renamed into place, so a
    /// failure leaves the previous file intact.
    fn flush(&self, entries: &[PluginEntry]) -> RegistryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::storage_failed(format!(
                        "failed to create registry directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut contents = String::new();
        for entry in entries {
            contents.push_str(&entry.to_coordinates());
            contents.push('\n');
        }

        let scratch = self.path.with_extension("tmp");
        fs::write(&scratch, contents).map_err(|e| {
            RegistryError::storage_failed(format!(
                "failed to write registry file {}: {}",
                scratch.display(),
                e
            ))
        })?;
        fs::rename(&scratch, &self.path).map_err(|e| {
            RegistryError::storage_failed(format!(
                "failed to replace registry file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Flushed {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// Read and parse the registry file. A missing file is an empty registry;
/// a malformed line is skipped with a warning rather than poisoning the
/// whole registry.
fn load_entries(path: &Path) -> RegistryResult<Vec<PluginEntry>> {
    if !path.exists() {
        debug!("Registry file {} does not exist, starting empty", path.display());
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RegistryError::storage_failed(format!(
            "failed to read registry file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match PluginEntry::from_coordinates(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(
                "Skipping malformed registry record '{}' in {}: {}",
                line,
                path.display(),
                e
            ),
        }
    }

    debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Default registry file location, under the user home directory
pub fn default_registry_path() -> RegistryResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RegistryError::storage_failed("could not determine home directory"))?;
    Ok(home.join(REGISTRY_DIR).join(REGISTRY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn temp_registry() -> (tempfile::TempDir, InstalledPluginRegistry) {
        let dir = tempdir().expect("Failed to create temp directory");
        let registry = InstalledPluginRegistry::open(dir.path().join("installed"));
        (dir, registry)
    }

    #[test]
    fn test_empty_registry() {
        let (_dir, registry) = temp_registry();
        assert!(registry.list().unwrap().is_empty());

        let entry = PluginEntry::new("test.test", "1.0.0-SNAPSHOT", "moo").unwrap();
        assert!(!registry.has(&entry).unwrap());
    }

    #[test]
    fn test_install_and_query() {
        let (_dir, registry) = temp_registry();

        let installed = registry.install("test.test", "1.0.0-SNAPSHOT", "moo").unwrap();
        assert!(registry.has(&installed).unwrap());

        let listed = registry.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].to_coordinates(), "test.test:1.0.0-SNAPSHOT:moo");
    }

    #[test]
    fn test_install_idempotent() {
        let (_dir, registry) = temp_registry();

        registry.install("test.test", "1.0.0-SNAPSHOT", "moo").unwrap();
        registry.install("test.test", "1.0.0-SNAPSHOT", "moo").unwrap();
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_install_replaces_within_slot() {
        let (_dir, registry) = temp_registry();

        let old = registry.install("test.test", "1.0.0-SNAPSHOT", "main").unwrap();
        let new = registry.install("test.test", "2.0.0-SNAPSHOT", "main").unwrap();

        assert!(!registry.has(&old).unwrap());
        assert!(registry.has(&new).unwrap());
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_slots_coexist() {
        let (_dir, registry) = temp_registry();

        let one = registry.install("foo", "1", "s1").unwrap();
        let two = registry.install("foo", "2", "s2").unwrap();

        assert!(registry.has(&one).unwrap());
        assert!(registry.has(&two).unwrap());
        assert_eq!(registry.list().unwrap().len(), 2);

        registry.remove(&one).unwrap();
        assert!(!registry.has(&one).unwrap());
        assert!(registry.has(&two).unwrap());

        registry.remove(&two).unwrap();
        assert!(!registry.has(&two).unwrap());
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (_dir, registry) = temp_registry();
        let entry = PluginEntry::new("ghost", "1.0.0", "main").unwrap();
        registry.remove(&entry).unwrap();
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_returns_snapshot() {
        let (_dir, registry) = temp_registry();
        registry.install("foo", "1.0.0", "main").unwrap();

        let mut snapshot = registry.list().unwrap();
        snapshot.clear();
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("installed");

        {
            let registry = InstalledPluginRegistry::open(&path);
            registry.install("test.test", "1.0.0-SNAPSHOT", "moo").unwrap();
            registry.install("other.plugin", "2.1.0.Final", "main").unwrap();
        }

        let reopened = InstalledPluginRegistry::open(&path);
        let entries = reopened.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].to_coordinates(), "test.test:1.0.0-SNAPSHOT:moo");
        assert_eq!(entries[1].to_coordinates(), "other.plugin:2.1.0.Final:main");
    }

    #[test]
    fn test_malformed_record_skipped_on_load() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("installed");
        fs::write(&path, "good.plugin:1.0.0:main\nnot a coordinate line\n").unwrap();

        let registry = InstalledPluginRegistry::open(&path);
        let entries = registry.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "good.plugin");
    }

    #[test]
    fn test_registry_file_format() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("installed");

        let registry = InstalledPluginRegistry::open(&path);
        registry.install("foo", "1", "s1").unwrap();
        registry.install("foo", "2", "s2").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "foo:1:s1\nfoo:2:s2\n");
    }

    #[test]
    fn test_compatibility_delegation() {
        let entry = PluginEntry::new("foo", "1.0.0-SNAPSHOT", "main").unwrap();
        assert!(InstalledPluginRegistry::is_api_compatible("1.0.5.Final", &entry).unwrap());
        assert!(!InstalledPluginRegistry::is_api_compatible("2.0.0.Final", &entry).unwrap());
    }
}
