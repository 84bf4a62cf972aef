//! Properties Store
//!
//! Loading, atomic saving, and serialized read-modify-write of properties files.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::error::{GateError, Result};

use super::PropertySet;

/// Load a properties file
///
/// A missing file is `PropertiesNotFound`, never an empty set. Lines that are
/// not valid UTF-8 are skipped like any other malformed line; a later save
/// drops them from the file.
pub fn load(path: &Path) -> Result<PropertySet> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            GateError::PropertiesNotFound(path.to_path_buf())
        } else {
            GateError::PropertiesIo {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let properties = match String::from_utf8(bytes) {
        Ok(contents) => PropertySet::parse(&contents),
        Err(e) => PropertySet::parse(&utf8_lines(path, e.as_bytes())),
    };
    tracing::trace!("Loaded {} properties from {}", properties.len(), path.display());
    Ok(properties)
}

/// Keep only the lines of `bytes` that decode as UTF-8
fn utf8_lines(path: &Path, bytes: &[u8]) -> String {
    let mut contents = String::with_capacity(bytes.len());
    for (index, line) in bytes.split(|&b| b == b'\n').enumerate() {
        match std::str::from_utf8(line) {
            Ok(line) => {
                contents.push_str(line);
                contents.push('\n');
            }
            Err(_) => tracing::warn!(
                "Skipping line {} of {}: not valid UTF-8",
                index + 1,
                path.display()
            ),
        }
    }
    contents
}

/// Replace a properties file with `properties`
///
/// Writes a temp file next to the target, syncs it, then renames it over the
/// target, so readers see either the old or the new contents. Permissions of an
/// existing target are carried over.
pub fn save(path: &Path, properties: &PropertySet) -> Result<()> {
    let io_err = |source: io::Error| GateError::PropertiesIo {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(properties.render().as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!("Saved {} properties to {}", properties.len(), path.display());
    Ok(())
}

/// Serializes writers of properties files within this process
///
/// ## Concurrency:
/// - One lock per file path, created on first use
/// - `set_and_save` and `save` hold the file's lock for their whole duration
/// - `load` takes no lock; atomic renames mean it never sees a partial file
///
/// The lock is in-process only. The store must be the sole writer of the file.
#[derive(Default)]
pub struct PropertyStore {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a properties file (see [`load`])
    pub fn load(&self, path: &Path) -> Result<PropertySet> {
        load(path)
    }

    /// Replace a properties file while holding its lock (see [`save`])
    pub fn save(&self, path: &Path, properties: &PropertySet) -> Result<()> {
        let lock = self.lock_for(path);
        let _guard = lock.lock();
        save(path, properties)
    }

    /// Load, set one key, save, and return the resulting full set
    ///
    /// Concurrent calls on the same file are serialized, so each sees every
    /// previously committed write.
    pub fn set_and_save(&self, path: &Path, key: &str, value: &str) -> Result<PropertySet> {
        let lock = self.lock_for(path);
        let _guard = lock.lock();

        let mut properties = load(path)?;
        properties.set(key, value)?;
        save(path, &properties)?;

        // Values can be secrets (rcon.password), log the key only
        tracing::info!("Property {} updated in {}", key.trim(), path.display());
        Ok(properties)
    }

    /// Lock shared by every caller naming the same file
    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(key).or_default())
    }
}
