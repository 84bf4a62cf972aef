//! Mods Module
//!
//! Add-on files in the server's mods directory.
//!
//! ## Responsibilities
//! - List regular files in the directory (sorted by name)
//! - Store uploaded content atomically under a validated name
//! - Delete a file by name
//!
//! Every mutating call returns the listing after the change.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tempfile::Builder;

use crate::config::Config;
use crate::error::{GateError, Result};

/// Prefix of in-flight uploads; `list` never reports these
const UPLOAD_PREFIX: &str = ".craftgate-upload-";

/// Manages one mods directory
#[derive(Debug, Clone)]
pub struct ModStore {
    dir: PathBuf,
}

impl ModStore {
    /// Create a store over `dir`; the directory is not touched until used
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store over the configured mods directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mods_path())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of regular files in the directory, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if name.starts_with(UPLOAD_PREFIX) => {}
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }

        names.sort();
        Ok(names)
    }

    /// Store `content` as `name`, replacing any existing file
    pub fn save<R: Read>(&self, name: &str, mut content: R) -> Result<Vec<String>> {
        let target = self.path_for(name)?;

        let mut tmp = Builder::new().prefix(UPLOAD_PREFIX).tempfile_in(&self.dir)?;
        let written = io::copy(&mut content, &mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| GateError::Io(e.error))?;

        tracing::info!("Saved mod {} ({} bytes)", name, written);
        self.list()
    }

    /// Delete `name`
    pub fn delete(&self, name: &str) -> Result<Vec<String>> {
        let target = self.path_for(name)?;

        match fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GateError::ModNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Deleted mod {}", name);
        self.list()
    }

    /// Resolve a bare file name inside the directory
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.starts_with(UPLOAD_PREFIX)
            || name.contains(&['/', '\\', '\0'][..]);
        if invalid {
            return Err(GateError::InvalidModName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}
