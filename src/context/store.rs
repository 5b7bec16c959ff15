//! Kubeconfig registry backed by a directory of files
//!
//! The registry is a snapshot of the root directory taken once at
//! construction. Concurrent changes to the directory by another process
//! between the snapshot and a later mutation are not detected; there is no
//! file locking.

use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{KwError, Result};

use super::models::CredentialEntry;

/// Registry of kubeconfig files under one root directory
#[derive(Debug)]
pub struct CredentialStore {
    root: PathBuf,
    entries: BTreeMap<String, CredentialEntry>,
    current: Option<String>,
}

impl CredentialStore {
    /// Scan `root`, overlay `aliases` (alias name -> target name) and bind the
    /// active entry.
    ///
    /// Fails when an alias collides with a real entry, an alias target does not
    /// exist, or `active_name` does not resolve to any entry.
    pub fn open(
        root: &Path,
        aliases: &BTreeMap<String, String>,
        active_name: Option<&str>,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        Self::walk(root, root, &mut entries)?;
        debug!(
            "Found {} kubeconfig file(s) under {}",
            entries.len(),
            root.display()
        );

        for (alias, target) in aliases {
            if entries.contains_key(alias) {
                return Err(KwError::Config(format!(
                    "alias \"{}\" is already used by a kubeconfig",
                    alias
                )));
            }
            // Targets are looked up among real files only, so alias chains are impossible
            let target_is_real = entries
                .get(target)
                .is_some_and(|e: &CredentialEntry| !e.is_alias());
            if !target_is_real {
                return Err(KwError::Config(format!(
                    "alias \"{}\" target \"{}\" not found",
                    alias, target
                )));
            }
            entries.insert(alias.clone(), CredentialEntry::alias(root, alias, target));
        }

        let current = match active_name {
            Some(name) if !name.is_empty() => {
                if !entries.contains_key(name) {
                    return Err(KwError::Corruption(format!(
                        "current kubeconfig \"{}\" not found, please unuse it",
                        name
                    )));
                }
                Some(name.to_string())
            }
            _ => None,
        };

        Ok(Self {
            root: root.to_path_buf(),
            entries,
            current,
        })
    }

    fn walk(
        root: &Path,
        dir: &Path,
        entries: &mut BTreeMap<String, CredentialEntry>,
    ) -> Result<()> {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound && dir == root => return Ok(()),
            Err(e) => {
                return Err(KwError::Config(format!(
                    "read kubeconfig root {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        for item in read_dir {
            let item = item?;
            let path = item.path();
            if item.file_type()?.is_dir() {
                Self::walk(root, &path, entries)?;
                continue;
            }
            let name = relative_name(root, &path)?;
            if name.chars().any(char::is_whitespace) {
                warn!("Skipping kubeconfig '{}': names cannot contain whitespace", name);
                continue;
            }
            entries.insert(name.clone(), CredentialEntry::real(root, &name));
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries (real and alias), sorted by name
    pub fn list(&self) -> Vec<&CredentialEntry> {
        self.entries.values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&CredentialEntry> {
        self.entries.get(name)
    }

    /// The active entry, if the shell has one selected
    pub fn current(&self) -> Option<&CredentialEntry> {
        self.current.as_ref().and_then(|name| self.entries.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `content` to the entry's file, registering `name` as a new real
    /// entry when it does not exist yet. Writing through an alias writes the
    /// target's file.
    pub fn put(&mut self, name: &str, content: &[u8]) -> Result<CredentialEntry> {
        validate_name(name)?;

        let entry = self
            .entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| CredentialEntry::real(&self.root, name));

        let path = entry.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                KwError::Config(format!(
                    "ensure kubeconfig dir {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        fs::write(&path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        self.entries.insert(name.to_string(), entry.clone());
        debug!("Wrote kubeconfig '{}' to {}", name, path.display());
        Ok(entry)
    }

    /// Delete a real entry's file and prune directories left empty
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.current.as_deref() == Some(name) {
            return Err(KwError::Conflict(
                "cannot delete current kubeconfig, please unuse it first".to_string(),
            ));
        }

        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| KwError::not_found("kubeconfig", name))?;

        if self
            .entries
            .values()
            .any(|e| e.alias_target.as_deref() == Some(name))
        {
            return Err(KwError::Conflict(
                "this kubeconfig is used by an alias, please remove the alias from the settings file first"
                    .to_string(),
            ));
        }

        if entry.is_alias() {
            return Err(KwError::Conflict(
                "cannot delete an alias kubeconfig, please remove it from the settings file"
                    .to_string(),
            ));
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.prune_empty_dirs(&path)?;

        self.entries.remove(name);
        debug!("Deleted kubeconfig '{}'", name);
        Ok(())
    }

    fn prune_empty_dirs(&self, file: &Path) -> Result<()> {
        for dir in file.ancestors().skip(1) {
            if dir == self.root || !dir.starts_with(&self.root) {
                break;
            }
            if fs::read_dir(dir)?.next().is_some() {
                break;
            }
            debug!("Removing empty directory {}", dir.display());
            fs::remove_dir(dir)?;
        }
        Ok(())
    }

    /// Remove the whole root directory
    pub fn delete_all(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(KwError::Conflict(
                "cannot delete all kubeconfigs, please unuse the current kubeconfig first"
                    .to_string(),
            ));
        }
        if self.entries.values().any(CredentialEntry::is_alias) {
            return Err(KwError::Conflict(
                "cannot delete all kubeconfigs, please remove the alias kubeconfigs first"
                    .to_string(),
            ));
        }

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.entries.clear();
        Ok(())
    }
}

fn relative_name(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        KwError::Config(format!(
            "bad kubeconfig path {}, not under {}",
            path.display(),
            root.display()
        ))
    })?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Names are relative paths that must stay inside the root. Whitespace is
/// rejected since history records are space separated.
fn validate_name(name: &str) -> Result<()> {
    if name.chars().any(char::is_whitespace) {
        return Err(KwError::InvalidInput(format!(
            "kubeconfig name \"{}\" must not contain whitespace",
            name
        )));
    }
    let path = Path::new(name);
    let ok = !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !ok {
        return Err(KwError::InvalidInput(format!(
            "kubeconfig name \"{}\" must be a relative path without '..'",
            name
        )));
    }
    Ok(())
}
