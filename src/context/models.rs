//! Kubeconfig registry and selection history data models

use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::env;

/// A named kubeconfig, either backed by its own file or aliased to another entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    root: PathBuf,
    /// Registry key; for real entries this is the path relative to the root
    pub name: String,
    /// Name of the entry this alias resolves to
    pub alias_target: Option<String>,
}

impl CredentialEntry {
    pub(crate) fn real(root: &Path, name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
            alias_target: None,
        }
    }

    pub(crate) fn alias(root: &Path, name: &str, target: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
            alias_target: Some(target.to_string()),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }

    /// File backing this entry; aliases resolve to their target's file
    pub fn path(&self) -> PathBuf {
        self.root
            .join(self.alias_target.as_deref().unwrap_or(&self.name))
    }
}

impl fmt::Display for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias_target {
            Some(target) => write!(f, "{} (alias to {})", self.name, target),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One selection of a kubeconfig (and optionally a namespace)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Unix seconds
    pub timestamp: i64,
    pub name: String,
    /// Empty when only the kubeconfig was switched
    pub namespace: String,
}

impl HistoryRecord {
    /// Parse `<unix-seconds> <name> [<namespace>]`; returns None for malformed lines
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 && fields.len() != 3 {
            return None;
        }

        let timestamp: i64 = fields[0].parse().ok()?;
        if timestamp == 0 {
            return None;
        }

        Some(Self {
            timestamp,
            name: fields[1].to_string(),
            namespace: fields.get(2).map(|s| s.to_string()).unwrap_or_default(),
        })
    }

    pub fn to_line(&self) -> String {
        if self.namespace.is_empty() {
            format!("{} {}", self.timestamp, self.name)
        } else {
            format!("{} {} {}", self.timestamp, self.name, self.namespace)
        }
    }
}

/// What the invoking shell reports as currently selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveState {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl ActiveState {
    pub fn new(name: Option<&str>, namespace: Option<&str>) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            name: non_empty(name),
            namespace: non_empty(namespace),
        }
    }

    /// Read the active selection exported by the shell wrapper
    pub fn from_env() -> Self {
        let name = std::env::var(env::ACTIVE_NAME).ok();
        let namespace = std::env::var(env::ACTIVE_NAMESPACE).ok();
        let state = Self::new(name.as_deref(), namespace.as_deref());
        debug!(
            "Active state from environment: name={:?}, namespace={:?}",
            state.name, state.namespace
        );
        state
    }

    pub fn namespace_or_empty(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }
}
