//! Environment export script handed to the invoking shell
//!
//! kwctl cannot change its parent's environment, so switching writes a small
//! script to the source file; the shell wrapper runs `kwctl source` after
//! every invocation and evaluates what it prints.

use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::{defaults, env};
use crate::error::{KwError, Result};

use super::models::CredentialEntry;

/// Script exporting `entry` (and `namespace`, possibly empty) as active
pub fn activate_script(entry: &CredentialEntry, namespace: &str) -> String {
    let ns_flag = if namespace.is_empty() {
        String::new()
    } else {
        format!(" -n {}", namespace)
    };
    format!(
        "export {}=\"{}\"\nexport {}=\"{}\"\nexport {}=\"{}\"\nalias k='{}{}'",
        env::ACTIVE_NAME,
        entry.name,
        env::ACTIVE_PATH,
        entry.path().display(),
        env::ACTIVE_NAMESPACE,
        namespace,
        defaults::KUBECTL,
        ns_flag
    )
}

/// Script clearing the active selection
pub fn unset_script() -> String {
    format!(
        "export {}=\"\"\nexport {}=\"\"\nexport {}=\"\"\nalias k='{}'",
        env::ACTIVE_NAME,
        env::ACTIVE_PATH,
        env::ACTIVE_NAMESPACE,
        defaults::KUBECTL
    )
}

/// Write the script for the shell wrapper to pick up
pub fn write(path: &Path, script: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            KwError::Config(format!(
                "ensure source directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    fs::write(path, script).map_err(|e| {
        KwError::Config(format!("write source file {}: {}", path.display(), e))
    })?;
    debug!("Wrote environment export to {}", path.display());
    Ok(())
}

/// Read the pending script, deleting it unless `keep` is set. Nothing pending yields "".
pub fn take(path: &Path, keep: bool) -> Result<String> {
    let script = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => {
            return Err(KwError::Config(format!(
                "read source file {}: {}",
                path.display(),
                e
            )))
        }
    };

    if !keep {
        fs::remove_file(path).map_err(|e| {
            KwError::Config(format!("delete source file {}: {}", path.display(), e))
        })?;
    }
    Ok(script)
}
