//! Runtime settings loaded from the TOML settings file
//!
//! Every key is optional; missing values fall back to built-in defaults
//! during normalization. Paths accept `~` and `$VAR` / `${VAR}` and must be
//! absolute once expanded.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{defaults, env, history, nodeshell};
use crate::error::{KwError, Result};

/// Normalized settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Name of the shell wrapper function
    pub cmd: String,
    /// Editor used to create and edit kubeconfig files
    pub editor: String,
    /// Where the environment export script is written
    pub source_file_path: String,
    pub kubectl: KubectlSettings,
    pub nodeshell: NodeShellSettings,
    pub kubeconfig: KubeconfigSettings,
    pub history: HistorySettings,
    /// Static namespace lists keyed by kubeconfig name
    pub namespace_alias: Vec<NamespaceAlias>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KubectlSettings {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeShellSettings {
    pub namespace: String,
    pub image: String,
    pub shell: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KubeconfigSettings {
    pub root: String,
    /// Alias name -> target kubeconfig name
    pub alias: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub path: String,
    pub max: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NamespaceAlias {
    pub configs: Vec<String>,
    pub namespaces: Vec<String>,
}

impl Settings {
    /// Load settings.
    ///
    /// * `path` - explicit settings file, must exist
    /// * `use_default` - ignore any file and use built-in defaults
    ///
    /// Without an explicit path, `~/.config/kwctl/config.toml` is read when it exists.
    pub fn load(path: Option<&Path>, use_default: bool) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| KwError::Config("cannot determine home directory".to_string()))?;

        let raw = if use_default {
            debug!("Using built-in default settings");
            Settings::default()
        } else {
            match path {
                Some(path) => Self::read_file(path)?,
                None => {
                    let path = home.join(".config").join(defaults::SETTINGS_FILE);
                    if path.exists() {
                        Self::read_file(&path)?
                    } else {
                        debug!("No settings file at {}, using defaults", path.display());
                        Settings::default()
                    }
                }
            }
        };

        raw.normalize(&home)
    }

    fn read_file(path: &Path) -> Result<Self> {
        debug!("Reading settings from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            KwError::Config(format!(
                "failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse raw (not yet normalized) settings from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| KwError::Config(format!("invalid TOML: {}", e)))
    }

    /// Fill defaults, expand paths and validate
    pub fn normalize(mut self, home: &Path) -> Result<Self> {
        if self.cmd.is_empty() {
            self.cmd = defaults::WRAPPER_COMMAND.to_string();
        }

        self.editor = expand(&self.editor, home);
        if self.editor.is_empty() {
            self.editor = std::env::var(env::EDITOR).unwrap_or_default();
        }
        if self.editor.is_empty() {
            self.editor = defaults::EDITOR.to_string();
        }

        self.source_file_path = normalize_path(
            &self.source_file_path,
            home,
            defaults::SOURCE_FILE,
            "source_file_path",
        )?;

        if self.kubectl.name.is_empty() {
            self.kubectl.name = defaults::KUBECTL.to_string();
        }

        if self.nodeshell.namespace.is_empty() {
            self.nodeshell.namespace = nodeshell::NAMESPACE.to_string();
        }
        if self.nodeshell.image.is_empty() {
            self.nodeshell.image = nodeshell::IMAGE.to_string();
        }
        if self.nodeshell.shell.is_empty() {
            self.nodeshell.shell = nodeshell::SHELL.iter().map(|s| s.to_string()).collect();
        }

        self.kubeconfig.root = normalize_path(
            &self.kubeconfig.root,
            home,
            defaults::KUBECONFIG_ROOT,
            "kubeconfig.root",
        )?;

        self.history.path =
            normalize_path(&self.history.path, home, defaults::HISTORY_FILE, "history.path")?;

        if self.history.max <= 0 {
            self.history.max = history::DEFAULT_MAX;
        }
        if self.history.max < history::MIN_MAX {
            return Err(KwError::Config(format!(
                "`history.max` is too small, should be >= {}",
                history::MIN_MAX
            )));
        }
        if self.history.max > history::MAX_MAX {
            return Err(KwError::Config(format!(
                "`history.max` is too large, should be <= {}",
                history::MAX_MAX
            )));
        }

        Ok(self)
    }

    pub fn kubeconfig_root(&self) -> PathBuf {
        PathBuf::from(&self.kubeconfig.root)
    }

    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(&self.history.path)
    }

    pub fn history_max(&self) -> usize {
        self.history.max as usize
    }

    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source_file_path)
    }

    /// Static namespace list configured for a kubeconfig, if any
    pub fn namespace_alias(&self, config_name: &str) -> Option<&[String]> {
        self.namespace_alias
            .iter()
            .find(|alias| alias.configs.iter().any(|c| c == config_name))
            .map(|alias| alias.namespaces.as_slice())
    }
}

fn normalize_path(value: &str, home: &Path, default: &str, key: &str) -> Result<String> {
    let value = if value.is_empty() {
        home.join(default).to_string_lossy().into_owned()
    } else {
        expand(value, home)
    };
    if !Path::new(&value).is_absolute() {
        return Err(KwError::Config(format!("`{}` is not absolute", key)));
    }
    Ok(value)
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references; unknown variables expand to ""
fn expand(value: &str, home: &Path) -> String {
    let value = match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", home.display(), rest)
        }
        _ => value.to_string(),
    };

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                chars.next();
                if c == '}' {
                    break;
                }
                name.push(c);
            } else if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() && !braced {
            out.push('$');
            continue;
        }
        out.push_str(&std::env::var(&name).unwrap_or_default());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/tester")
    }

    #[test]
    fn test_defaults_normalize() {
        let settings = Settings::default().normalize(&home()).unwrap();
        assert_eq!(settings.cmd, "kw");
        assert_eq!(settings.kubectl.name, "kubectl");
        assert_eq!(settings.kubeconfig.root, "/home/tester/.kube/kwctl");
        assert_eq!(settings.history.path, "/home/tester/.local/share/kwctl/history");
        assert_eq!(settings.history_max(), 100);
        assert_eq!(settings.nodeshell.namespace, "kube-system");
        assert_eq!(settings.nodeshell.shell, vec!["sh".to_string()]);
        assert!(!settings.editor.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            cmd = "k8"
            editor = "nano"
            source_file_path = "/tmp/kw/source"

            [kubectl]
            name = "kubectl.1.29"
            args = ["--request-timeout", "5s"]

            [nodeshell]
            namespace = "debug"
            image = "alpine:3"
            shell = ["nsenter", "-t", "1", "-m", "-u", "-i", "-n", "--", "bash"]

            [kubeconfig]
            root = "~/clusters"
            alias = { prod = "clusters/prod.yaml" }

            [history]
            path = "/tmp/kw/history"
            max = 20

            [[namespace_alias]]
            configs = ["prod", "staging"]
            namespaces = ["web", "db"]
        "#;
        let settings = Settings::from_toml(toml).unwrap().normalize(&home()).unwrap();
        assert_eq!(settings.cmd, "k8");
        assert_eq!(settings.editor, "nano");
        assert_eq!(settings.kubectl.args.len(), 2);
        assert_eq!(settings.nodeshell.image, "alpine:3");
        assert_eq!(settings.kubeconfig.root, "/home/tester/clusters");
        assert_eq!(
            settings.kubeconfig.alias.get("prod").map(String::as_str),
            Some("clusters/prod.yaml")
        );
        assert_eq!(settings.history_max(), 20);
        assert_eq!(
            settings.namespace_alias("staging"),
            Some(&["web".to_string(), "db".to_string()][..])
        );
        assert!(settings.namespace_alias("dev").is_none());
    }

    #[test]
    fn test_history_max_too_small() {
        let raw = Settings::from_toml("[history]\nmax = 4").unwrap();
        let err = raw.normalize(&home()).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_history_max_too_large() {
        let raw = Settings::from_toml("[history]\nmax = 501").unwrap();
        let err = raw.normalize(&home()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_history_max_bounds_inclusive() {
        for max in [5, 500] {
            let raw = Settings::from_toml(&format!("[history]\nmax = {}", max)).unwrap();
            assert_eq!(raw.normalize(&home()).unwrap().history_max(), max as usize);
        }
    }

    #[test]
    fn test_negative_history_max_takes_default() {
        let raw = Settings::from_toml("[history]\nmax = -3").unwrap();
        assert_eq!(raw.normalize(&home()).unwrap().history_max(), 100);
    }

    #[test]
    fn test_relative_root_rejected() {
        let raw = Settings::from_toml("[kubeconfig]\nroot = \"relative/dir\"").unwrap();
        let err = raw.normalize(&home()).unwrap_err();
        assert!(err.to_string().contains("kubeconfig.root"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml("cmd = ").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("KWCTL_TEST_EXPAND_DIR", "/srv/kube");
        assert_eq!(
            expand("$KWCTL_TEST_EXPAND_DIR/configs", &home()),
            "/srv/kube/configs"
        );
        assert_eq!(
            expand("${KWCTL_TEST_EXPAND_DIR}/x", &home()),
            "/srv/kube/x"
        );
        assert_eq!(expand("~/a", &home()), "/home/tester/a");
        assert_eq!(expand("~user/a", &home()), "~user/a");
        assert_eq!(expand("cost$", &home()), "cost$");
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Settings::load(Some(&dir.path().join("missing.toml")), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_use_default_ignores_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("missing.toml")), true).unwrap();
        assert_eq!(settings.cmd, "kw");
    }
}
