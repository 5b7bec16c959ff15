//! Context switch coordination
//!
//! Decides which kubeconfig or namespace becomes active from the command
//! argument, the active selection and the history, then applies the switch.

use log::debug;

use crate::error::{KwError, Result};
use crate::kube::RemoteControl;
use crate::settings::Settings;
use crate::ui::Prompter;

use super::export;
use super::history::SelectionHistory;
use super::models::{ActiveState, CredentialEntry};
use super::store::CredentialStore;

/// Argument meaning "the previous selection"
pub const BACK_REFERENCE: &str = "-";

/// Store, history and active selection of one invocation
pub struct Switcher<'a> {
    settings: &'a Settings,
    prompter: &'a dyn Prompter,
    active: ActiveState,
    store: CredentialStore,
    history: SelectionHistory,
}

impl<'a> Switcher<'a> {
    /// Load the registry and history configured in `settings`
    pub fn open(
        settings: &'a Settings,
        active: ActiveState,
        prompter: &'a dyn Prompter,
    ) -> Result<Self> {
        let store = CredentialStore::open(
            &settings.kubeconfig_root(),
            &settings.kubeconfig.alias,
            active.name.as_deref(),
        )?;
        let history = SelectionHistory::open(&settings.history_path(), settings.history_max())?;
        Ok(Self {
            settings,
            prompter,
            active,
            store,
            history,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter
    }

    pub fn active(&self) -> &ActiveState {
        &self.active
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CredentialStore {
        &mut self.store
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SelectionHistory {
        &mut self.history
    }

    fn current_name(&self) -> &str {
        self.store.current().map(|e| e.name.as_str()).unwrap_or("")
    }

    /// The active kubeconfig, required by namespace operations
    pub fn require_current(&self) -> Result<&CredentialEntry> {
        self.store.current().ok_or_else(|| {
            KwError::Conflict(
                "no kubeconfig selected, cannot perform ns operations, please select one first"
                    .to_string(),
            )
        })
    }

    /// Resolve the kubeconfig to switch to.
    ///
    /// * `-` - the most recent other kubeconfig in history
    /// * a name - that entry; a missing one is created after confirmation
    /// * nothing - fuzzy selection over every entry but the active one
    pub fn resolve_credential(
        &mut self,
        name: Option<&str>,
        skip_confirm: bool,
    ) -> Result<CredentialEntry> {
        match name {
            Some(BACK_REFERENCE) => {
                let last = self
                    .history
                    .last_name(self.current_name())
                    .ok_or_else(|| KwError::Conflict("no last kubeconfig selected".to_string()))?;
                debug!("Back reference resolved to '{}'", last);
                self.store.get(last).cloned().ok_or_else(|| {
                    KwError::Corruption(format!(
                        "cannot find last kubeconfig {:?} in history, you should remove history records",
                        last
                    ))
                })
            }
            Some(name) => match self.store.get(name) {
                Some(entry) => Ok(entry.clone()),
                None => self.create(name, skip_confirm),
            },
            None => self.select_credential(),
        }
    }

    fn create(&mut self, name: &str, skip_confirm: bool) -> Result<CredentialEntry> {
        self.prompter.confirm(
            skip_confirm,
            &format!("kubeconfig {:?} not found, do you want to create it", name),
        )?;
        let content = self.prompter.edit("")?;
        self.store.put(name, content.as_bytes())
    }

    /// Fuzzy-select one kubeconfig other than the active one
    pub fn select_credential(&self) -> Result<CredentialEntry> {
        let current = self.current_name();
        let candidates: Vec<&CredentialEntry> = self
            .store
            .list()
            .into_iter()
            .filter(|e| e.name != current)
            .collect();
        if candidates.is_empty() {
            return Err(KwError::Conflict("no kubeconfig to select".to_string()));
        }

        let names: Vec<String> = candidates.iter().map(|e| e.name.clone()).collect();
        let idx = self.prompter.select("Select kubeconfig", &names)?;
        candidates
            .get(idx)
            .map(|e| (*e).clone())
            .ok_or(KwError::Canceled)
    }

    /// Namespaces offered for the active kubeconfig, minus the active namespace.
    ///
    /// A static `namespace_alias` list configured for the kubeconfig replaces
    /// the cluster query.
    pub async fn list_namespaces(&self, remote: &dyn RemoteControl) -> Result<Vec<String>> {
        let current = self.require_current()?;
        let all = match self.settings.namespace_alias(&current.name) {
            Some(list) => {
                debug!("Using namespace alias list for '{}'", current.name);
                list.to_vec()
            }
            None => remote.list_namespaces().await?,
        };

        let exclude = self.active.namespace_or_empty();
        Ok(all
            .into_iter()
            .filter(|ns| exclude.is_empty() || ns != exclude)
            .collect())
    }

    /// Resolve the namespace to switch to for the active kubeconfig
    pub async fn resolve_namespace(
        &self,
        remote: &dyn RemoteControl,
        name: Option<&str>,
    ) -> Result<String> {
        let current = self.require_current()?;
        match name {
            Some(BACK_REFERENCE) => self
                .history
                .last_namespace(&current.name, self.active.namespace_or_empty())
                .map(str::to_string)
                .ok_or_else(|| KwError::Conflict("no last namespace selected".to_string())),
            Some(namespace) => Ok(namespace.to_string()),
            None => {
                let items = self.list_namespaces(remote).await?;
                if items.is_empty() {
                    return Err(KwError::Conflict("no namespace to select".to_string()));
                }
                let idx = self.prompter.select("Select namespace", &items)?;
                items.get(idx).cloned().ok_or(KwError::Canceled)
            }
        }
    }

    /// Export `entry` (with `namespace`, possibly empty) for the shell and
    /// record exactly one history entry.
    pub fn apply_switch(&mut self, entry: &CredentialEntry, namespace: &str) -> Result<()> {
        debug!("Switching to '{}' namespace '{}'", entry.name, namespace);
        export::write(
            &self.settings.source_path(),
            &export::activate_script(entry, namespace),
        )?;
        self.history.add(&entry.name, namespace);
        self.history.save()
    }
}
