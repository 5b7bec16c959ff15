//! Kubeconfig and namespace command handlers

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use log::debug;
use std::fs;
use std::io::{self, ErrorKind, IsTerminal};

use crate::cli::{ConfigArgs, InitArgs, InitShell, NsArgs, SourceArgs};
use crate::error::{KwError, Result};
use crate::kube::RemoteControl;
use crate::settings::Settings;
use crate::ui::{bold, format_timestamp, print_hint, Prompter};

use super::export;
use super::models::{ActiveState, CredentialEntry, HistoryRecord};
use super::resolve::Switcher;
use super::store::CredentialStore;

const POSIX_WRAPPER: &str = include_str!("wrapper.sh");
const FISH_WRAPPER: &str = include_str!("wrapper.fish");

/// Run the config command
pub fn run_config_command(
    settings: &Settings,
    active: ActiveState,
    prompter: &dyn Prompter,
    args: &ConfigArgs,
) -> Result<()> {
    // Unusing works even when the active name no longer exists in the registry
    if args.unuse {
        return unuse_kubeconfig(settings, &active);
    }

    let mut switcher = Switcher::open(settings, active, prompter)?;
    let name = args.name.as_deref();
    if args.edit {
        edit_kubeconfig(&mut switcher, name, args.yes)
    } else if args.delete {
        delete_kubeconfig(&mut switcher, name)
    } else if args.delete_all {
        delete_all_kubeconfigs(&mut switcher, args.yes)
    } else if args.list {
        println!(
            "{}",
            render_entries(switcher.store(), name, io::stdout().is_terminal())?
        );
        Ok(())
    } else if args.list_history {
        let records = kubeconfig_history(&switcher, name)?;
        println!("{}", render_history(&records, "KUBECONFIG", |r| r.name.as_str()));
        Ok(())
    } else {
        let entry = switcher.resolve_credential(name, args.yes)?;
        use_kubeconfig(&mut switcher, &entry)
    }
}

/// Switch records of NAME, else of the current kubeconfig, else of all
fn kubeconfig_history<'s>(
    switcher: &'s Switcher<'_>,
    name: Option<&str>,
) -> Result<Vec<&'s HistoryRecord>> {
    let filter = match name {
        Some(n) => Some(
            switcher
                .store()
                .get(n)
                .ok_or_else(|| KwError::not_found("kubeconfig", n))?
                .name
                .clone(),
        ),
        None => switcher.store().current().map(|e| e.name.clone()),
    };
    Ok(switcher
        .history()
        .list()
        .iter()
        .filter(|r| r.namespace.is_empty())
        .filter(|r| filter.as_deref().map_or(true, |n| r.name == n))
        .collect())
}

fn use_kubeconfig(switcher: &mut Switcher<'_>, entry: &CredentialEntry) -> Result<()> {
    print_hint(&format!("Switch to kubeconfig {:?}", entry.name));
    switcher.apply_switch(entry, "")
}

fn unuse_kubeconfig(settings: &Settings, active: &ActiveState) -> Result<()> {
    let name = active.name.as_deref().ok_or_else(|| {
        KwError::Conflict("no current kubeconfig used, cannot unuse".to_string())
    })?;
    print_hint(&format!("Unuse current kubeconfig {:?}", name));
    export::write(&settings.source_path(), &export::unset_script())
}

fn edit_kubeconfig(switcher: &mut Switcher<'_>, name: Option<&str>, yes: bool) -> Result<()> {
    let current = switcher.store().current().map(|e| e.name.clone());
    let name = match (name, &current) {
        (Some(name), _) => name.to_string(),
        (None, Some(current)) => current.clone(),
        (None, None) => switcher.select_credential()?.name,
    };

    let initial = match switcher.store().get(&name) {
        Some(entry) => match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        },
        None => {
            switcher.prompter().confirm(
                yes,
                &format!("try to edit a new kubeconfig {:?}, continue", name),
            )?;
            String::new()
        }
    };

    let content = switcher.prompter().edit(&initial)?;
    let entry = switcher.store_mut().put(&name, content.as_bytes())?;
    debug!("Saved kubeconfig '{}' to {}", entry.name, entry.path().display());

    if current.as_deref() == Some(name.as_str()) {
        return Ok(());
    }
    use_kubeconfig(switcher, &entry)
}

fn delete_kubeconfig(switcher: &mut Switcher<'_>, name: Option<&str>) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => switcher.select_credential()?.name,
    };

    print_hint(&format!("Delete kubeconfig {:?}", name));
    switcher.store_mut().delete(&name)?;
    switcher.history_mut().delete_by_name(&name);
    switcher.history().save()
}

fn delete_all_kubeconfigs(switcher: &mut Switcher<'_>, yes: bool) -> Result<()> {
    if switcher.store().current().is_some() {
        return Err(KwError::Conflict(
            "you are now using a kubeconfig, please unuse it first".to_string(),
        ));
    }
    switcher
        .prompter()
        .confirm(yes, "Do you want to delete all kubeconfig files")?;

    print_hint("Delete all kubeconfig files");
    switcher.store_mut().delete_all()?;
    switcher.history_mut().delete_all();
    switcher.history().save()
}

/// One line per entry, the active one prefixed with `*`; or just `name` when given
fn render_entries(store: &CredentialStore, name: Option<&str>, color: bool) -> Result<String> {
    if let Some(name) = name {
        return store
            .get(name)
            .map(|e| e.to_string())
            .ok_or_else(|| KwError::not_found("kubeconfig", name));
    }

    let current = store.current().map(|e| e.name.as_str());
    let lines: Vec<String> = store
        .list()
        .into_iter()
        .map(|entry| {
            if current == Some(entry.name.as_str()) {
                let line = format!("* {}", entry);
                if color {
                    bold(&line)
                } else {
                    line
                }
            } else {
                entry.to_string()
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

fn render_history(
    records: &[&HistoryRecord],
    column: &str,
    value: impl Fn(&HistoryRecord) -> &str,
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("TIME"), Cell::new(column)]);

    for record in records {
        table.add_row(vec![
            Cell::new(format_timestamp(record.timestamp)),
            Cell::new(value(record)),
        ]);
    }
    table.to_string()
}

/// Run the ns command
pub async fn run_ns_command(
    settings: &Settings,
    active: ActiveState,
    prompter: &dyn Prompter,
    remote: &dyn RemoteControl,
    args: &NsArgs,
) -> Result<()> {
    let mut switcher = Switcher::open(settings, active, prompter)?;
    let current = switcher.require_current()?.clone();

    if args.list {
        for namespace in switcher.list_namespaces(remote).await? {
            println!("{}", namespace);
        }
        return Ok(());
    }

    if args.list_history {
        let records: Vec<&HistoryRecord> = switcher
            .history()
            .list()
            .iter()
            .filter(|r| r.name == current.name && !r.namespace.is_empty())
            .collect();
        println!("{}", render_history(&records, "NAMESPACE", |r| r.namespace.as_str()));
        return Ok(());
    }

    if args.unuse {
        let namespace = switcher.active().namespace.as_deref().ok_or_else(|| {
            KwError::Conflict("no current namespace used, cannot unuse".to_string())
        })?;
        print_hint(&format!("Unuse current namespace {:?}", namespace));
        return export::write(
            &settings.source_path(),
            &export::activate_script(&current, ""),
        );
    }

    let namespace = switcher
        .resolve_namespace(remote, args.name.as_deref())
        .await?;
    print_hint(&format!("Switch to namespace {:?}", namespace));
    switcher.apply_switch(&current, &namespace)
}

/// Run the show command
pub fn run_show_command(settings: &Settings, active: &ActiveState) -> Result<()> {
    println!("{}", describe_active(settings, active)?);
    Ok(())
}

fn describe_active(settings: &Settings, active: &ActiveState) -> Result<String> {
    let store = CredentialStore::open(
        &settings.kubeconfig_root(),
        &settings.kubeconfig.alias,
        active.name.as_deref(),
    )?;
    let current = store
        .current()
        .ok_or_else(|| KwError::Conflict("no current selected kubeconfig".to_string()))?;
    Ok(match active.namespace.as_deref() {
        Some(namespace) => format!("{} -> {}", current, namespace),
        None => current.to_string(),
    })
}

/// Run the source command
pub fn run_source_command(settings: &Settings, args: &SourceArgs) -> Result<()> {
    let script = export::take(&settings.source_path(), args.no_delete)?;
    if !script.is_empty() {
        println!("{}", script);
    }
    Ok(())
}

/// Run the init command
pub fn run_init_command(settings: &Settings, args: &InitArgs) -> Result<()> {
    print!("{}", wrapper_script(args.shell, &settings.cmd));
    Ok(())
}

fn wrapper_script(shell: InitShell, name: &str) -> String {
    let template = match shell {
        InitShell::Bash | InitShell::Sh | InitShell::Zsh => POSIX_WRAPPER,
        InitShell::Fish => FISH_WRAPPER,
    };
    template.replace("{{name}}", name)
}
