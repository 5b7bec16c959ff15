//! Node shell command handlers

use log::debug;

use crate::cli::{CpArgs, ExecArgs, LoginArgs, NodeShellArgs};
use crate::error::{KwError, Result};
use crate::kube::RemoteControl;
use crate::settings::NodeShellSettings;

use super::runner::{run_session, SessionAction};
use super::session::{CopyPath, SessionSpec};

/// Merge command line overrides into the configured pod settings
pub fn session_spec(settings: &NodeShellSettings, node: &str, args: &NodeShellArgs) -> SessionSpec {
    let shell = match args.shell.as_deref() {
        Some(s) if !s.trim().is_empty() => s.split_whitespace().map(str::to_string).collect(),
        _ => settings.shell.clone(),
    };
    SessionSpec {
        node: node.to_string(),
        namespace: non_empty(args.namespace.as_deref()).unwrap_or(settings.namespace.as_str()).to_string(),
        image: non_empty(args.image.as_deref()).unwrap_or(settings.image.as_str()).to_string(),
        shell,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Run the login command
pub async fn run_login_command(
    remote: &dyn RemoteControl,
    settings: &NodeShellSettings,
    args: &LoginArgs,
) -> Result<()> {
    let node = require_node(&args.node)?;
    let spec = session_spec(settings, node, &args.shell);
    run_session(remote, spec, &SessionAction::Login, false).await
}

/// Run the exec command
pub async fn run_exec_command(
    remote: &dyn RemoteControl,
    settings: &NodeShellSettings,
    args: &ExecArgs,
) -> Result<()> {
    let node = require_node(&args.node)?;
    if args.command.is_empty() {
        return Err(KwError::InvalidInput("command is required".to_string()));
    }
    let spec = session_spec(settings, node, &args.shell);
    run_session(remote, spec, &SessionAction::Exec(args.command.clone()), false).await
}

/// Run the cp command
pub async fn run_cp_command(
    remote: &dyn RemoteControl,
    settings: &NodeShellSettings,
    args: &CpArgs,
) -> Result<()> {
    let (node, src, dest) = parse_copy_paths(&args.src, &args.dest)?;
    debug!("Copy {:?} -> {:?} via node '{}'", src, dest, node);
    let spec = session_spec(settings, &node, &args.shell);
    run_session(remote, spec, &SessionAction::Copy { src, dest }, false).await
}

fn require_node(node: &str) -> Result<&str> {
    if node.is_empty() {
        return Err(KwError::InvalidInput("node is required".to_string()));
    }
    Ok(node)
}

/// Split `cp` arguments; `<node>:<path>` marks the remote side
fn parse_copy_paths(src: &str, dest: &str) -> Result<(String, CopyPath, CopyPath)> {
    let (src_node, src) = parse_copy_path(src)
        .ok_or_else(|| KwError::InvalidInput("invalid source path".to_string()))?;
    let (dest_node, dest) = parse_copy_path(dest)
        .ok_or_else(|| KwError::InvalidInput("invalid destination path".to_string()))?;

    match (src_node, dest_node) {
        (Some(_), Some(_)) => Err(KwError::InvalidInput(
            "cannot copy between two remote nodes".to_string(),
        )),
        (None, None) => Err(KwError::InvalidInput(
            "require at least one remote copy path".to_string(),
        )),
        (Some(node), None) | (None, Some(node)) => Ok((node, src, dest)),
    }
}

fn parse_copy_path(arg: &str) -> Option<(Option<String>, CopyPath)> {
    if arg.is_empty() {
        return None;
    }
    match arg.split_once(':') {
        None => Some((None, CopyPath::local(arg))),
        Some((node, path)) if !node.is_empty() && !path.is_empty() => {
            Some((Some(node.to_string()), CopyPath::remote(path)))
        }
        Some(_) => None,
    }
}
