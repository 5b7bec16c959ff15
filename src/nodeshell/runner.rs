//! Scoped execution of one node shell session
//!
//! Whatever happens after the pod is submitted (an error, a panic in the
//! action, Ctrl-C) the pod is deleted before [`run_session`] returns.

use futures::FutureExt;
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};

use crate::error::{KwError, Result};
use crate::kube::RemoteControl;
use crate::ui::{clear_spinner, create_spinner, finish_spinner, print_hint};

use super::session::{CopyPath, Session, SessionSpec};

/// Work performed inside a ready session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Login,
    Exec(Vec<String>),
    Copy { src: CopyPath, dest: CopyPath },
}

/// Open a session on `spec.node`, run `action` in it and always tear it down.
///
/// Teardown failures are reported as a warning; the action's own outcome is
/// what gets returned.
pub async fn run_session(
    remote: &dyn RemoteControl,
    spec: SessionSpec,
    action: &SessionAction,
    quiet: bool,
) -> Result<()> {
    let node = spec.node.clone();
    print_hint(&format!("Spawning shell pod on \"{}\"", node));
    let mut session = Session::create(remote, spec).await?;
    debug!("Created pod {}", session.pod_name());

    let outcome = {
        let work = AssertUnwindSafe(drive(&mut session, action, quiet)).catch_unwind();
        tokio::select! {
            caught = work => caught,
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, tearing down {}", node);
                Ok(Err(KwError::Canceled))
            }
        }
    };

    if session.needs_teardown() {
        print_hint(&format!("Deleting shell pod on \"{}\"", node));
        if let Err(e) = session.close().await {
            warn!("Delete pod {}: {}", session.pod_name(), e);
            eprintln!(
                "WARNING: failed to delete shell pod on \"{}\", you may need to delete it manually",
                node
            );
        }
    }

    match outcome {
        Ok(result) => result,
        Err(payload) => panic::resume_unwind(payload),
    }
}

async fn drive(session: &mut Session<'_>, action: &SessionAction, quiet: bool) -> Result<()> {
    let spinner = create_spinner("Waiting for shell pod to be ready", quiet);
    match session.wait_ready().await {
        Ok(()) => finish_spinner(spinner, &format!("Pod {} is ready", session.pod_name())),
        Err(e) => {
            clear_spinner(spinner);
            return Err(e);
        }
    }

    match action {
        SessionAction::Login => {
            print_hint(&format!("Login to \"{}\"", session.node()));
            session.login().await
        }
        SessionAction::Exec(cmd) => {
            print_hint(&format!("Running command on \"{}\"", session.node()));
            session.exec(cmd).await
        }
        SessionAction::Copy { src, dest } => {
            print_hint(&format!("Copying between host and \"{}\"", session.node()));
            session.copy(src, dest).await
        }
    }
}
