//! Workload command handlers

use crate::cli::{RestartArgs, ScaleArgs, SetImageArgs};
use crate::context::ActiveState;
use crate::error::Result;
use crate::kube::RemoteControl;
use crate::ui::{print_hint, Prompter};

use super::select::{select_container, select_resource, workload_namespace};

/// Run the scale command
pub async fn run_scale_command(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    active: &ActiveState,
    args: &ScaleArgs,
) -> Result<()> {
    let namespace = workload_namespace(active);
    let resource = select_resource(remote, prompter, &args.query, namespace).await?;
    remote.scale(&resource, args.replicas).await?;
    print_hint(&format!("Scaled {} to {} replica(s)", resource, args.replicas));
    Ok(())
}

/// Run the restart command
pub async fn run_restart_command(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    active: &ActiveState,
    args: &RestartArgs,
) -> Result<()> {
    let namespace = workload_namespace(active);
    let resource = select_resource(remote, prompter, &args.query, namespace).await?;
    remote.rollout_restart(&resource).await?;
    print_hint(&format!("Restarted {}", resource));
    Ok(())
}

/// Run the set-image command
pub async fn run_set_image_command(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    active: &ActiveState,
    args: &SetImageArgs,
) -> Result<()> {
    let namespace = workload_namespace(active);
    let container = select_container(remote, prompter, &args.query, namespace).await?;
    remote.set_image(&container, &args.image).await?;
    print_hint(&format!("Set image of {} to {:?}", container, args.image));
    Ok(())
}
