//! Scale, restart and set-image for workloads in the active namespace

mod commands;
mod select;

pub use commands::{run_restart_command, run_scale_command, run_set_image_command};
pub use select::{select_container, select_resource, workload_namespace};
