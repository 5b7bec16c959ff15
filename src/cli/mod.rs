//! CLI argument parsing

mod context;
mod nodeshell;
mod workload;

pub use context::{ConfigArgs, InitArgs, InitShell, NsArgs, SourceArgs};
pub use nodeshell::{CpArgs, ExecArgs, LoginArgs, NodeShellArgs};
pub use workload::{RestartArgs, ScaleArgs, SetImageArgs};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::defaults;

/// Switch kubeconfigs and namespaces, open throwaway node shells
#[derive(Parser, Debug)]
#[command(name = "kwctl")]
#[command(version)]
#[command(about = "Switch kubeconfigs and namespaces, open throwaway node shells", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Install the shell wrapper first, e.g. in ~/.bashrc:\n  \
        eval \"$(kwctl init bash)\"")]
pub struct Cli {
    /// Settings file (default: ~/.config/kwctl/config.toml)
    #[arg(long, global = true, env = "KWCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore the settings file and use built-in defaults
    #[arg(long, global = true, default_value_t = false)]
    pub default_config: bool,

    /// Print the effective settings as JSON and exit
    #[arg(long, global = true, default_value_t = false)]
    pub print_config: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "KWCTL_LOG", default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage and switch kubeconfig files
    Config(ConfigArgs),

    /// Switch namespace of the current kubeconfig
    Ns(NsArgs),

    /// Print the current kubeconfig and namespace
    Show,

    /// Print (and consume) the pending environment changes
    Source(SourceArgs),

    /// Print the shell wrapper function
    Init(InitArgs),

    /// Open a shell on a node
    Login(LoginArgs),

    /// Run a command on a node
    Exec(ExecArgs),

    /// Copy files between the local machine and a node
    Cp(CpArgs),

    /// Scale the replicas of a resource
    Scale(ScaleArgs),

    /// Restart a resource with a rollout
    Restart(RestartArgs),

    /// Set the image of a container
    SetImage(SetImageArgs),
}
