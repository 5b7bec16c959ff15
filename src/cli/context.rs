//! Kubeconfig and namespace command arguments

use clap::{ArgGroup, Parser, ValueEnum};

/// Arguments for 'config' command
#[derive(Parser, Debug, Default)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
#[command(after_help = "EXAMPLES:\n  \
        kw config            # pick a kubeconfig\n  \
        kw config prod       # switch to prod, create it if missing\n  \
        kw config -          # back to the previous kubeconfig\n  \
        kw config -e prod    # edit prod\n  \
        kw config -d old     # delete old")]
pub struct ConfigArgs {
    /// Kubeconfig name, or '-' for the previous one
    pub name: Option<String>,

    /// Edit a kubeconfig (NAME, else the current one)
    #[arg(short = 'e', long, group = "mode")]
    pub edit: bool,

    /// Delete a kubeconfig
    #[arg(short = 'd', long, group = "mode")]
    pub delete: bool,

    /// Delete all kubeconfigs
    #[arg(short = 'D', long, group = "mode")]
    pub delete_all: bool,

    /// List kubeconfigs, or show NAME
    #[arg(short = 'l', long, group = "mode")]
    pub list: bool,

    /// Show kubeconfig switch history
    #[arg(short = 'H', long, group = "mode")]
    pub list_history: bool,

    /// Stop using the current kubeconfig
    #[arg(short = 'u', long, group = "mode")]
    pub unuse: bool,

    /// Skip confirmations
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}

/// Arguments for 'ns' command
#[derive(Parser, Debug, Default)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
pub struct NsArgs {
    /// Namespace, or '-' for the previous one
    pub name: Option<String>,

    /// List namespaces
    #[arg(short = 'l', long, group = "mode")]
    pub list: bool,

    /// Show namespace switch history of the current kubeconfig
    #[arg(short = 'H', long, group = "mode")]
    pub list_history: bool,

    /// Stop using the current namespace
    #[arg(short = 'u', long, group = "mode")]
    pub unuse: bool,
}

/// Arguments for 'source' command
#[derive(Parser, Debug, Default)]
pub struct SourceArgs {
    /// Keep the pending file after printing it
    #[arg(long, default_value_t = false)]
    pub no_delete: bool,
}

/// Arguments for 'init' command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: InitShell,
}

/// Shells the wrapper function can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitShell {
    Bash,
    Sh,
    Zsh,
    Fish,
}

impl std::fmt::Display for InitShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitShell::Bash => write!(f, "bash"),
            InitShell::Sh => write!(f, "sh"),
            InitShell::Zsh => write!(f, "zsh"),
            InitShell::Fish => write!(f, "fish"),
        }
    }
}
