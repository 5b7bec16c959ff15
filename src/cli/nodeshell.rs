//! Node shell command arguments

use clap::{Args, Parser};

/// Overrides shared by every node shell command
#[derive(Args, Debug, Default, Clone)]
pub struct NodeShellArgs {
    /// Namespace of the shell pod (default from settings)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Image of the shell pod (default from settings)
    #[arg(short = 'i', long)]
    pub image: Option<String>,

    /// Login command, split on whitespace (default from settings)
    #[arg(short = 's', long)]
    pub shell: Option<String>,
}

/// Arguments for 'login' command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Node name
    pub node: String,

    #[command(flatten)]
    pub shell: NodeShellArgs,
}

/// Arguments for 'exec' command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
        kwctl exec worker-1 -- uname -a\n  \
        kwctl exec worker-1 -i alpine -- cat /host/etc/os-release")]
pub struct ExecArgs {
    /// Node name
    pub node: String,

    /// Command to run, after '--'
    #[arg(last = true, required = true)]
    pub command: Vec<String>,

    #[command(flatten)]
    pub shell: NodeShellArgs,
}

/// Arguments for 'cp' command
#[derive(Parser, Debug)]
#[command(after_help = "Prefix exactly one path with '<NODE>:' to mark it remote:\n  \
        kwctl cp ./script.sh worker-1:/tmp/script.sh\n  \
        kwctl cp worker-1:/host/var/log/syslog ./syslog")]
pub struct CpArgs {
    /// Source path
    pub src: String,

    /// Destination path
    pub dest: String,

    #[command(flatten)]
    pub shell: NodeShellArgs,
}
