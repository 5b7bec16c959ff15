/// Environment variables exported by the shell wrapper
pub mod env {
    /// Name of the active kubeconfig
    pub const ACTIVE_NAME: &str = "KUBECONFIG_NAME";

    /// Path of the active kubeconfig file (read by kubectl itself)
    pub const ACTIVE_PATH: &str = "KUBECONFIG";

    /// Active namespace
    pub const ACTIVE_NAMESPACE: &str = "KUBECONFIG_NAMESPACE";

    /// Editor fallback when settings do not name one
    pub const EDITOR: &str = "EDITOR";
}

/// Default values for settings and CLI
pub mod defaults {
    /// Name of the shell wrapper function
    pub const WRAPPER_COMMAND: &str = "kw";

    /// Editor used when neither settings nor $EDITOR provide one
    pub const EDITOR: &str = "vim";

    /// Settings file, relative to the user config dir
    pub const SETTINGS_FILE: &str = "kwctl/config.toml";

    /// Directory holding kubeconfig files, relative to HOME
    pub const KUBECONFIG_ROOT: &str = ".kube/kwctl";

    /// Environment export file, relative to HOME
    pub const SOURCE_FILE: &str = ".local/share/kwctl/source";

    /// History file, relative to HOME
    pub const HISTORY_FILE: &str = ".local/share/kwctl/history";

    /// kubectl binary
    pub const KUBECTL: &str = "kubectl";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Namespace for workload commands when none is active
    pub const WORKLOAD_NAMESPACE: &str = "default";
}

/// Selection history limits
pub mod history {
    /// Records kept when settings do not say otherwise
    pub const DEFAULT_MAX: i64 = 100;

    /// Lower bound for `history.max`
    pub const MIN_MAX: i64 = 5;

    /// Upper bound for `history.max`
    pub const MAX_MAX: i64 = 500;
}

/// Node shell pod settings
pub mod nodeshell {
    use std::time::Duration;

    /// Pod name prefix
    pub const POD_PREFIX: &str = "nodeshell";

    /// Length of the random pod name suffix
    pub const SUFFIX_LEN: usize = 5;

    /// Characters used for the random suffix
    pub const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    /// Interval between pod status checks
    pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

    /// Give up waiting for the pod after this long
    pub const READY_TIMEOUT: Duration = Duration::from_secs(10);

    /// Pod phase that marks the shell as usable
    pub const READY_PHASE: &str = "Running";

    /// Default namespace for shell pods
    pub const NAMESPACE: &str = "kube-system";

    /// Default shell pod image
    pub const IMAGE: &str = "busybox";

    /// Default login command
    pub const SHELL: &[&str] = &["sh"];
}

/// Process exit codes
pub mod exit_codes {
    /// Generic failure
    pub const FAILURE: i32 = 1;

    /// User canceled a prompt or selection
    pub const CANCELED: i32 = 130;
}
