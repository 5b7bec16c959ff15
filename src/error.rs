use std::fmt;
use std::time::Duration;

use crate::config::exit_codes;

/// Custom error type for kwctl operations
#[derive(Debug)]
pub enum KwError {
    /// Node, namespace or kubeconfig does not exist
    NotFound { kind: &'static str, name: String },
    /// The user must act before the operation can proceed
    Conflict(String),
    /// Node shell pod did not become ready in time
    Timeout {
        waited: Duration,
        last_status: String,
    },
    /// An external tool (kubectl, editor) exited unexpectedly
    ExternalTool { command: String, detail: String },
    /// The user declined or aborted
    Canceled,
    /// The active kubeconfig points at something that no longer exists
    Corruption(String),
    /// A cleanup step failed while handling another outcome
    Cleanup {
        context: String,
        source: Box<KwError>,
    },
    /// Invalid command arguments
    InvalidInput(String),
    /// Settings error
    Config(String),
    /// Interactive prompt failed
    Prompt(String),
    /// Filesystem error
    Io(std::io::Error),
}

impl KwError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        KwError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KwError::Canceled => exit_codes::CANCELED,
            _ => exit_codes::FAILURE,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KwError::NotFound { .. })
    }
}

impl fmt::Display for KwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KwError::NotFound { kind, name } => write!(f, "cannot find {} \"{}\"", kind, name),
            KwError::Conflict(msg) => write!(f, "{}", msg),
            KwError::Timeout {
                waited,
                last_status,
            } => write!(
                f,
                "wait nodeshell pod ready timeout after {:?}, please check its status (the last status is \"{}\")",
                waited, last_status
            ),
            KwError::ExternalTool { command, detail } => {
                write!(f, "command failed: {}: {}", command, detail)
            }
            KwError::Canceled => write!(f, "canceled by user"),
            KwError::Corruption(msg) => write!(f, "{}", msg),
            KwError::Cleanup { context, source } => write!(f, "{}: {}", context, source),
            KwError::InvalidInput(msg) => write!(f, "invalid arguments: {}", msg),
            KwError::Config(msg) => write!(f, "Configuration error: {}", msg),
            KwError::Prompt(msg) => write!(f, "prompt failed: {}", msg),
            KwError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for KwError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KwError::Io(e) => Some(e),
            KwError::Cleanup { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KwError {
    fn from(err: std::io::Error) -> Self {
        KwError::Io(err)
    }
}

impl From<toml::de::Error> for KwError {
    fn from(err: toml::de::Error) -> Self {
        KwError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KwError {
    fn from(err: serde_json::Error) -> Self {
        KwError::Config(err.to_string())
    }
}

impl From<dialoguer::Error> for KwError {
    fn from(err: dialoguer::Error) -> Self {
        KwError::Prompt(err.to_string())
    }
}

/// Result type alias for kwctl operations
pub type Result<T> = std::result::Result<T, KwError>;
