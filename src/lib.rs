//! kwctl - kubeconfig switching and throwaway node shells
//!
//! Keeps a directory of kubeconfig files, switches the active one (and its
//! namespace) for the calling shell, remembers previous selections for quick
//! back-navigation, and opens short-lived privileged pods on cluster nodes.
//!
//! # Example
//!
//! ```bash
//! # Install the wrapper function
//! eval "$(kwctl init bash)"
//!
//! # Pick a kubeconfig, then a namespace
//! kw config
//! kw ns
//!
//! # Back to the previous kubeconfig
//! kw config -
//!
//! # Shell on a node
//! kw login worker-1
//!
//! # Restart a deployment in the active namespace
//! kw restart deploy/web
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod kube;
pub mod nodeshell;
pub mod settings;
pub mod ui;
pub mod workload;

pub use cli::{Cli, Command};
pub use context::{ActiveState, CredentialEntry, CredentialStore, SelectionHistory, Switcher};
pub use error::{KwError, Result};
pub use kube::{Container, Kubectl, Node, RemoteControl, Resource};
pub use nodeshell::{run_session, CopyPath, Session, SessionAction, SessionPhase, SessionSpec};
pub use settings::Settings;
