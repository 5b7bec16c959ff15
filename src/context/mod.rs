//! Kubeconfig registry, selection history and the switch coordinator
//!
//! The registry is a directory of kubeconfig files (plus configured aliases);
//! the history is an append-only log of selections used for `-` navigation.
//! Switching never mutates the calling shell directly: it writes an export
//! script that the shell wrapper sources afterwards.

mod commands;
pub mod export;
mod history;
mod models;
mod resolve;
mod store;

pub use commands::{
    run_config_command, run_init_command, run_ns_command, run_show_command, run_source_command,
};
pub use history::SelectionHistory;
pub use models::{ActiveState, CredentialEntry, HistoryRecord};
pub use resolve::{Switcher, BACK_REFERENCE};
pub use store::CredentialStore;
