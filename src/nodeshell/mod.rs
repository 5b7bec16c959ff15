//! Ephemeral node shell sessions: a privileged pod pinned to one node,
//! polled until running, used for a login/exec/copy and then deleted.

mod commands;
mod manifest;
mod runner;
mod session;

pub use commands::{run_cp_command, run_exec_command, run_login_command, session_spec};
pub use runner::{run_session, SessionAction};
pub use session::{CopyPath, Session, SessionPhase, SessionSpec};
