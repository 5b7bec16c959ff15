//! Node shell session state machine
//!
//! ```text
//! Created -> Polling -> Ready -> InUse -> Closed
//!               |
//!               +----> TimedOut -> Closed   (teardown attempted)
//! Created -> FailedToCreate                 (nothing exists remotely)
//! ```

use log::{debug, warn};
use rand::Rng;
use std::fmt;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::config::nodeshell as cfg;
use crate::error::{KwError, Result};
use crate::kube::RemoteControl;

use super::manifest;

/// Lifecycle phase of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Created,
    FailedToCreate,
    Polling,
    Ready,
    InUse,
    TimedOut,
    Closed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Created => "created",
            SessionPhase::FailedToCreate => "failed-to-create",
            SessionPhase::Polling => "polling",
            SessionPhase::Ready => "ready",
            SessionPhase::InUse => "in-use",
            SessionPhase::TimedOut => "timed-out",
            SessionPhase::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}

/// What to run and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    pub node: String,
    pub namespace: String,
    pub image: String,
    /// Command used by [`Session::login`]
    pub shell: Vec<String>,
}

/// One side of a copy; `remote` paths live inside the shell pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPath {
    pub path: String,
    pub remote: bool,
}

impl CopyPath {
    pub fn local(path: &str) -> Self {
        Self {
            path: path.to_string(),
            remote: false,
        }
    }

    pub fn remote(path: &str) -> Self {
        Self {
            path: path.to_string(),
            remote: true,
        }
    }
}

/// A throwaway privileged pod bound to one node
pub struct Session<'a> {
    remote: &'a dyn RemoteControl,
    spec: SessionSpec,
    pod_name: String,
    phase: SessionPhase,
}

impl<'a> Session<'a> {
    /// Validate the node and namespace, then submit the pod.
    ///
    /// On success the session is `Polling`: the pod exists remotely and must
    /// eventually be closed. On failure nothing was created.
    pub async fn create(remote: &'a dyn RemoteControl, spec: SessionSpec) -> Result<Self> {
        remote.check_node(&spec.node).await?;
        remote.check_namespace(&spec.namespace).await?;

        let mut session = Self {
            remote,
            pod_name: pod_name(&spec.node),
            spec,
            phase: SessionPhase::Created,
        };
        debug!(
            "Session {} {} on node '{}'",
            session.pod_name, session.phase, session.spec.node
        );

        let yaml = manifest::render(
            &session.spec.namespace,
            &session.pod_name,
            &session.spec.node,
            &session.spec.image,
        );
        if let Err(e) = session.remote.apply(yaml.as_bytes()).await {
            session.set_phase(SessionPhase::FailedToCreate);
            return Err(e);
        }

        session.set_phase(SessionPhase::Polling);
        Ok(session)
    }

    /// Create the session and wait until it is ready
    pub async fn open(remote: &'a dyn RemoteControl, spec: SessionSpec) -> Result<Self> {
        let mut session = Self::create(remote, spec).await?;
        if let Err(e) = session.wait_ready().await {
            if session.needs_teardown() {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to delete pod {}: {}", session.pod_name, close_err);
                }
            }
            return Err(e);
        }
        Ok(session)
    }

    /// Poll the pod status every 300ms until it is `Running` or 10s pass.
    ///
    /// On timeout the pod is deleted before returning; a failed delete is
    /// reported instead of the timeout. A failing status query leaves the
    /// session `Polling` for the caller to tear down.
    pub async fn wait_ready(&mut self) -> Result<()> {
        let start = Instant::now();
        let mut ticker = interval_at(start + cfg::POLL_INTERVAL, cfg::POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let deadline = sleep(cfg::READY_TIMEOUT);
        tokio::pin!(deadline);

        let mut status = "Unknown".to_string();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    status = self
                        .remote
                        .get_pod_status(&self.spec.namespace, &self.pod_name)
                        .await?;
                    debug!("Pod {} status: {}", self.pod_name, status);
                    if status == cfg::READY_PHASE {
                        self.set_phase(SessionPhase::Ready);
                        return Ok(());
                    }
                }
                _ = &mut deadline => {
                    self.set_phase(SessionPhase::TimedOut);
                    if let Err(e) = self.close().await {
                        return Err(KwError::Cleanup {
                            context: "delete pod after wait nodeshell pod ready timeout".to_string(),
                            source: Box::new(e),
                        });
                    }
                    return Err(KwError::Timeout {
                        waited: cfg::READY_TIMEOUT,
                        last_status: status,
                    });
                }
            }
        }
    }

    /// Attach to the configured shell
    pub async fn login(&mut self) -> Result<()> {
        self.begin_use()?;
        self.remote
            .exec(&self.spec.namespace, &self.pod_name, &self.spec.shell)
            .await
    }

    /// Run a one-shot command attached to the terminal
    pub async fn exec(&mut self, cmd: &[String]) -> Result<()> {
        self.begin_use()?;
        self.remote
            .exec(&self.spec.namespace, &self.pod_name, cmd)
            .await
    }

    /// Copy between the local machine and the shell pod; exactly one side must be remote
    pub async fn copy(&mut self, src: &CopyPath, dest: &CopyPath) -> Result<()> {
        if src.remote && dest.remote {
            return Err(KwError::Conflict(
                "copy: both src and dest are remote".to_string(),
            ));
        }
        if !src.remote && !dest.remote {
            return Err(KwError::Conflict(
                "copy: both src and dest are local".to_string(),
            ));
        }
        self.begin_use()?;

        let src = self.qualify(src);
        let dest = self.qualify(dest);
        self.remote.copy(&self.spec.namespace, &src, &dest).await
    }

    /// Delete the pod. The session counts as closed once the attempt is made,
    /// whether or not it succeeded.
    pub async fn close(&mut self) -> Result<()> {
        debug!("Deleting pod {}/{}", self.spec.namespace, self.pod_name);
        let result = self
            .remote
            .delete_pod(&self.spec.namespace, &self.pod_name)
            .await;
        self.set_phase(SessionPhase::Closed);
        result
    }

    /// Whether a pod may exist remotely and has not been deleted yet
    pub fn needs_teardown(&self) -> bool {
        !matches!(
            self.phase,
            SessionPhase::Created | SessionPhase::FailedToCreate | SessionPhase::Closed
        )
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    pub fn node(&self) -> &str {
        &self.spec.node
    }

    fn begin_use(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Ready | SessionPhase::InUse => {
                self.set_phase(SessionPhase::InUse);
                Ok(())
            }
            other => Err(KwError::Conflict(format!(
                "nodeshell pod {} is not ready (phase: {})",
                self.pod_name, other
            ))),
        }
    }

    fn qualify(&self, path: &CopyPath) -> String {
        if path.remote {
            format!("{}:{}", self.pod_name, path.path)
        } else {
            path.path.clone()
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        debug!("Session {}: {} -> {}", self.pod_name, self.phase, phase);
        self.phase = phase;
    }
}

/// `nodeshell-<node with dots as dashes>-<5 random [a-z0-9]>`
fn pod_name(node: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..cfg::SUFFIX_LEN)
        .map(|_| cfg::SUFFIX_CHARSET[rng.gen_range(0..cfg::SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{}-{}-{}", cfg::POD_PREFIX, node.replace('.', "-"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::fake::FakeRemote;
    use std::time::Duration;

    fn spec(node: &str, namespace: &str) -> SessionSpec {
        SessionSpec {
            node: node.to_string(),
            namespace: namespace.to_string(),
            image: "busybox".to_string(),
            shell: vec!["sh".to_string()],
        }
    }

    fn remote() -> FakeRemote {
        FakeRemote::new(&["w1.example.com", "w2"], &["default", "kube-system"])
    }

    #[test]
    fn test_pod_name_format() {
        let name = pod_name("w1.example.com");
        let prefix = "nodeshell-w1-example-com-";
        assert!(name.starts_with(prefix));
        let suffix = &name[prefix.len()..];
        assert_eq!(suffix.len(), 5);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_create_unknown_node_is_not_found() {
        let remote = remote();
        let err = Session::create(&remote, spec("ghost", "default"))
            .await
            .err()
            .unwrap();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("node \"ghost\""));
        assert!(remote.applied().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_namespace_is_not_found() {
        let remote = remote();
        let err = Session::create(&remote, spec("w2", "nope"))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("namespace \"nope\""));
        assert!(remote.applied().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejected_needs_no_teardown() {
        let mut remote = remote();
        remote.fail_apply = true;
        let err = Session::create(&remote, spec("w2", "default"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, KwError::ExternalTool { .. }));
        assert!(remote.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_create_submits_manifest_for_node() {
        let remote = remote();
        let session = Session::create(&remote, spec("w1.example.com", "kube-system"))
            .await
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Polling);
        assert!(session.needs_teardown());

        let applied = remote.applied();
        assert_eq!(applied.len(), 1);
        assert!(applied[0].contains("nodeName: w1.example.com"));
        assert!(applied[0].contains(&format!("name: {}", session.pod_name())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_two_pending_polls() {
        let remote = remote().with_statuses(&["Pending", "Pending", "Running"]);
        let start = Instant::now();
        let session = Session::open(&remote, spec("w2", "default")).await.unwrap();

        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(remote.status_calls(), 3);
        assert!(start.elapsed() <= cfg::POLL_INTERVAL * 3);
        assert!(remote.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_closes_exactly_once() {
        let remote = remote().with_statuses(&["Pending"]);
        let start = Instant::now();
        let err = Session::open(&remote, spec("w2", "default"))
            .await
            .err()
            .unwrap();

        match err {
            KwError::Timeout {
                waited,
                last_status,
            } => {
                assert_eq!(waited, Duration::from_secs(10));
                assert_eq!(last_status, "Pending");
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
        assert!(start.elapsed() >= cfg::READY_TIMEOUT);
        assert_eq!(remote.deleted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_with_failed_teardown_reports_cleanup() {
        let mut remote = remote().with_statuses(&["ContainerCreating"]);
        remote.fail_delete = true;
        let mut session = Session::create(&remote, spec("w2", "default"))
            .await
            .unwrap();
        let err = session.wait_ready().await.unwrap_err();

        assert!(matches!(err, KwError::Cleanup { .. }));
        assert!(err.to_string().contains("timeout"));
        assert_eq!(session.phase(), SessionPhase::Closed);
        assert!(!session.needs_teardown());
        assert_eq!(remote.deleted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_execs_shell_in_pod() {
        let remote = remote().with_statuses(&["Running"]);
        let mut session = Session::open(&remote, spec("w2", "default")).await.unwrap();
        session.login().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::InUse);

        let execs = remote.execs();
        assert_eq!(execs.len(), 1);
        assert_eq!(execs[0].0, "default");
        assert_eq!(execs[0].1, session.pod_name());
        assert_eq!(execs[0].2, vec!["sh".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exec_runs_command_vector() {
        let remote = remote().with_statuses(&["Running"]);
        let mut session = Session::open(&remote, spec("w2", "default")).await.unwrap();
        let cmd = vec!["uname".to_string(), "-a".to_string()];
        session.exec(&cmd).await.unwrap();
        assert_eq!(remote.execs()[0].2, cmd);
    }

    #[tokio::test]
    async fn test_use_before_ready_is_rejected() {
        let remote = remote();
        let mut session = Session::create(&remote, spec("w2", "default"))
            .await
            .unwrap();
        let err = session.login().await.unwrap_err();
        assert!(err.to_string().contains("not ready"));
        assert!(remote.execs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_requires_exactly_one_remote() {
        let remote = remote().with_statuses(&["Running"]);
        let mut session = Session::open(&remote, spec("w2", "default")).await.unwrap();

        let err = session
            .copy(&CopyPath::remote("/a"), &CopyPath::remote("/b"))
            .await
            .unwrap_err();
        assert!(matches!(err, KwError::Conflict(_)));

        let err = session
            .copy(&CopyPath::local("/a"), &CopyPath::local("/b"))
            .await
            .unwrap_err();
        assert!(matches!(err, KwError::Conflict(_)));
        assert!(remote.copies().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_qualifies_remote_side() {
        let remote = remote().with_statuses(&["Running"]);
        let mut session = Session::open(&remote, spec("w2", "default")).await.unwrap();
        let pod = session.pod_name().to_string();

        session
            .copy(&CopyPath::local("./a.txt"), &CopyPath::remote("/tmp/a.txt"))
            .await
            .unwrap();
        session
            .copy(&CopyPath::remote("/etc/hosts"), &CopyPath::local("hosts"))
            .await
            .unwrap();

        let copies = remote.copies();
        assert_eq!(
            copies[0],
            (
                "default".to_string(),
                "./a.txt".to_string(),
                format!("{}:/tmp/a.txt", pod)
            )
        );
        assert_eq!(copies[1].1, format!("{}:/etc/hosts", pod));
        assert_eq!(copies[1].2, "hosts");
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_deletes_pod_and_marks_closed() {
        let remote = remote().with_statuses(&["Running"]);
        let mut session = Session::open(&remote, spec("w2", "kube-system"))
            .await
            .unwrap();
        session.close().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Closed);
        assert_eq!(
            remote.deleted(),
            vec![("kube-system".to_string(), session.pod_name().to_string())]
        );
    }
}
