//! Remote control capability consumed by the context and node shell code

use async_trait::async_trait;
use std::fmt;

use crate::error::{KwError, Result};

/// A cluster node as listed by `get nodes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    /// Remaining columns (status, roles, age, version)
    pub description: String,
}

/// A namespaced workload such as `deployment web-7` in `prod`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Resource type as kubectl accepts it (`deploy`, `statefulset`, ...)
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl Resource {
    /// `kind/name`, the form kubectl takes on the command line
    pub fn reference(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// One container of a [`Resource`]'s pod template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub resource: Resource,
    pub name: String,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.name)
    }
}

/// Operations kwctl performs against a cluster.
///
/// Every call is a single synchronous round trip from the caller's point of
/// view; nothing is retried. Failures are either [`KwError::NotFound`] or
/// [`KwError::ExternalTool`].
#[async_trait]
pub trait RemoteControl: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    async fn check_node(&self, name: &str) -> Result<()> {
        let nodes = self.list_nodes().await?;
        if nodes.iter().any(|n| n.name == name) {
            Ok(())
        } else {
            Err(KwError::not_found("node", name))
        }
    }

    async fn list_namespaces(&self) -> Result<Vec<String>>;

    async fn check_namespace(&self, name: &str) -> Result<()> {
        let namespaces = self.list_namespaces().await?;
        if namespaces.iter().any(|ns| ns == name) {
            Ok(())
        } else {
            Err(KwError::not_found("namespace", name))
        }
    }

    /// Create or update objects from a manifest
    async fn apply(&self, manifest: &[u8]) -> Result<()>;

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()>;

    /// Pod phase, e.g. `Pending` or `Running`
    async fn get_pod_status(&self, namespace: &str, name: &str) -> Result<String>;

    /// Run `cmd` in the pod attached to the terminal; returns when it exits
    async fn exec(&self, namespace: &str, name: &str, cmd: &[String]) -> Result<()>;

    /// Copy between local paths and `pod:path` references
    async fn copy(&self, namespace: &str, src: &str, dest: &str) -> Result<()>;

    /// Resources of one type in `namespace`
    async fn list_resources(&self, kind: &str, namespace: &str) -> Result<Vec<Resource>>;

    async fn list_containers(&self, resource: &Resource) -> Result<Vec<Container>>;

    async fn set_image(&self, container: &Container, image: &str) -> Result<()>;

    async fn scale(&self, resource: &Resource, replicas: u32) -> Result<()>;

    async fn rollout_restart(&self, resource: &Resource) -> Result<()>;
}
