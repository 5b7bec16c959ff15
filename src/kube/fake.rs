//! In-memory remote control for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{KwError, Result};

use super::traits::{Container, Node, RemoteControl, Resource};

#[derive(Debug, Default)]
struct FakeState {
    /// Statuses reported in order; the last one repeats forever
    statuses: VecDeque<String>,
    status_calls: usize,
    applied: Vec<String>,
    deleted: Vec<(String, String)>,
    execs: Vec<(String, String, Vec<String>)>,
    copies: Vec<(String, String, String)>,
    listed: Vec<(String, String)>,
    images: Vec<(Container, String)>,
    scales: Vec<(Resource, u32)>,
    restarts: Vec<Resource>,
}

/// A workload known to the fake: kind, name and container names
#[derive(Debug, Clone)]
struct FakeWorkload {
    kind: String,
    name: String,
    containers: Vec<String>,
}

/// Scriptable cluster double that records every mutating call
#[derive(Debug, Default)]
pub struct FakeRemote {
    pub nodes: Vec<String>,
    pub namespaces: Vec<String>,
    pub fail_apply: bool,
    pub fail_delete: bool,
    pub fail_exec: bool,
    pub panic_on_exec: bool,
    workloads: Vec<FakeWorkload>,
    state: Mutex<FakeState>,
}

impl FakeRemote {
    pub fn new(nodes: &[&str], namespaces: &[&str]) -> Self {
        Self {
            nodes: nodes.iter().map(|s| s.to_string()).collect(),
            namespaces: namespaces.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Report these pod statuses on successive polls
    pub fn with_statuses(self, statuses: &[&str]) -> Self {
        self.state.lock().unwrap().statuses = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a workload visible in every namespace
    pub fn with_workload(mut self, kind: &str, name: &str, containers: &[&str]) -> Self {
        self.workloads.push(FakeWorkload {
            kind: kind.to_string(),
            name: name.to_string(),
            containers: containers.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// `(kind, namespace)` of every `list_resources` call
    pub fn listed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().listed.clone()
    }

    pub fn images(&self) -> Vec<(Container, String)> {
        self.state.lock().unwrap().images.clone()
    }

    pub fn scales(&self) -> Vec<(Resource, u32)> {
        self.state.lock().unwrap().scales.clone()
    }

    pub fn restarts(&self) -> Vec<Resource> {
        self.state.lock().unwrap().restarts.clone()
    }

    pub fn status_calls(&self) -> usize {
        self.state.lock().unwrap().status_calls
    }

    pub fn applied(&self) -> Vec<String> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn execs(&self) -> Vec<(String, String, Vec<String>)> {
        self.state.lock().unwrap().execs.clone()
    }

    pub fn copies(&self) -> Vec<(String, String, String)> {
        self.state.lock().unwrap().copies.clone()
    }

    fn refused(what: &str) -> KwError {
        KwError::ExternalTool {
            command: format!("fake {}", what),
            detail: "exited with exit status: 1".to_string(),
        }
    }
}

#[async_trait]
impl RemoteControl for FakeRemote {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self
            .nodes
            .iter()
            .map(|name| Node {
                name: name.clone(),
                description: "Ready".to_string(),
            })
            .collect())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        Ok(self.namespaces.clone())
    }

    async fn apply(&self, manifest: &[u8]) -> Result<()> {
        if self.fail_apply {
            return Err(Self::refused("apply"));
        }
        self.state
            .lock()
            .unwrap()
            .applied
            .push(String::from_utf8_lossy(manifest).into_owned());
        Ok(())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .deleted
            .push((namespace.to_string(), name.to_string()));
        if self.fail_delete {
            return Err(Self::refused("delete"));
        }
        Ok(())
    }

    async fn get_pod_status(&self, _namespace: &str, _name: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.status_calls += 1;
        let status = if state.statuses.len() > 1 {
            state.statuses.pop_front()
        } else {
            state.statuses.front().cloned()
        };
        Ok(status.unwrap_or_else(|| "Pending".to_string()))
    }

    async fn exec(&self, namespace: &str, name: &str, cmd: &[String]) -> Result<()> {
        self.state.lock().unwrap().execs.push((
            namespace.to_string(),
            name.to_string(),
            cmd.to_vec(),
        ));
        if self.panic_on_exec {
            panic!("fake exec panicked");
        }
        if self.fail_exec {
            return Err(Self::refused("exec"));
        }
        Ok(())
    }

    async fn copy(&self, namespace: &str, src: &str, dest: &str) -> Result<()> {
        self.state.lock().unwrap().copies.push((
            namespace.to_string(),
            src.to_string(),
            dest.to_string(),
        ));
        Ok(())
    }

    async fn list_resources(&self, kind: &str, namespace: &str) -> Result<Vec<Resource>> {
        self.state
            .lock()
            .unwrap()
            .listed
            .push((kind.to_string(), namespace.to_string()));
        Ok(self
            .workloads
            .iter()
            .filter(|w| w.kind == kind)
            .map(|w| Resource {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name: w.name.clone(),
            })
            .collect())
    }

    async fn list_containers(&self, resource: &Resource) -> Result<Vec<Container>> {
        let workload = self
            .workloads
            .iter()
            .find(|w| w.kind == resource.kind && w.name == resource.name)
            .ok_or_else(|| KwError::not_found("resource", resource.reference()))?;
        Ok(workload
            .containers
            .iter()
            .map(|name| Container {
                resource: resource.clone(),
                name: name.clone(),
            })
            .collect())
    }

    async fn set_image(&self, container: &Container, image: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .images
            .push((container.clone(), image.to_string()));
        Ok(())
    }

    async fn scale(&self, resource: &Resource, replicas: u32) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .scales
            .push((resource.clone(), replicas));
        Ok(())
    }

    async fn rollout_restart(&self, resource: &Resource) -> Result<()> {
        self.state.lock().unwrap().restarts.push(resource.clone());
        Ok(())
    }
}
