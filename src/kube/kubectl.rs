//! kubectl-backed remote control

use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{KwError, Result};

use super::traits::{Container, Node, RemoteControl, Resource};

/// Runs the kubectl binary with a fixed argument prefix
#[derive(Debug, Clone)]
pub struct Kubectl {
    name: String,
    args: Vec<String>,
}

impl Kubectl {
    /// * `name` - binary to run
    /// * `args` - arguments placed before every subcommand (e.g. `--context`)
    pub fn new(name: &str, args: &[String]) -> Self {
        Self {
            name: name.to_string(),
            args: args.to_vec(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.name);
        cmd.args(&self.args).args(args).stderr(Stdio::inherit());
        cmd
    }

    fn spawn_error(&self, args: &[&str], err: std::io::Error) -> KwError {
        KwError::ExternalTool {
            command: self.command_line(args),
            detail: err.to_string(),
        }
    }

    /// Run a non-interactive command, optionally feeding stdin, and return trimmed stdout
    async fn output(&self, args: &[&str], input: Option<&[u8]>) -> Result<String> {
        debug!("Running: {}", self.command_line(args));

        let mut cmd = self.command(args);
        cmd.stdout(Stdio::piped()).stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(args, e))?;
        if let (Some(data), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin
                .write_all(data)
                .await
                .map_err(|e| self.spawn_error(args, e))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.spawn_error(args, e))?;
        if !output.status.success() {
            return Err(KwError::ExternalTool {
                command: self.command_line(args),
                detail: format!("exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a command attached to the current terminal
    async fn interactive(&self, args: &[&str]) -> Result<()> {
        debug!("Running interactively: {}", self.command_line(args));

        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.spawn_error(args, e))?;
        if !status.success() {
            return Err(KwError::ExternalTool {
                command: self.command_line(args),
                detail: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteControl for Kubectl {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let output = self.output(&["get", "nodes", "--no-headers"], None).await?;
        Ok(parse_nodes(&output))
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let output = self
            .output(
                &[
                    "get",
                    "namespaces",
                    "-o",
                    "jsonpath={.items[*].metadata.name}",
                ],
                None,
            )
            .await?;
        Ok(output.split_whitespace().map(str::to_string).collect())
    }

    async fn apply(&self, manifest: &[u8]) -> Result<()> {
        self.output(&["apply", "-f", "-"], Some(manifest)).await?;
        Ok(())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        self.output(&["delete", "-n", namespace, "pod", name], None)
            .await?;
        Ok(())
    }

    async fn get_pod_status(&self, namespace: &str, name: &str) -> Result<String> {
        let args = [
            "get",
            "-n",
            namespace,
            "pod",
            name,
            "-o",
            "jsonpath={.status.phase}",
        ];
        let status = self.output(&args, None).await?;
        if status.is_empty() {
            return Err(KwError::ExternalTool {
                command: self.command_line(&args),
                detail: "returned an empty pod status".to_string(),
            });
        }
        Ok(status)
    }

    async fn exec(&self, namespace: &str, name: &str, cmd: &[String]) -> Result<()> {
        let mut args = vec!["exec", "-it", "-n", namespace, name, "--"];
        args.extend(cmd.iter().map(String::as_str));
        self.interactive(&args).await
    }

    async fn copy(&self, namespace: &str, src: &str, dest: &str) -> Result<()> {
        self.output(&["cp", "-n", namespace, src, dest], None).await?;
        Ok(())
    }

    async fn list_resources(&self, kind: &str, namespace: &str) -> Result<Vec<Resource>> {
        let output = self
            .output(
                &[
                    "get",
                    "-n",
                    namespace,
                    kind,
                    "-o",
                    "jsonpath={.items[*].metadata.name}",
                ],
                None,
            )
            .await?;
        Ok(output
            .split_whitespace()
            .map(|name| Resource {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
            .collect())
    }

    async fn list_containers(&self, resource: &Resource) -> Result<Vec<Container>> {
        let jsonpath = format!("jsonpath={{{}}}", containers_path(&resource.kind));
        let output = self
            .output(
                &[
                    "get",
                    "-n",
                    &resource.namespace,
                    &resource.kind,
                    &resource.name,
                    "-o",
                    &jsonpath,
                ],
                None,
            )
            .await?;
        Ok(output
            .split_whitespace()
            .map(|name| Container {
                resource: resource.clone(),
                name: name.to_string(),
            })
            .collect())
    }

    async fn set_image(&self, container: &Container, image: &str) -> Result<()> {
        let target = container.resource.reference();
        let assignment = format!("{}={}", container.name, image);
        self.output(
            &[
                "set",
                "image",
                "-n",
                &container.resource.namespace,
                &target,
                &assignment,
            ],
            None,
        )
        .await?;
        Ok(())
    }

    async fn scale(&self, resource: &Resource, replicas: u32) -> Result<()> {
        let target = resource.reference();
        let replicas = format!("--replicas={}", replicas);
        self.output(
            &["scale", "-n", &resource.namespace, &target, &replicas],
            None,
        )
        .await?;
        Ok(())
    }

    async fn rollout_restart(&self, resource: &Resource) -> Result<()> {
        let target = resource.reference();
        self.output(
            &["rollout", "restart", "-n", &resource.namespace, &target],
            None,
        )
        .await?;
        Ok(())
    }
}

/// Where container names live for a resource type
fn containers_path(kind: &str) -> &'static str {
    match kind.to_ascii_lowercase().as_str() {
        "po" | "pod" | "pods" => ".spec.containers[*].name",
        "cj" | "cronjob" | "cronjobs" => ".spec.jobTemplate.spec.template.spec.containers[*].name",
        _ => ".spec.template.spec.containers[*].name",
    }
}

/// Parse `get nodes --no-headers`: first column is the name, the rest a description
fn parse_nodes(output: &str) -> Vec<Node> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let name = line.split_whitespace().next()?;
            Some(Node {
                name: name.to_string(),
                description: line[name.len()..].trim().to_string(),
            })
        })
        .collect()
}
