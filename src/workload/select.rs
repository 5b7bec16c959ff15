//! Resolve `<type>[/<name>[/<container>]]` queries against the cluster
//!
//! Missing parts are picked interactively from what the cluster lists in the
//! active namespace.

use log::debug;

use crate::config::defaults;
use crate::context::ActiveState;
use crate::error::{KwError, Result};
use crate::kube::{Container, RemoteControl, Resource};
use crate::ui::Prompter;

/// Namespace workload commands act in: the active one, else `default`
pub fn workload_namespace(active: &ActiveState) -> &str {
    active
        .namespace
        .as_deref()
        .unwrap_or(defaults::WORKLOAD_NAMESPACE)
}

/// Split a query into at most `max` fields; the type is mandatory
fn split_query<'q>(query: &'q str, max: usize, what: &str, usage: &str) -> Result<Vec<&'q str>> {
    let fields: Vec<&str> = query.split('/').collect();
    if fields.len() > max {
        return Err(KwError::InvalidInput(format!(
            "invalid {} query {:?}, should be '{}'",
            what, query, usage
        )));
    }
    if fields[0].is_empty() {
        return Err(KwError::InvalidInput(format!(
            "invalid {} query {:?}, type is required",
            what, query
        )));
    }
    Ok(fields)
}

fn field<'q>(fields: &[&'q str], idx: usize) -> Option<&'q str> {
    fields.get(idx).copied().filter(|f| !f.is_empty())
}

/// Resolve `<type>[/<name>]`, selecting the name when it is omitted
pub async fn select_resource(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    query: &str,
    namespace: &str,
) -> Result<Resource> {
    let fields = split_query(query, 2, "resource", "<type>[/<name>]")?;
    let kind = fields[0];

    if let Some(name) = field(&fields, 1) {
        return Ok(Resource {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
    }

    let resources = remote.list_resources(kind, namespace).await?;
    if resources.is_empty() {
        return Err(KwError::Conflict(format!(
            "no {} to select in namespace {:?}",
            kind, namespace
        )));
    }
    let names: Vec<String> = resources.iter().map(|r| r.name.clone()).collect();
    let idx = prompter.select(&format!("Select {}", kind), &names)?;
    resources.into_iter().nth(idx).ok_or(KwError::Canceled)
}

/// Resolve `<type>[/<name>[/<container>]]`.
///
/// A resource with a single container needs no container part; without a
/// name every container of every resource of the type is offered.
pub async fn select_container(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    query: &str,
    namespace: &str,
) -> Result<Container> {
    let fields = split_query(query, 3, "container", "<type>[/<name>[/<container>]]")?;
    let kind = fields[0];

    let Some(name) = field(&fields, 1) else {
        return select_container_by_kind(remote, prompter, kind, namespace).await;
    };
    let resource = Resource {
        kind: kind.to_string(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    };

    if let Some(container) = field(&fields, 2) {
        return Ok(Container {
            resource,
            name: container.to_string(),
        });
    }

    let mut containers = remote.list_containers(&resource).await?;
    match containers.len() {
        0 => Err(KwError::Conflict(format!("no containers for {}", resource))),
        1 => Ok(containers.remove(0)),
        _ => {
            let names: Vec<String> = containers.iter().map(|c| c.name.clone()).collect();
            let idx = prompter.select("Select container", &names)?;
            containers.into_iter().nth(idx).ok_or(KwError::Canceled)
        }
    }
}

async fn select_container_by_kind(
    remote: &dyn RemoteControl,
    prompter: &dyn Prompter,
    kind: &str,
    namespace: &str,
) -> Result<Container> {
    let mut keys = Vec::new();
    let mut candidates = Vec::new();
    for resource in remote.list_resources(kind, namespace).await? {
        let containers = remote.list_containers(&resource).await?;
        let single = containers.len() == 1;
        for container in containers {
            keys.push(if single {
                resource.name.clone()
            } else {
                format!("{}/{}", resource.name, container.name)
            });
            candidates.push(container);
        }
    }
    debug!("{} container(s) of {} in '{}'", candidates.len(), kind, namespace);

    if candidates.is_empty() {
        return Err(KwError::Conflict(format!(
            "no {} container to select in namespace {:?}",
            kind, namespace
        )));
    }
    let idx = prompter.select("Select container", &keys)?;
    candidates.into_iter().nth(idx).ok_or(KwError::Canceled)
}
