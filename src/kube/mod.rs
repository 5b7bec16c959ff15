//! Cluster access
//!
//! Everything kwctl needs from a cluster goes through the [`RemoteControl`]
//! trait. [`Kubectl`] implements it by shelling out to the kubectl binary.

#[cfg(test)]
pub(crate) mod fake;
mod kubectl;
mod traits;

pub use kubectl::Kubectl;
pub use traits::{Container, Node, RemoteControl, Resource};
