//! Pod specification sources
//!
//! A source produces the raw pod descriptors a report is built from. The
//! default source shells out to `kubectl`; a saved JSON dump or a direct
//! Kubernetes API query can be used instead. Any source failure is fatal to
//! the run.

mod api;
mod file;
mod kubectl;

pub use api::ApiSource;
pub use file::FileSource;
pub use kubectl::KubectlSource;

use crate::models::{null_as_default, PodDescriptor};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub use async_trait::async_trait;

/// Errors that abort fetching pod specifications
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pod list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("kubernetes API request failed: {0}")]
    Kube(#[from] kube::Error),
}

/// Trait for pod specification sources
#[async_trait]
pub trait PodSource: Send + Sync {
    /// Fetch all pods, in the order the cluster returned them
    async fn fetch(&self) -> Result<Vec<PodDescriptor>, SourceError>;

    /// Short human readable description, used in logs
    fn describe(&self) -> String;
}

#[derive(Deserialize)]
struct PodList {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<PodDescriptor>,
}

/// Parse a `kubectl get pods -o json` list document
pub fn parse_pod_list(bytes: &[u8]) -> Result<Vec<PodDescriptor>, SourceError> {
    let list: PodList = serde_json::from_slice(bytes)?;
    Ok(list.items)
}
