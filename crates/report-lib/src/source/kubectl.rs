//! Pod source backed by the `kubectl` command line tool

use super::{parse_pod_list, PodSource, SourceError};
use crate::models::PodDescriptor;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs `kubectl get pods -o json` and parses its output
#[derive(Debug, Clone)]
pub struct KubectlSource {
    program: String,
    kubeconfig: Option<PathBuf>,
    namespace: Option<String>,
    timeout: Duration,
}

impl KubectlSource {
    /// Create a source running `program`
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            kubeconfig: None,
            namespace: None,
            timeout,
        }
    }

    /// Pass an explicit kubeconfig to kubectl
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    /// Restrict the query to one namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Arguments passed to the program
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["get".to_string(), "pods".to_string()];

        match &self.namespace {
            Some(ns) => {
                args.push("--namespace".to_string());
                args.push(ns.clone());
            }
            None => args.push("--all-namespaces".to_string()),
        }

        args.push("-o".to_string());
        args.push("json".to_string());

        if let Some(path) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(path.display().to_string());
        }

        args
    }
}

#[async_trait]
impl PodSource for KubectlSource {
    async fn fetch(&self) -> Result<Vec<PodDescriptor>, SourceError> {
        let args = self.args();
        debug!(program = %self.program, args = ?args, "Running cluster query");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| SourceError::Timeout {
                program: self.program.clone(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_pod_list(&output.stdout)
    }

    fn describe(&self) -> String {
        format!("{} {}", self.program, self.args().join(" "))
    }
}
