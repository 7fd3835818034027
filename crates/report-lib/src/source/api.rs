//! Pod source querying the Kubernetes API directly

use super::{PodSource, SourceError};
use crate::models::{
    ContainerDescriptor, PodDescriptor, PodMetadata, PodSpec, ResourceQuantities,
    ResourceRequirements,
};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Page size for list requests
const PAGE_SIZE: u32 = 500;

/// Lists pods through the Kubernetes API
#[derive(Debug, Clone, Default)]
pub struct ApiSource {
    kubeconfig: Option<PathBuf>,
    namespace: Option<String>,
}

impl ApiSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit kubeconfig instead of the default lookup
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    /// Restrict the query to one namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    async fn client(&self) -> Result<Client, SourceError> {
        match &self.kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path)?;
                let config =
                    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                        .await?;
                Ok(Client::try_from(config)?)
            }
            None => Ok(Client::try_default().await?),
        }
    }
}

#[async_trait]
impl PodSource for ApiSource {
    async fn fetch(&self) -> Result<Vec<PodDescriptor>, SourceError> {
        let client = self.client().await?;
        let pods: Api<Pod> = match &self.namespace {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        };

        let mut descriptors = Vec::new();
        let mut params = ListParams::default().limit(PAGE_SIZE);

        loop {
            let page = pods.list(&params).await?;
            debug!(items = page.items.len(), "Fetched pod page");
            descriptors.extend(page.items.iter().map(PodDescriptor::from));

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    params = params.continue_token(&token);
                }
                _ => break,
            }
        }

        Ok(descriptors)
    }

    fn describe(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("kubernetes API (namespace {})", ns),
            None => "kubernetes API (all namespaces)".to_string(),
        }
    }
}

fn quantities(map: Option<&BTreeMap<String, Quantity>>) -> ResourceQuantities {
    let get = |key: &str| {
        map.and_then(|m| m.get(key))
            .map(|q| q.0.clone())
            .unwrap_or_default()
    };

    ResourceQuantities {
        cpu: get("cpu"),
        memory: get("memory"),
    }
}

impl From<&Container> for ContainerDescriptor {
    fn from(container: &Container) -> Self {
        let resources = container.resources.as_ref();

        Self {
            name: container.name.clone(),
            resources: ResourceRequirements {
                requests: quantities(resources.and_then(|r| r.requests.as_ref())),
                limits: quantities(resources.and_then(|r| r.limits.as_ref())),
            },
        }
    }
}

impl From<&Pod> for PodDescriptor {
    fn from(pod: &Pod) -> Self {
        Self {
            metadata: PodMetadata {
                namespace: pod.metadata.namespace.clone().unwrap_or_default(),
                name: pod.metadata.name.clone().unwrap_or_default(),
            },
            spec: PodSpec {
                containers: pod
                    .spec
                    .as_ref()
                    .map(|spec| {
                        spec.containers
                            .iter()
                            .map(ContainerDescriptor::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        }
    }
}
