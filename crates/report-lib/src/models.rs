//! Core data models for the resource report

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same way as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pod as returned by the cluster query, before normalization.
///
/// Mirrors the subset of `kubectl get pods -o json` the report needs.
/// Every field is optional on the wire and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: PodMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub containers: Vec<ContainerDescriptor>,
}

/// Container entry of a pod spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: ResourceQuantities,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limits: ResourceQuantities,
}

/// Raw quantity strings; absent entries are empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: String,
}

/// Normalized resources of a single container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerResources {
    pub name: String,
    /// CPU request in milli-cores
    pub cpu_request: f64,
    /// CPU limit in milli-cores
    pub cpu_limit: f64,
    /// Memory request in Mi
    pub memory_request: f64,
    /// Memory limit in Mi
    pub memory_limit: f64,
}

/// Normalized resources of a pod, containers in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodResources {
    pub namespace: String,
    pub name: String,
    pub containers: Vec<ContainerResources>,
}

impl PodResources {
    /// One flat row per container
    pub fn rows(&self) -> impl Iterator<Item = ReportRow> + '_ {
        self.containers.iter().map(move |c| ReportRow {
            namespace: self.namespace.clone(),
            pod_name: self.name.clone(),
            container_name: c.name.clone(),
            cpu_request_m: c.cpu_request,
            cpu_limit_m: c.cpu_limit,
            memory_request_mi: c.memory_request,
            memory_limit_mi: c.memory_limit,
        })
    }
}

/// Flat report row, one per container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub namespace: String,
    pub pod_name: String,
    pub container_name: String,
    pub cpu_request_m: f64,
    pub cpu_limit_m: f64,
    pub memory_request_mi: f64,
    pub memory_limit_mi: f64,
}
