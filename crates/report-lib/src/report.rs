//! Report assembly
//!
//! Turns raw pod descriptors into normalized pod records. Normalization
//! failures are logged and leave the affected field at zero so one malformed
//! quantity never drops the rest of the report.

use crate::models::{
    ContainerDescriptor, ContainerResources, PodDescriptor, PodResources, ReportRow,
};
use crate::observability::RunLogger;
use crate::quantity::ResourceKind;

/// The four quantity fields carried by every container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceField {
    CpuRequest,
    CpuLimit,
    MemoryRequest,
    MemoryLimit,
}

impl ResourceField {
    pub const ALL: [ResourceField; 4] = [
        ResourceField::CpuRequest,
        ResourceField::CpuLimit,
        ResourceField::MemoryRequest,
        ResourceField::MemoryLimit,
    ];

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceField::CpuRequest | ResourceField::CpuLimit => ResourceKind::Cpu,
            ResourceField::MemoryRequest | ResourceField::MemoryLimit => ResourceKind::Memory,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceField::CpuRequest => "CPU request",
            ResourceField::CpuLimit => "CPU limit",
            ResourceField::MemoryRequest => "memory request",
            ResourceField::MemoryLimit => "memory limit",
        }
    }

    /// Raw quantity string of this field on `container`
    pub fn raw<'a>(&self, container: &'a ContainerDescriptor) -> &'a str {
        let resources = &container.resources;
        match self {
            ResourceField::CpuRequest => &resources.requests.cpu,
            ResourceField::CpuLimit => &resources.limits.cpu,
            ResourceField::MemoryRequest => &resources.requests.memory,
            ResourceField::MemoryLimit => &resources.limits.memory,
        }
    }

    fn slot<'a>(&self, resources: &'a mut ContainerResources) -> &'a mut f64 {
        match self {
            ResourceField::CpuRequest => &mut resources.cpu_request,
            ResourceField::CpuLimit => &mut resources.cpu_limit,
            ResourceField::MemoryRequest => &mut resources.memory_request,
            ResourceField::MemoryLimit => &mut resources.memory_limit,
        }
    }
}

/// Counters for a report run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub pods: usize,
    pub containers: usize,
    pub normalization_failures: usize,
}

/// Normalized report, pods in query order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub pods: Vec<PodResources>,
    pub summary: ReportSummary,
}

impl Report {
    /// Flatten into one row per container
    pub fn rows(&self) -> Vec<ReportRow> {
        self.pods.iter().flat_map(PodResources::rows).collect()
    }
}

/// Normalize every container of every pod
pub fn build_report(pods: &[PodDescriptor]) -> Report {
    let logger = RunLogger::new();
    let mut summary = ReportSummary::default();
    let mut records = Vec::with_capacity(pods.len());

    for pod in pods {
        let namespace = &pod.metadata.namespace;
        let pod_name = &pod.metadata.name;
        let mut containers = Vec::with_capacity(pod.spec.containers.len());

        for container in &pod.spec.containers {
            let mut resources = ContainerResources {
                name: container.name.clone(),
                ..Default::default()
            };

            for field in ResourceField::ALL {
                let raw = field.raw(container);
                match field.kind().normalize(raw) {
                    Ok(value) => *field.slot(&mut resources) = value,
                    Err(err) => {
                        summary.normalization_failures += 1;
                        logger.log_normalization_failure(
                            namespace,
                            pod_name,
                            &container.name,
                            field.label(),
                            raw,
                            &err,
                        );
                    }
                }
            }

            containers.push(resources);
        }

        summary.pods += 1;
        summary.containers += containers.len();
        records.push(PodResources {
            namespace: namespace.clone(),
            name: pod_name.clone(),
            containers,
        });
    }

    Report {
        pods: records,
        summary,
    }
}
