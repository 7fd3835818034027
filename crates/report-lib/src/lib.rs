//! Pod resource report library
//!
//! This crate provides the building blocks of the pod resource report:
//! - Quantity normalization (CPU to milli-cores, memory to Mi)
//! - Pod sources (kubectl, saved JSON dumps, the Kubernetes API)
//! - Report assembly with best-effort handling of malformed quantities
//! - CSV output
//! - Layered settings and structured run logging

pub mod csv;
pub mod models;
pub mod observability;
pub mod quantity;
pub mod report;
pub mod settings;
pub mod source;

pub use models::*;
pub use observability::RunLogger;
pub use quantity::{normalize_cpu, normalize_memory, QuantityError, ResourceKind};
pub use report::{build_report, Report, ReportSummary, ResourceField};
pub use settings::{ReportSettings, SourceKind};
pub use source::{ApiSource, FileSource, KubectlSource, PodSource, SourceError};
