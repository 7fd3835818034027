//! Single quantity normalization

use anyhow::{Context, Result};
use report_lib::csv::format_value;
use report_lib::ResourceKind;

use crate::QuantityKind;

impl From<QuantityKind> for ResourceKind {
    fn from(kind: QuantityKind) -> Self {
        match kind {
            QuantityKind::Cpu => ResourceKind::Cpu,
            QuantityKind::Memory => ResourceKind::Memory,
        }
    }
}

/// Normalize `value` and print it with its unit
pub fn run(kind: QuantityKind, value: &str) -> Result<()> {
    let kind = ResourceKind::from(kind);

    let normalized = kind
        .normalize(value)
        .with_context(|| format!("Cannot normalize {:?}", value))?;

    println!("{}{}", format_value(normalized), kind.unit());
    Ok(())
}
