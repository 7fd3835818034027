//! Resource quantity normalization
//!
//! Converts the textual quantities found in container resource requests and
//! limits into plain numbers in a fixed unit:
//! - CPU quantities into milli-cores
//! - Memory quantities into mebibytes (Mi)
//!
//! Only the handful of suffixes below are recognized. Anything else is
//! reported as an error so the caller can decide what to do with the field.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// `<number>[<unit>]` after lower-casing. Digits are ASCII only; vertical
/// tab is not accepted as separating whitespace.
const QUANTITY_PATTERN: &str = r"^([0-9]+(?:\.[0-9]+)?)[\t\n\x0C\r ]*([a-z]*)$";

static QUANTITY_RE: OnceLock<Regex> = OnceLock::new();

/// Errors produced while normalizing a quantity string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    /// The input is not of the form `<number>[<unit>]`
    #[error("invalid resource value format: {0}")]
    Format(String),

    /// The input is well formed but the unit is not valid for the resource
    #[error("unknown unit: {0:?}")]
    UnknownUnit(String),
}

/// Kind of resource a quantity describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cpu,
    Memory,
}

impl ResourceKind {
    /// Normalize `input` into this kind's output unit
    pub fn normalize(&self, input: &str) -> Result<f64, QuantityError> {
        match self {
            ResourceKind::Cpu => normalize_cpu(input),
            ResourceKind::Memory => normalize_memory(input),
        }
    }

    /// Unit of the normalized value
    pub fn unit(&self) -> &'static str {
        match self {
            ResourceKind::Cpu => "m",
            ResourceKind::Memory => "Mi",
        }
    }
}

/// Normalize a CPU quantity into milli-cores.
///
/// `"250m"` is already in milli-cores, a bare number is whole cores.
/// An empty string is `0.0`.
pub fn normalize_cpu(input: &str) -> Result<f64, QuantityError> {
    let Some((value, unit)) = split_quantity(input)? else {
        return Ok(0.0);
    };

    match unit.as_str() {
        "m" => Ok(value),
        "" => Ok(value * 1000.0),
        _ => Err(QuantityError::UnknownUnit(unit)),
    }
}

/// Normalize a memory quantity into mebibytes.
///
/// Accepts the binary suffixes `Mi`, `Gi` and `Ti` in any case. Bare byte
/// counts and decimal SI suffixes are rejected. An empty string is `0.0`.
pub fn normalize_memory(input: &str) -> Result<f64, QuantityError> {
    let Some((value, unit)) = split_quantity(input)? else {
        return Ok(0.0);
    };

    match unit.as_str() {
        "mi" => Ok(value),
        "gi" => Ok(value * 1024.0),
        "ti" => Ok(value * 1024.0 * 1024.0),
        _ => Err(QuantityError::UnknownUnit(unit)),
    }
}

/// Split a quantity into its numeric value and lower-cased unit.
/// Returns `None` for the empty string.
fn split_quantity(input: &str) -> Result<Option<(f64, String)>, QuantityError> {
    if input.is_empty() {
        return Ok(None);
    }

    let re = QUANTITY_RE.get_or_init(|| {
        Regex::new(QUANTITY_PATTERN).expect("quantity pattern is a valid regex")
    });

    let lowered = input.to_lowercase();
    let captures = re
        .captures(&lowered)
        .ok_or_else(|| QuantityError::Format(input.to_string()))?;

    let value: f64 = captures[1]
        .parse()
        .map_err(|_| QuantityError::Format(input.to_string()))?;

    // Overflowing digit strings parse to infinity
    if !value.is_finite() {
        return Err(QuantityError::Format(input.to_string()));
    }

    Ok(Some((value, captures[2].to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(normalize_cpu(""), Ok(0.0));
        assert_eq!(normalize_memory(""), Ok(0.0));
    }

    #[test]
    fn test_cpu_millicores() {
        assert_eq!(normalize_cpu("250m"), Ok(250.0));
        assert_eq!(normalize_cpu("100M"), Ok(100.0));
        assert_eq!(normalize_cpu("0.5m"), Ok(0.5));
    }

    #[test]
    fn test_cpu_whole_cores() {
        assert_eq!(normalize_cpu("2"), Ok(2000.0));
        assert_eq!(normalize_cpu("1.5"), Ok(1500.0));
        assert_eq!(normalize_cpu("0"), Ok(0.0));
    }

    #[test]
    fn test_memory_binary_units() {
        assert_eq!(normalize_memory("512Mi"), Ok(512.0));
        assert_eq!(normalize_memory("2Gi"), Ok(2048.0));
        assert_eq!(normalize_memory("1Ti"), Ok(1048576.0));
        assert_eq!(normalize_memory("1.5Gi"), Ok(1536.0));
    }

    #[test]
    fn test_memory_unit_is_case_insensitive() {
        assert_eq!(normalize_memory("512MI"), normalize_memory("512mi"));
        assert_eq!(normalize_memory("2gI"), Ok(2048.0));
    }

    #[test]
    fn test_whitespace_between_number_and_unit() {
        assert_eq!(normalize_cpu("250 m"), Ok(250.0));
        assert_eq!(normalize_memory("64\tMi"), Ok(64.0));
        assert_eq!(normalize_memory("64\x0CMi"), Ok(64.0));
    }

    #[test]
    fn test_vertical_tab_is_not_a_separator() {
        assert_eq!(
            normalize_memory("1\x0BMi"),
            Err(QuantityError::Format("1\x0BMi".to_string()))
        );
        assert!(matches!(normalize_cpu("1\x0Bm"), Err(QuantityError::Format(_))));
    }

    #[test]
    fn test_format_errors() {
        assert_eq!(
            normalize_cpu("abc"),
            Err(QuantityError::Format("abc".to_string()))
        );
        assert_eq!(
            normalize_memory("abc"),
            Err(QuantityError::Format("abc".to_string()))
        );
        assert!(matches!(normalize_cpu("-1"), Err(QuantityError::Format(_))));
        assert!(matches!(normalize_cpu(".5"), Err(QuantityError::Format(_))));
        assert!(matches!(normalize_cpu("1e3"), Err(QuantityError::Format(_))));
        assert!(matches!(normalize_memory(" 1Gi"), Err(QuantityError::Format(_))));
        assert!(matches!(normalize_memory("1Gi "), Err(QuantityError::Format(_))));
    }

    #[test]
    fn test_format_error_keeps_original_input() {
        assert_eq!(
            normalize_memory("Lots of RAM"),
            Err(QuantityError::Format("Lots of RAM".to_string()))
        );
    }

    #[test]
    fn test_overflowing_number_is_format_error() {
        let huge = format!("{}Mi", "9".repeat(400));
        assert!(matches!(normalize_memory(&huge), Err(QuantityError::Format(_))));
    }

    #[test]
    fn test_unknown_cpu_units() {
        assert_eq!(
            normalize_cpu("5Gi"),
            Err(QuantityError::UnknownUnit("gi".to_string()))
        );
        assert_eq!(
            normalize_cpu("1k"),
            Err(QuantityError::UnknownUnit("k".to_string()))
        );
    }

    #[test]
    fn test_unknown_memory_units() {
        assert_eq!(
            normalize_memory("5"),
            Err(QuantityError::UnknownUnit(String::new()))
        );
        for input in ["128974848", "129e6", "129M", "123k", "1G", "100m", "1Ki", "1Pi"] {
            assert!(
                normalize_memory(input).is_err(),
                "{input} should not normalize"
            );
        }
        assert_eq!(
            normalize_memory("1G"),
            Err(QuantityError::UnknownUnit("g".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuantityError::Format("abc".into()).to_string(),
            "invalid resource value format: abc"
        );
        assert_eq!(
            QuantityError::UnknownUnit("gi".into()).to_string(),
            "unknown unit: \"gi\""
        );
    }

    #[test]
    fn test_resource_kind_dispatch() {
        assert_eq!(ResourceKind::Cpu.normalize("2"), Ok(2000.0));
        assert_eq!(ResourceKind::Memory.normalize("2Gi"), Ok(2048.0));
        assert_eq!(ResourceKind::Cpu.unit(), "m");
        assert_eq!(ResourceKind::Memory.unit(), "Mi");
    }

    #[test]
    fn test_normalization_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(normalize_cpu("1.25"), Ok(1250.0));
        }
    }
}
