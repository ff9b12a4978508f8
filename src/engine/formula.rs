//! Per-node aggregation formulas
//!
//! Parent nodes declare how their children's progress percentages combine.
//! The stored formula is free text; a recognized keyword is extracted once at
//! load time and kept as a closed enum from then on.

use serde::{Deserialize, Serialize};

/// How a parent combines its children's progress values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormulaType {
    /// Arithmetic mean; also the fallback for unrecognized formula text
    Avg,
    /// Plain sum, for children that are additive quantities
    Sum,
    /// Mean weighted by each child's own target value
    WeightedAvg,
    /// Weakest link
    Min,
    /// Best case
    Max,
}

impl Default for FormulaType {
    fn default() -> Self {
        FormulaType::Avg
    }
}

impl FormulaType {
    /// Extract a formula type from free-form text. Total and idempotent:
    /// case-insensitive keyword scan, anything unrecognized (including empty
    /// or absent text) reads as AVG.
    pub fn parse(raw: Option<&str>) -> Self {
        let text = match raw {
            Some(t) => t.to_uppercase(),
            None => return FormulaType::Avg,
        };

        // WEIGHTED_AVG first: it contains "AVG" as a substring
        if text.contains("WEIGHTED_AVG") {
            FormulaType::WeightedAvg
        } else if text.contains("SUM") {
            FormulaType::Sum
        } else if text.contains("MIN") {
            FormulaType::Min
        } else if text.contains("MAX") {
            FormulaType::Max
        } else {
            FormulaType::Avg
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaType::Avg => "AVG",
            FormulaType::Sum => "SUM",
            FormulaType::WeightedAvg => "WEIGHTED_AVG",
            FormulaType::Min => "MIN",
            FormulaType::Max => "MAX",
        }
    }
}

/// Child progress paired with its aggregation weight (the child's own target)
#[derive(Debug, Clone, Copy)]
pub struct WeightedValue {
    pub progress: f64,
    pub weight: f64,
}

/// Combine child progress values with the given formula.
///
/// Callers guarantee `values` is non-empty and free of NaN; every rollup level
/// short-circuits an empty child list to NotSet before getting here.
pub fn aggregate(values: &[f64], formula: FormulaType) -> f64 {
    debug_assert!(!values.is_empty(), "aggregate called with no children");

    match formula {
        FormulaType::Avg | FormulaType::WeightedAvg => {
            values.iter().sum::<f64>() / values.len() as f64
        }
        FormulaType::Sum => values.iter().sum(),
        FormulaType::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        FormulaType::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Like [`aggregate`], but honors WEIGHTED_AVG using each child's target as
/// its weight. When the total weight is zero or missing, falls back to the
/// plain average.
pub fn aggregate_weighted(children: &[WeightedValue], formula: FormulaType) -> f64 {
    debug_assert!(!children.is_empty(), "aggregate called with no children");

    let progresses: Vec<f64> = children.iter().map(|c| c.progress).collect();

    match formula {
        FormulaType::WeightedAvg => {
            let total_weight: f64 = children.iter().map(|c| c.weight).sum();
            if total_weight > 0.0 {
                children
                    .iter()
                    .map(|c| c.progress * c.weight)
                    .sum::<f64>()
                    / total_weight
            } else {
                aggregate(&progresses, FormulaType::Avg)
            }
        }
        other => aggregate(&progresses, other),
    }
}
