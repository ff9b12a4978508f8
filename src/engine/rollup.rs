//! Hierarchy rollup engine
//!
//! Computes progress bottom-up through the five-level tree, applying each
//! node's own formula and classifying the result at every level. Children
//! without progress are skipped, never zero-filled, so a branch with no data
//! anywhere resolves to NotSet rather than manufacturing a red signal.

use crate::engine::formula::{aggregate, aggregate_weighted, FormulaType, WeightedValue};
use crate::engine::rag::{classify_progress, RagStatus};
use crate::models::hierarchy::{
    Department, FunctionalObjective, Indicator, KeyResult, ObjectiveChildren, OrgObjective,
};
use serde::Serialize;

/// Derived progress and status for one node. Progress is None only when the
/// node has no data at all; an explicit measurement of zero keeps its value
/// but still classifies as NotSet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeProgress {
    pub progress: Option<f64>,
    pub status: RagStatus,
}

impl NodeProgress {
    pub fn not_set() -> Self {
        Self {
            progress: None,
            status: RagStatus::NotSet,
        }
    }

    pub fn from_progress(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            status: classify_progress(progress),
        }
    }
}

/// Raw progress of a current/target pair, when it is structurally computable
fn pair_progress(current: Option<f64>, target: Option<f64>) -> Option<f64> {
    match (current, target) {
        (Some(c), Some(t)) if t > 0.0 => Some(c / t * 100.0),
        _ => None,
    }
}

pub struct RollupEngine;

impl RollupEngine {
    /// Leaf level: progress = current / target × 100 when both are present
    /// and the target is positive.
    pub fn indicator_progress(indicator: &Indicator) -> NodeProgress {
        match pair_progress(indicator.current_value, indicator.target_value) {
            Some(p) => NodeProgress::from_progress(p),
            None => NodeProgress::not_set(),
        }
    }

    /// A key result with indicators derives its progress from them via its
    /// own formula; its stored current/target pair is then informational.
    /// Without indicators the pair is used directly.
    pub fn key_result_progress(kr: &KeyResult) -> NodeProgress {
        if kr.indicators.is_empty() {
            return match pair_progress(kr.current_value, kr.target_value) {
                Some(p) => NodeProgress::from_progress(p),
                None => NodeProgress::not_set(),
            };
        }

        let children: Vec<WeightedValue> = kr
            .indicators
            .iter()
            .filter_map(|ind| {
                Self::indicator_progress(ind).progress.map(|p| WeightedValue {
                    progress: p,
                    weight: ind.target_value.unwrap_or(0.0),
                })
            })
            .collect();

        if children.is_empty() {
            return NodeProgress::not_set();
        }
        NodeProgress::from_progress(aggregate_weighted(&children, kr.formula))
    }

    /// Aggregates child key results (each computed with that KR's own
    /// formula) using the functional objective's formula.
    pub fn functional_objective_progress(fo: &FunctionalObjective) -> NodeProgress {
        let children: Vec<WeightedValue> = fo
            .key_results
            .iter()
            .filter_map(|kr| {
                Self::key_result_progress(kr).progress.map(|p| WeightedValue {
                    progress: p,
                    weight: kr.target_value.unwrap_or(0.0),
                })
            })
            .collect();

        if children.is_empty() {
            return NodeProgress::not_set();
        }
        NodeProgress::from_progress(aggregate_weighted(&children, fo.formula))
    }

    /// Departments always average their functional objectives; there is no
    /// configurable formula at this level.
    pub fn department_progress(department: &Department) -> NodeProgress {
        let children: Vec<f64> = department
            .functional_objectives
            .iter()
            .filter_map(|fo| Self::functional_objective_progress(fo).progress)
            .collect();

        if children.is_empty() {
            return NodeProgress::not_set();
        }
        NodeProgress::from_progress(aggregate(&children, FormulaType::Avg))
    }

    /// Top level: averages whichever child shape is populated.
    pub fn org_objective_progress(objective: &OrgObjective) -> NodeProgress {
        let children: Vec<f64> = match &objective.children {
            ObjectiveChildren::Departments(departments) => departments
                .iter()
                .filter_map(|d| Self::department_progress(d).progress)
                .collect(),
            ObjectiveChildren::FunctionalObjectives(fos) => fos
                .iter()
                .filter_map(|fo| Self::functional_objective_progress(fo).progress)
                .collect(),
        };

        if children.is_empty() {
            return NodeProgress::not_set();
        }
        NodeProgress::from_progress(aggregate(&children, FormulaType::Avg))
    }
}
