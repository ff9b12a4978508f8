//! Calculation breakdown reporting
//!
//! Reconstructs the intermediate values behind a node's displayed status by
//! calling the same rollup engine functions the live computation uses, so a
//! breakdown can never drift from the number it explains.

use crate::engine::formula::FormulaType;
use crate::engine::rollup::{NodeProgress, RollupEngine};
use crate::models::hierarchy::{
    Department, FunctionalObjective, Indicator, KeyResult, ObjectiveChildren, OrgObjective,
};
use serde::Serialize;

/// Entity kinds addressable by the breakdown endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    OrgObjective,
    Department,
    FunctionalObjective,
    KeyResult,
    Indicator,
}

impl EntityKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "org-objective" | "org_objective" => Some(EntityKind::OrgObjective),
            "department" => Some(EntityKind::Department),
            "functional-objective" | "functional_objective" => Some(EntityKind::FunctionalObjective),
            "key-result" | "key_result" => Some(EntityKind::KeyResult),
            "indicator" | "kpi" => Some(EntityKind::Indicator),
            _ => None,
        }
    }
}

/// One child's contribution to a parent's aggregate
#[derive(Debug, Clone, Serialize)]
pub struct ChildValue {
    pub name: String,
    pub progress: f64,
    /// The child's own target, which is its weight under WEIGHTED_AVG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// The intermediate values that produced a node's final status
#[derive(Debug, Clone, Serialize)]
pub struct CalculationBreakdown {
    /// Human-readable formula; for leaf indicators this is the literal
    /// division expression rather than a formula type
    pub formula: String,
    pub formula_type: FormulaType,
    pub child_values: Vec<ChildValue>,
    pub calculated_progress: Option<f64>,
    pub status: crate::engine::rag::RagStatus,
}

impl CalculationBreakdown {
    fn from_node(
        formula: String,
        formula_type: FormulaType,
        child_values: Vec<ChildValue>,
        node: NodeProgress,
    ) -> Self {
        Self {
            formula,
            formula_type,
            child_values,
            calculated_progress: node.progress,
            status: node.status,
        }
    }
}

pub struct BreakdownReporter;

impl BreakdownReporter {
    /// Leaf level: always the literal `(current / target) * 100` expression.
    pub fn indicator(indicator: &Indicator) -> CalculationBreakdown {
        let node = RollupEngine::indicator_progress(indicator);
        let formula = match (indicator.current_value, indicator.target_value) {
            (Some(c), Some(t)) if t > 0.0 => format!("({c} / {t}) * 100"),
            _ => "(current / target) * 100".to_string(),
        };
        CalculationBreakdown::from_node(formula, FormulaType::Avg, Vec::new(), node)
    }

    pub fn key_result(kr: &KeyResult) -> CalculationBreakdown {
        let node = RollupEngine::key_result_progress(kr);
        let child_values = kr
            .indicators
            .iter()
            .filter_map(|ind| {
                RollupEngine::indicator_progress(ind)
                    .progress
                    .map(|p| ChildValue {
                        name: ind.name.clone(),
                        progress: p,
                        weight: ind.target_value,
                    })
            })
            .collect();
        CalculationBreakdown::from_node(kr.formula.as_str().to_string(), kr.formula, child_values, node)
    }

    pub fn functional_objective(fo: &FunctionalObjective) -> CalculationBreakdown {
        let node = RollupEngine::functional_objective_progress(fo);
        let child_values = fo
            .key_results
            .iter()
            .filter_map(|kr| {
                RollupEngine::key_result_progress(kr)
                    .progress
                    .map(|p| ChildValue {
                        name: kr.name.clone(),
                        progress: p,
                        weight: kr.target_value,
                    })
            })
            .collect();
        CalculationBreakdown::from_node(fo.formula.as_str().to_string(), fo.formula, child_values, node)
    }

    /// Departments report a fixed AVG; they carry no formula of their own.
    pub fn department(department: &Department) -> CalculationBreakdown {
        let node = RollupEngine::department_progress(department);
        let child_values = department
            .functional_objectives
            .iter()
            .filter_map(|fo| {
                RollupEngine::functional_objective_progress(fo)
                    .progress
                    .map(|p| ChildValue {
                        name: fo.name.clone(),
                        progress: p,
                        weight: None,
                    })
            })
            .collect();
        CalculationBreakdown::from_node("AVG".to_string(), FormulaType::Avg, child_values, node)
    }

    pub fn org_objective(objective: &OrgObjective) -> CalculationBreakdown {
        let node = RollupEngine::org_objective_progress(objective);
        let child_values = match &objective.children {
            ObjectiveChildren::Departments(departments) => departments
                .iter()
                .filter_map(|d| {
                    RollupEngine::department_progress(d).progress.map(|p| ChildValue {
                        name: d.name.clone(),
                        progress: p,
                        weight: None,
                    })
                })
                .collect(),
            ObjectiveChildren::FunctionalObjectives(fos) => fos
                .iter()
                .filter_map(|fo| {
                    RollupEngine::functional_objective_progress(fo)
                        .progress
                        .map(|p| ChildValue {
                            name: fo.name.clone(),
                            progress: p,
                            weight: None,
                        })
                })
                .collect(),
        };
        CalculationBreakdown::from_node("AVG".to_string(), FormulaType::Avg, child_values, node)
    }
}
