//! Unit tests for the calculation breakdown reporter

use ragboard::engine::breakdown::{BreakdownReporter, EntityKind};
use ragboard::engine::formula::FormulaType;
use ragboard::engine::rag::RagStatus;
use ragboard::engine::rollup::RollupEngine;
use ragboard::models::hierarchy::{
    Department, Frequency, FunctionalObjective, Indicator, KeyResult, Tier,
};

fn indicator(id: i64, current: Option<f64>, target: Option<f64>) -> Indicator {
    Indicator {
        id,
        name: format!("KPI {}", id),
        tier: Tier::Tier2,
        frequency: Frequency::Weekly,
        current_value: current,
        target_value: target,
        unit: None,
        formula: FormulaType::Avg,
        bands: Vec::new(),
    }
}

fn key_result(id: i64, formula: FormulaType, indicators: Vec<Indicator>) -> KeyResult {
    KeyResult {
        id,
        name: format!("KR {}", id),
        owner: None,
        current_value: None,
        target_value: None,
        unit: None,
        formula,
        indicators,
    }
}

#[test]
fn entity_kind_parses_url_tokens() {
    assert_eq!(EntityKind::parse("org-objective"), Some(EntityKind::OrgObjective));
    assert_eq!(EntityKind::parse("department"), Some(EntityKind::Department));
    assert_eq!(
        EntityKind::parse("functional_objective"),
        Some(EntityKind::FunctionalObjective)
    );
    assert_eq!(EntityKind::parse("key-result"), Some(EntityKind::KeyResult));
    assert_eq!(EntityKind::parse("kpi"), Some(EntityKind::Indicator));
    assert_eq!(EntityKind::parse("strategy"), None);
}

#[test]
fn indicator_breakdown_reports_literal_division() {
    let ind = indicator(1, Some(40.0), Some(50.0));
    let breakdown = BreakdownReporter::indicator(&ind);
    assert_eq!(breakdown.formula, "(40 / 50) * 100");
    assert_eq!(breakdown.calculated_progress, Some(80.0));
    assert_eq!(breakdown.status, RagStatus::Green);
    assert!(breakdown.child_values.is_empty());
}

#[test]
fn dataless_indicator_breakdown_is_empty_not_an_error() {
    let breakdown = BreakdownReporter::indicator(&indicator(1, None, None));
    assert_eq!(breakdown.calculated_progress, None);
    assert_eq!(breakdown.status, RagStatus::NotSet);
}

#[test]
fn key_result_breakdown_matches_live_rollup() {
    let kr = key_result(
        1,
        FormulaType::WeightedAvg,
        vec![
            indicator(1, Some(5.0), Some(10.0)),
            indicator(2, Some(30.0), Some(30.0)),
        ],
    );
    let breakdown = BreakdownReporter::key_result(&kr);
    let live = RollupEngine::key_result_progress(&kr);

    assert_eq!(breakdown.calculated_progress, live.progress);
    assert_eq!(breakdown.status, live.status);
    assert_eq!(breakdown.formula_type, FormulaType::WeightedAvg);
    assert_eq!(breakdown.child_values.len(), 2);
    assert_eq!(breakdown.child_values[0].progress, 50.0);
    assert_eq!(breakdown.child_values[0].weight, Some(10.0));
}

#[test]
fn breakdown_excludes_dataless_children_like_the_rollup_does() {
    let kr = key_result(
        1,
        FormulaType::Avg,
        vec![
            indicator(1, None, None),
            indicator(2, Some(80.0), Some(100.0)),
        ],
    );
    let breakdown = BreakdownReporter::key_result(&kr);
    assert_eq!(breakdown.child_values.len(), 1);
    assert_eq!(breakdown.calculated_progress, Some(80.0));
}

#[test]
fn department_breakdown_is_fixed_avg() {
    let dep = Department {
        id: 1,
        name: "Engineering".to_string(),
        owner: None,
        color: None,
        functional_objectives: vec![
            FunctionalObjective {
                id: 1,
                name: "Reliability".to_string(),
                owner: None,
                formula: FormulaType::Min,
                key_results: vec![key_result(
                    1,
                    FormulaType::Avg,
                    vec![indicator(1, Some(60.0), Some(100.0))],
                )],
            },
            FunctionalObjective {
                id: 2,
                name: "Velocity".to_string(),
                owner: None,
                formula: FormulaType::Avg,
                key_results: vec![key_result(
                    2,
                    FormulaType::Avg,
                    vec![indicator(2, Some(100.0), Some(100.0))],
                )],
            },
        ],
    };

    let breakdown = BreakdownReporter::department(&dep);
    let live = RollupEngine::department_progress(&dep);

    assert_eq!(breakdown.formula_type, FormulaType::Avg);
    assert_eq!(breakdown.calculated_progress, Some(80.0));
    assert_eq!(breakdown.calculated_progress, live.progress);
    assert_eq!(breakdown.status, live.status);
}
