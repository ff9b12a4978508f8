//! Unit tests for the hierarchy rollup engine

use ragboard::engine::formula::FormulaType;
use ragboard::engine::rag::RagStatus;
use ragboard::engine::rollup::RollupEngine;
use ragboard::models::hierarchy::{
    Classification, Department, Frequency, FunctionalObjective, Indicator, KeyResult,
    ObjectiveChildren, OrgObjective, Tier,
};

fn indicator(id: i64, current: Option<f64>, target: Option<f64>) -> Indicator {
    Indicator {
        id,
        name: format!("KPI {}", id),
        tier: Tier::Tier1,
        frequency: Frequency::Monthly,
        current_value: current,
        target_value: target,
        unit: Some("%".to_string()),
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

fn functional_objective(
    id: i64,
    formula: FormulaType,
    key_results: Vec<KeyResult>,
) -> FunctionalObjective {
    FunctionalObjective {
        id,
        name: format!("FO {}", id),
        owner: None,
        formula,
        key_results,
    }
}

fn department(id: i64, functional_objectives: Vec<FunctionalObjective>) -> Department {
    Department {
        id,
        name: format!("Department {}", id),
        owner: None,
        color: None,
        functional_objectives,
    }
}

#[test]
fn indicator_progress_is_current_over_target() {
    let node = RollupEngine::indicator_progress(&indicator(1, Some(40.0), Some(50.0)));
    assert_eq!(node.progress, Some(80.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn indicator_without_target_is_not_set() {
    let node = RollupEngine::indicator_progress(&indicator(1, Some(40.0), None));
    assert_eq!(node.progress, None);
    assert_eq!(node.status, RagStatus::NotSet);

    let node = RollupEngine::indicator_progress(&indicator(1, Some(40.0), Some(0.0)));
    assert_eq!(node.status, RagStatus::NotSet);
}

#[test]
fn indicator_measured_zero_is_not_set_but_keeps_progress() {
    let node = RollupEngine::indicator_progress(&indicator(1, Some(0.0), Some(100.0)));
    assert_eq!(node.progress, Some(0.0));
    assert_eq!(node.status, RagStatus::NotSet);
}

#[test]
fn key_result_without_indicators_uses_own_pair() {
    let mut kr = key_result(1, FormulaType::Avg, Vec::new());
    kr.current_value = Some(60.0);
    kr.target_value = Some(100.0);
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, Some(60.0));
    assert_eq!(node.status, RagStatus::Amber);
}

#[test]
fn key_result_with_indicators_ignores_own_pair() {
    let mut kr = key_result(
        1,
        FormulaType::Avg,
        vec![
            indicator(1, Some(80.0), Some(100.0)),
            indicator(2, Some(100.0), Some(100.0)),
        ],
    );
    // Stored pair says 10%, but the indicators govern
    kr.current_value = Some(10.0);
    kr.target_value = Some(100.0);
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, Some(90.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn key_result_weighted_avg_uses_indicator_targets() {
    // progress 50 with target 10, progress 100 with target 30 → 87.5
    let kr = key_result(
        1,
        FormulaType::WeightedAvg,
        vec![
            indicator(1, Some(5.0), Some(10.0)),
            indicator(2, Some(30.0), Some(30.0)),
        ],
    );
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, Some(87.5));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn key_result_min_formula_takes_weakest_link() {
    let kr = key_result(
        1,
        FormulaType::Min,
        vec![
            indicator(1, Some(40.0), Some(100.0)),
            indicator(2, Some(90.0), Some(100.0)),
            indicator(3, Some(60.0), Some(100.0)),
        ],
    );
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, Some(40.0));
    assert_eq!(node.status, RagStatus::Red);
}

#[test]
fn key_result_skips_indicators_without_progress() {
    let kr = key_result(
        1,
        FormulaType::Avg,
        vec![
            indicator(1, None, None),
            indicator(2, Some(80.0), Some(100.0)),
        ],
    );
    // The dataless indicator is excluded, not zero-filled
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, Some(80.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn key_result_with_all_dataless_indicators_is_not_set() {
    let kr = key_result(
        1,
        FormulaType::Avg,
        vec![indicator(1, None, None), indicator(2, Some(5.0), None)],
    );
    let node = RollupEngine::key_result_progress(&kr);
    assert_eq!(node.progress, None);
    assert_eq!(node.status, RagStatus::NotSet);
}

#[test]
fn functional_objective_aggregates_with_its_own_formula() {
    let fo = functional_objective(
        1,
        FormulaType::Max,
        vec![
            key_result(1, FormulaType::Avg, vec![indicator(1, Some(40.0), Some(100.0))]),
            key_result(2, FormulaType::Avg, vec![indicator(2, Some(90.0), Some(100.0))]),
        ],
    );
    let node = RollupEngine::functional_objective_progress(&fo);
    assert_eq!(node.progress, Some(90.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn department_averages_and_excludes_not_set_children() {
    let dep = department(
        1,
        vec![
            // No data anywhere in this FO
            functional_objective(1, FormulaType::Avg, vec![key_result(1, FormulaType::Avg, vec![])]),
            functional_objective(
                2,
                FormulaType::Avg,
                vec![key_result(2, FormulaType::Avg, vec![indicator(1, Some(80.0), Some(100.0))])],
            ),
        ],
    );
    let node = RollupEngine::department_progress(&dep);
    assert_eq!(node.progress, Some(80.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn empty_branch_rolls_up_not_set_never_red() {
    let dep = department(
        1,
        vec![functional_objective(
            1,
            FormulaType::Avg,
            vec![key_result(1, FormulaType::Avg, vec![indicator(1, None, None)])],
        )],
    );
    let node = RollupEngine::department_progress(&dep);
    assert_eq!(node.progress, None);
    assert_eq!(node.status, RagStatus::NotSet);
}

#[test]
fn org_objective_with_departments() {
    let objective = OrgObjective {
        id: 1,
        name: "Grow revenue".to_string(),
        classification: Classification::Core,
        color: None,
        children: ObjectiveChildren::Departments(vec![
            department(
                1,
                vec![functional_objective(
                    1,
                    FormulaType::Avg,
                    vec![key_result(1, FormulaType::Avg, vec![indicator(1, Some(60.0), Some(100.0))])],
                )],
            ),
            department(
                2,
                vec![functional_objective(
                    2,
                    FormulaType::Avg,
                    vec![key_result(2, FormulaType::Avg, vec![indicator(2, Some(100.0), Some(100.0))])],
                )],
            ),
        ]),
    };
    let node = RollupEngine::org_objective_progress(&objective);
    assert_eq!(node.progress, Some(80.0));
    assert_eq!(node.status, RagStatus::Green);
}

#[test]
fn org_objective_with_direct_functional_objectives() {
    let objective = OrgObjective {
        id: 2,
        name: "Operational excellence".to_string(),
        classification: Classification::Support,
        color: None,
        children: ObjectiveChildren::FunctionalObjectives(vec![functional_objective(
            1,
            FormulaType::Avg,
            vec![key_result(1, FormulaType::Avg, vec![indicator(1, Some(55.0), Some(100.0))])],
        )]),
    };
    let node = RollupEngine::org_objective_progress(&objective);
    assert_eq!(node.progress, Some(55.0));
    assert_eq!(node.status, RagStatus::Amber);
}

#[test]
fn progress_above_one_hundred_is_not_clamped() {
    let node = RollupEngine::indicator_progress(&indicator(1, Some(150.0), Some(100.0)));
    assert_eq!(node.progress, Some(150.0));
    assert_eq!(node.status, RagStatus::Green);
}
