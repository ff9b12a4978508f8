//! Unit tests for the customer × feature matrix aggregator

use ragboard::engine::matrix::{EligibilityIndex, MatrixAggregator, ScoreDiff};
use ragboard::engine::rag::{classify_progress, RagStatus};
use ragboard::models::matrix::{
    CustomerFeature, IndicatorFeatureLink, Period, ScoreKey, ScoreSnapshot,
};

fn period() -> Period {
    Period::parse("2026-08").unwrap()
}

fn key(indicator_id: i64, customer_id: i64, feature_id: i64) -> ScoreKey {
    ScoreKey {
        indicator_id,
        customer_id,
        feature_id,
    }
}

#[test]
fn indicator_aggregate_is_flat_mean_times_one_hundred() {
    let mut snap = ScoreSnapshot::new(period());
    snap.set(key(1, 10, 100), 1.0);
    snap.set(key(1, 11, 100), 0.5);

    // (1 + 0.5) / 2 × 100 = 75, which sits just below the green threshold
    let aggregate = MatrixAggregator::indicator_aggregate(&snap, 1).unwrap();
    assert_eq!(aggregate, 75.0);
    assert_eq!(classify_progress(aggregate), RagStatus::Amber);
    assert_eq!(classify_progress(76.0), RagStatus::Green);
}

#[test]
fn indicator_aggregate_rounds_to_two_decimals() {
    let mut snap = ScoreSnapshot::new(period());
    snap.set(key(1, 10, 100), 1.0);
    snap.set(key(1, 11, 100), 1.0);
    snap.set(key(1, 12, 100), 0.0);

    // 2/3 × 100 = 66.666... → 66.67
    assert_eq!(MatrixAggregator::indicator_aggregate(&snap, 1), Some(66.67));
}

#[test]
fn indicator_aggregate_is_flat_not_average_of_averages() {
    let mut snap = ScoreSnapshot::new(period());
    // Feature 100 has three cells, feature 200 has one
    snap.set(key(1, 10, 100), 1.0);
    snap.set(key(1, 11, 100), 1.0);
    snap.set(key(1, 12, 100), 1.0);
    snap.set(key(1, 10, 200), 0.0);

    // Flat mean = 3/4 × 100 = 75; average-of-row-averages would be 50
    assert_eq!(MatrixAggregator::indicator_aggregate(&snap, 1), Some(75.0));
}

#[test]
fn aggregate_of_empty_grid_is_none() {
    let snap = ScoreSnapshot::new(period());
    assert_eq!(MatrixAggregator::indicator_aggregate(&snap, 1), None);
    assert_eq!(MatrixAggregator::customer_average(&snap, 10), None);
    assert_eq!(MatrixAggregator::feature_row_average(&snap, 10, 100), None);
}

#[test]
fn feature_row_average_spans_indicators() {
    let mut snap = ScoreSnapshot::new(period());
    snap.set(key(1, 10, 100), 1.0);
    snap.set(key(2, 10, 100), 0.0);
    snap.set(key(1, 10, 200), 0.5); // different feature, excluded

    assert_eq!(MatrixAggregator::feature_row_average(&snap, 10, 100), Some(50.0));
}

#[test]
fn customer_average_spans_features_and_indicators() {
    let mut snap = ScoreSnapshot::new(period());
    snap.set(key(1, 10, 100), 1.0);
    snap.set(key(1, 10, 200), 0.5);
    snap.set(key(1, 11, 100), 0.0); // different customer, excluded

    assert_eq!(MatrixAggregator::customer_average(&snap, 10), Some(75.0));
}

#[test]
fn diff_deletes_cells_cleared_since_original() {
    let mut original = ScoreSnapshot::new(period());
    original.set(key(1, 10, 100), 1.0);
    original.set(key(1, 11, 100), 0.5);

    let mut working = ScoreSnapshot::new(period());
    working.set(key(1, 10, 100), 0.5); // changed
    // (1, 11, 100) cleared entirely

    let diff = ScoreDiff::compute(&original, &working);
    assert_eq!(diff.upserts, vec![(key(1, 10, 100), 0.5)]);
    assert_eq!(diff.deletes, vec![key(1, 11, 100)]);
}

#[test]
fn diff_of_identical_snapshots_has_no_deletes() {
    let mut original = ScoreSnapshot::new(period());
    original.set(key(1, 10, 100), 1.0);
    let working = original.clone();

    let diff = ScoreDiff::compute(&original, &working);
    assert!(diff.deletes.is_empty());
    assert_eq!(diff.upserts.len(), 1);
}

#[test]
fn diff_is_deterministic_for_identical_inputs() {
    let mut original = ScoreSnapshot::new(period());
    let mut working = ScoreSnapshot::new(period());
    for customer in 10..20 {
        original.set(key(1, customer, 100), 1.0);
        working.set(key(1, customer, 200), 0.5);
    }

    let a = ScoreDiff::compute(&original, &working);
    let b = ScoreDiff::compute(&original, &working);
    assert_eq!(a.upserts, b.upserts);
    assert_eq!(a.deletes, b.deletes);
}

#[test]
fn eligibility_requires_both_links() {
    let links = vec![IndicatorFeatureLink {
        indicator_id: 1,
        feature_id: 100,
    }];
    let subscriptions = vec![CustomerFeature {
        customer_id: 10,
        feature_id: 100,
    }];
    let eligibility = EligibilityIndex::new(&links, &subscriptions);

    assert!(eligibility.is_eligible(&key(1, 10, 100)));
    // Indicator not linked to the feature
    assert!(!eligibility.is_eligible(&key(2, 10, 100)));
    // Customer not subscribed to the feature
    assert!(!eligibility.is_eligible(&key(1, 11, 100)));
}

#[test]
fn bulk_apply_skips_ineligible_cells() {
    let links = vec![IndicatorFeatureLink {
        indicator_id: 1,
        feature_id: 100,
    }];
    let subscriptions = vec![
        CustomerFeature {
            customer_id: 10,
            feature_id: 100,
        },
        CustomerFeature {
            customer_id: 11,
            feature_id: 200,
        },
    ];
    let eligibility = EligibilityIndex::new(&links, &subscriptions);

    let mut snap = ScoreSnapshot::new(period());
    MatrixAggregator::bulk_apply_feature(&mut snap, &eligibility, 1, 100, &[10, 11, 12], 1.0);

    // Only customer 10 subscribes to feature 100
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.get(&key(1, 10, 100)), Some(1.0));
}

#[test]
fn bulk_apply_customer_column_touches_only_linked_features() {
    let links = vec![
        IndicatorFeatureLink {
            indicator_id: 1,
            feature_id: 100,
        },
        IndicatorFeatureLink {
            indicator_id: 1,
            feature_id: 200,
        },
    ];
    let subscriptions = vec![
        CustomerFeature {
            customer_id: 10,
            feature_id: 100,
        },
        CustomerFeature {
            customer_id: 10,
            feature_id: 200,
        },
    ];
    let eligibility = EligibilityIndex::new(&links, &subscriptions);

    let mut snap = ScoreSnapshot::new(period());
    MatrixAggregator::bulk_apply_customer(&mut snap, &eligibility, 1, 10, &[100, 200, 300], 0.5);

    assert_eq!(snap.len(), 2);
    assert_eq!(snap.get(&key(1, 10, 100)), Some(0.5));
    assert_eq!(snap.get(&key(1, 10, 200)), Some(0.5));
    assert!(!snap.contains(&key(1, 10, 300)));
}
