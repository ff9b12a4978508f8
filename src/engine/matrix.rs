//! Customer × feature matrix aggregation
//!
//! Converts discrete band weights entered per cell into row, customer, and
//! overall averages, and derives a matrix-fed indicator's value from the flat
//! grand mean of its cells. Cells with no structural link are excluded
//! entirely, not treated as zero.

use crate::models::matrix::{CustomerFeature, IndicatorFeatureLink, ScoreKey, ScoreSnapshot};
use serde::Serialize;
use std::collections::HashSet;

/// Round to 2 decimals, the precision indicator values are stored at
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Structural eligibility of grid cells: a cell exists only when the
/// indicator measures the feature AND the customer subscribes to it.
#[derive(Debug, Clone, Default)]
pub struct EligibilityIndex {
    indicator_features: HashSet<(i64, i64)>,
    customer_features: HashSet<(i64, i64)>,
}

impl EligibilityIndex {
    pub fn new(links: &[IndicatorFeatureLink], subscriptions: &[CustomerFeature]) -> Self {
        Self {
            indicator_features: links
                .iter()
                .map(|l| (l.indicator_id, l.feature_id))
                .collect(),
            customer_features: subscriptions
                .iter()
                .map(|s| (s.customer_id, s.feature_id))
                .collect(),
        }
    }

    pub fn is_eligible(&self, key: &ScoreKey) -> bool {
        self.indicator_features
            .contains(&(key.indicator_id, key.feature_id))
            && self
                .customer_features
                .contains(&(key.customer_id, key.feature_id))
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub struct MatrixAggregator;

impl MatrixAggregator {
    /// Mean of all set cell weights for one (customer, feature) pair across
    /// every indicator in the grid, × 100. None when no cell is set.
    pub fn feature_row_average(
        snapshot: &ScoreSnapshot,
        customer_id: i64,
        feature_id: i64,
    ) -> Option<f64> {
        let weights: Vec<f64> = snapshot
            .iter()
            .filter(|(k, _)| k.customer_id == customer_id && k.feature_id == feature_id)
            .map(|(_, w)| *w)
            .collect();
        mean(&weights).map(|m| round2(m * 100.0))
    }

    /// Mean of all of a customer's set cell weights across their applicable
    /// (indicator, feature) combinations, × 100.
    pub fn customer_average(snapshot: &ScoreSnapshot, customer_id: i64) -> Option<f64> {
        let weights: Vec<f64> = snapshot
            .iter()
            .filter(|(k, _)| k.customer_id == customer_id)
            .map(|(_, w)| *w)
            .collect();
        mean(&weights).map(|m| round2(m * 100.0))
    }

    /// Flat mean of ALL set cell weights for one indicator across customers
    /// and features (not an average of averages), × 100, rounded to 2
    /// decimals. This becomes the indicator's new current value, with its
    /// target pinned to 100.
    pub fn indicator_aggregate(snapshot: &ScoreSnapshot, indicator_id: i64) -> Option<f64> {
        let weights: Vec<f64> = snapshot
            .iter()
            .filter(|(k, _)| k.indicator_id == indicator_id)
            .map(|(_, w)| *w)
            .collect();
        mean(&weights).map(|m| round2(m * 100.0))
    }

    /// Apply one band weight to every cell of a feature row (all customers).
    /// Ineligible cells are silently left untouched.
    pub fn bulk_apply_feature(
        snapshot: &mut ScoreSnapshot,
        eligibility: &EligibilityIndex,
        indicator_id: i64,
        feature_id: i64,
        customer_ids: &[i64],
        weight: f64,
    ) {
        for &customer_id in customer_ids {
            let key = ScoreKey {
                indicator_id,
                customer_id,
                feature_id,
            };
            if eligibility.is_eligible(&key) {
                snapshot.set(key, weight);
            }
        }
    }

    /// Apply one band weight to every cell of a customer column (all
    /// features). Ineligible cells are silently left untouched.
    pub fn bulk_apply_customer(
        snapshot: &mut ScoreSnapshot,
        eligibility: &EligibilityIndex,
        indicator_id: i64,
        customer_id: i64,
        feature_ids: &[i64],
        weight: f64,
    ) {
        for &feature_id in feature_ids {
            let key = ScoreKey {
                indicator_id,
                customer_id,
                feature_id,
            };
            if eligibility.is_eligible(&key) {
                snapshot.set(key, weight);
            }
        }
    }
}

/// Persistence plan for an edit session: what to upsert and what to delete.
///
/// Computed from two value-object snapshots so no hidden session state is
/// involved. A key present in the original but absent from the working copy
/// is an explicit delete, not an upsert of null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreDiff {
    pub upserts: Vec<(ScoreKey, f64)>,
    pub deletes: Vec<ScoreKey>,
}

impl ScoreDiff {
    pub fn compute(original: &ScoreSnapshot, working: &ScoreSnapshot) -> Self {
        let mut upserts: Vec<(ScoreKey, f64)> = working.iter().map(|(k, w)| (*k, *w)).collect();
        let mut deletes: Vec<ScoreKey> = original
            .iter()
            .filter(|(k, _)| !working.contains(k))
            .map(|(k, _)| *k)
            .collect();

        // Deterministic order for identical inputs
        upserts.sort_by_key(|(k, _)| *k);
        deletes.sort();

        Self { upserts, deletes }
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}
