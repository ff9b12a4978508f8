//! RAG classification
//!
//! Maps a progress percentage (or a discrete band weight) to a
//! Red/Amber/Green health status. A progress of exactly zero means "not yet
//! measured", never "measured and bad" — the NotSet/Red distinction is a
//! business rule, not an accident.

use crate::models::hierarchy::{RagBand, RagColor};
use serde::{Deserialize, Serialize};

/// Progress at or above this is green
pub const GREEN_THRESHOLD: f64 = 76.0;
/// Progress at or above this (and below green) is amber
pub const AMBER_THRESHOLD: f64 = 51.0;

/// Health status of a node. Ordering is worst-to-best for measured values,
/// with NotSet below everything ("no data" is not a health signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStatus {
    NotSet,
    Red,
    Amber,
    Green,
}

impl RagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RagStatus::NotSet => "not_set",
            RagStatus::Red => "red",
            RagStatus::Amber => "amber",
            RagStatus::Green => "green",
        }
    }

    /// Total parse with a default arm; unknown text reads as NotSet
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "red" => RagStatus::Red,
            "amber" => RagStatus::Amber,
            "green" => RagStatus::Green,
            _ => RagStatus::NotSet,
        }
    }
}

impl From<RagColor> for RagStatus {
    fn from(color: RagColor) -> Self {
        match color {
            RagColor::Red => RagStatus::Red,
            RagColor::Amber => RagStatus::Amber,
            RagColor::Green => RagStatus::Green,
        }
    }
}

/// Classify a progress percentage against the fixed global thresholds.
///
/// Exactly zero (or anything non-positive, or NaN) is NotSet; a merely tiny
/// positive value is a legitimate Red.
pub fn classify_progress(progress: f64) -> RagStatus {
    if progress.is_nan() {
        return RagStatus::NotSet;
    }
    if progress >= GREEN_THRESHOLD {
        RagStatus::Green
    } else if progress >= AMBER_THRESHOLD {
        RagStatus::Amber
    } else if progress > 0.0 {
        RagStatus::Red
    } else {
        RagStatus::NotSet
    }
}

/// Classify a raw current/target pair. A missing or non-positive target is
/// structurally unset regardless of the current value.
pub fn classify_pair(current: Option<f64>, target: Option<f64>) -> RagStatus {
    match (current, target) {
        (Some(c), Some(t)) if t > 0.0 => classify_progress(c / t * 100.0),
        _ => RagStatus::NotSet,
    }
}

/// Match a discrete band weight against an indicator's ordered custom bands
/// by exact equality on `rag_numeric`.
pub fn match_band<'a>(weight: f64, bands: &'a [RagBand]) -> Option<&'a RagBand> {
    bands.iter().find(|b| (b.rag_numeric - weight).abs() < 1e-9)
}

/// Status for a band weight: the matched band's color, or the fixed-threshold
/// classification of `weight × 100` when no band matches exactly.
pub fn classify_band_weight(weight: f64, bands: &[RagBand]) -> RagStatus {
    match match_band(weight, bands) {
        Some(band) => band.rag_color.into(),
        None => classify_progress(weight * 100.0),
    }
}

/// Whether a weight is one an indicator's band list actually declares.
/// Indicators without custom bands accept any weight in [0, 1].
pub fn weight_allowed(weight: f64, bands: &[RagBand]) -> bool {
    if bands.is_empty() {
        (0.0..=1.0).contains(&weight)
    } else {
        match_band(weight, bands).is_some()
    }
}
