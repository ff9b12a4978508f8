//! Customer × feature scoring matrix models
//!
//! A matrix-fed indicator derives its current value from discrete band
//! selections entered per (customer, feature) cell for one reporting period.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Shape of a period token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// `YYYY-MM`
    Monthly,
    /// `YYYY-Www`
    IsoWeek,
}

/// Reporting period token, either monthly (`2026-08`) or ISO week (`2026-W35`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPeriod(pub String);

impl fmt::Display for InvalidPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period token: {}", self.0)
    }
}

impl std::error::Error for InvalidPeriod {}

impl Period {
    /// Parse a period token. Anything not matching `YYYY-MM` or `YYYY-Www` is
    /// rejected, which is how malformed tokens get excluded from period-based
    /// filters.
    pub fn parse(token: &str) -> Result<Self, InvalidPeriod> {
        let bytes = token.as_bytes();
        let valid = match bytes.len() {
            // YYYY-MM with month 01..=12
            7 => {
                bytes[..4].iter().all(u8::is_ascii_digit)
                    && bytes[4] == b'-'
                    && bytes[5..].iter().all(u8::is_ascii_digit)
                    && matches!(token[5..].parse::<u32>(), Ok(m) if (1..=12).contains(&m))
            }
            // YYYY-Www with week 01..=53
            8 => {
                bytes[..4].iter().all(u8::is_ascii_digit)
                    && bytes[4] == b'-'
                    && bytes[5] == b'W'
                    && bytes[6..].iter().all(u8::is_ascii_digit)
                    && matches!(token[6..].parse::<u32>(), Ok(w) if (1..=53).contains(&w))
            }
            _ => false,
        };

        if valid {
            Ok(Period(token.to_string()))
        } else {
            Err(InvalidPeriod(token.to_string()))
        }
    }

    pub fn kind(&self) -> PeriodKind {
        if self.0.len() == 8 {
            PeriodKind::IsoWeek
        } else {
            PeriodKind::Monthly
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cell coordinates within one period's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreKey {
    pub indicator_id: i64,
    pub customer_id: i64,
    pub feature_id: i64,
}

/// In-memory snapshot of one period's grid: only set cells are present.
/// A cleared cell is removed from the map, never stored as zero.
#[derive(Debug, Clone, Default)]
pub struct ScoreSnapshot {
    pub period: Option<Period>,
    cells: HashMap<ScoreKey, f64>,
}

impl ScoreSnapshot {
    pub fn new(period: Period) -> Self {
        Self {
            period: Some(period),
            cells: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: ScoreKey, weight: f64) {
        self.cells.insert(key, weight);
    }

    pub fn clear(&mut self, key: &ScoreKey) {
        self.cells.remove(key);
    }

    pub fn get(&self, key: &ScoreKey) -> Option<f64> {
        self.cells.get(key).copied()
    }

    pub fn contains(&self, key: &ScoreKey) -> bool {
        self.cells.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScoreKey, &f64)> {
        self.cells.iter()
    }
}

/// Which features an indicator is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFeatureLink {
    pub indicator_id: i64,
    pub feature_id: i64,
}

/// Which features a customer is subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFeature {
    pub customer_id: i64,
    pub feature_id: i64,
}
