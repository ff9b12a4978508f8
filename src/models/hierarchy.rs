//! Objective hierarchy entities
//!
//! Five levels: OrgObjective → Department → FunctionalObjective → KeyResult →
//! Indicator. Derived status is never stored on these records; it is
//! recomputed on every read by the rollup engine.

use crate::engine::formula::FormulaType;
use serde::{Deserialize, Serialize};

/// Strategic classification of a top-level objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Core,
    Support,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Core => "CORE",
            Classification::Support => "SUPPORT",
        }
    }

    /// Total parse with a default arm; unknown text reads as SUPPORT
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "CORE" => Classification::Core,
            _ => Classification::Support,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "tier1")]
    Tier1,
    #[serde(rename = "tier2")]
    Tier2,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier2 => "tier2",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "tier1" => Tier::Tier1,
            _ => Tier::Tier2,
        }
    }
}

/// How often an indicator is measured (governs its period token shape)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            _ => Frequency::Monthly,
        }
    }
}

/// Discrete color of a custom rating band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagColor {
    Red,
    Amber,
    Green,
}

impl RagColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RagColor::Red => "red",
            RagColor::Amber => "amber",
            RagColor::Green => "green",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "red" => Some(RagColor::Red),
            "amber" => Some(RagColor::Amber),
            "green" => Some(RagColor::Green),
            _ => None,
        }
    }
}

/// One entry of an indicator's ordered custom band list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagBand {
    pub band_label: String,
    pub rag_color: RagColor,
    /// Discrete weight a matrix cell carrying this band contributes, in [0, 1]
    pub rag_numeric: f64,
    pub sort_order: i32,
}

/// Leaf metric with a current and target value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    pub tier: Tier,
    pub frequency: Frequency,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub formula: FormulaType,
    /// Custom band list; empty means fixed global thresholds apply
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub bands: Vec<RagBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Informational once indicators exist; the rollup then derives progress
    /// from the indicators instead
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub formula: FormulaType,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalObjective {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub formula: FormulaType,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
}

/// Departments aggregate their functional objectives with a fixed average;
/// there is deliberately no formula field at this level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub functional_objectives: Vec<FunctionalObjective>,
}

/// An org objective owns EITHER departments OR functional objectives directly,
/// never both. The tagged enum enforces the shape structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveChildren {
    Departments(Vec<Department>),
    FunctionalObjectives(Vec<FunctionalObjective>),
}

impl ObjectiveChildren {
    pub fn is_empty(&self) -> bool {
        match self {
            ObjectiveChildren::Departments(d) => d.is_empty(),
            ObjectiveChildren::FunctionalObjectives(f) => f.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgObjective {
    pub id: i64,
    pub name: String,
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub children: ObjectiveChildren,
}
